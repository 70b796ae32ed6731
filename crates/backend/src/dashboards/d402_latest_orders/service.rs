use contracts::dashboards::d402_latest_orders::{OrderRow, NO_DATE};
use contracts::domain::a025_moysklad_order::{CustomerOrder, OrderWithGoods, Position};
use std::collections::HashMap;

use crate::shared::format::{format_amount, format_quantity, NOT_AVAILABLE};

/// Разделитель строк товаров в ячейке; при выводе в HTML становится <br>
pub const GOODS_SEPARATOR: &str = "\n";

/// Заглушка для заказа без адреса доставки
pub const NO_ADDRESS: &str = "No address";

/// Последняя дата среди заказов.
///
/// Дата: часть `moment` до первого пробела. Формат фиксированной ширины
/// "YYYY-MM-DD", поэтому строковый максимум совпадает с хронологическим.
pub fn latest_date<'a, I>(orders: I) -> Option<String>
where
    I: IntoIterator<Item = &'a CustomerOrder>,
{
    orders
        .into_iter()
        .filter_map(|o| o.moment_date())
        .max()
        .map(str::to_string)
}

/// Заказ относится к дате, если его `moment` начинается с нее
pub fn is_on_date(order: &CustomerOrder, date: &str) -> bool {
    order
        .moment
        .as_deref()
        .map_or(false, |moment| moment.starts_with(date))
}

/// id сущности из последнего сегмента href
pub fn id_from_href(href: &str) -> Option<&str> {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
}

/// Название канала продаж заказа.
///
/// Порядок: id из salesChannel.meta.href по таблице каналов, затем
/// salesChannel.id по таблице, затем встроенное salesChannel.name,
/// иначе "N/A".
pub fn resolve_channel_name(order: &CustomerOrder, channels: &HashMap<String, String>) -> String {
    let channel = match order.sales_channel.as_ref() {
        Some(channel) => channel,
        None => return NOT_AVAILABLE.to_string(),
    };

    channel
        .href()
        .and_then(id_from_href)
        .and_then(|id| channels.get(id))
        .or_else(|| channel.id.as_ref().and_then(|id| channels.get(id)))
        .or(channel.name.as_ref().filter(|name| !name.is_empty()))
        .cloned()
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Товары заказа: "{наименование} {количество}шт", по одному на строку
pub fn format_goods(goods: &[Position]) -> String {
    if goods.is_empty() {
        return NOT_AVAILABLE.to_string();
    }

    goods
        .iter()
        .map(|position| {
            let name = position
                .assortment_data
                .as_ref()
                .and_then(|a| a.name.as_deref())
                .unwrap_or(NOT_AVAILABLE);
            let quantity = position
                .quantity
                .map(format_quantity)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());
            format!("{} {}шт", name, quantity)
        })
        .collect::<Vec<_>>()
        .join(GOODS_SEPARATOR)
}

/// Адрес: shipmentAddress, затем shipmentAddressFull.addInfo
pub fn resolve_address(order: &CustomerOrder) -> String {
    order
        .shipment_address
        .as_deref()
        .filter(|a| !a.is_empty())
        .or_else(|| {
            order
                .shipment_address_full
                .as_ref()
                .and_then(|full| full.add_info.as_deref())
                .filter(|a| !a.is_empty())
        })
        .unwrap_or(NO_ADDRESS)
        .to_string()
}

pub fn build_row(item: &OrderWithGoods, channels: &HashMap<String, String>) -> OrderRow {
    let order = &item.order;
    OrderRow {
        name: order
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        channel: resolve_channel_name(order, channels),
        goods: format_goods(&item.goods),
        amount: format_amount(order.sum),
        address: resolve_address(order),
    }
}

/// Строки таблицы за последнюю дату.
///
/// Возвращает метку даты ("N/A", если дат нет) и строки заказов этой даты
/// в исходном порядке.
pub fn project_to_rows(
    orders: &[OrderWithGoods],
    channels: &HashMap<String, String>,
) -> (String, Vec<OrderRow>) {
    let date = match latest_date(orders.iter().map(|o| &o.order)) {
        Some(date) => date,
        None => return (NO_DATE.to_string(), Vec::new()),
    };

    let rows = orders
        .iter()
        .filter(|o| is_on_date(&o.order, &date))
        .map(|o| build_row(o, channels))
        .collect();

    (date, rows)
}
