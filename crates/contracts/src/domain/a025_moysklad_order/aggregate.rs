use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ============================================================================
// Схемы сущностей МойСклад (JSON API remap 1.2)
// ============================================================================
//
// Все поля необязательны: API опускает пустые поля, а часть ссылок приходит
// только в виде meta без expand. Скалярные поля с неожиданным типом
// превращаются в None, а не роняют разбор всей страницы.

/// Блок метаданных МойСклад
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, deserialize_with = "lenient_string")]
    pub href: Option<String>,

    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub entity_type: Option<String>,

    /// Размер вложенной коллекции (для positions)
    #[serde(default, deserialize_with = "lenient_u64")]
    pub size: Option<u64>,
}

/// Встроенная ссылка на другую сущность (salesChannel, assortment, positions)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityRef {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,

    #[serde(default)]
    pub meta: Option<Meta>,
}

impl EntityRef {
    /// href из meta, если он есть и не пустой
    pub fn href(&self) -> Option<&str> {
        self.meta
            .as_ref()
            .and_then(|m| m.href.as_deref())
            .filter(|h| !h.is_empty())
    }
}

/// Полный адрес доставки
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipmentAddressFull {
    #[serde(rename = "addInfo", default, deserialize_with = "lenient_string")]
    pub add_info: Option<String>,
}

/// Заказ покупателя (entity/customerorder)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerOrder {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,

    /// Номер заказа
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,

    /// Дата документа, формат "YYYY-MM-DD HH:MM:SS"
    #[serde(default, deserialize_with = "lenient_string")]
    pub moment: Option<String>,

    /// Сумма в сотых долях копейки (делить на 10 000)
    #[serde(default, deserialize_with = "lenient_f64")]
    pub sum: Option<f64>,

    /// Комментарий к заказу. На дашборд не выводится: третья колонка
    /// показывает товары
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,

    #[serde(rename = "shipmentAddress", default, deserialize_with = "lenient_string")]
    pub shipment_address: Option<String>,

    #[serde(rename = "shipmentAddressFull", default)]
    pub shipment_address_full: Option<ShipmentAddressFull>,

    #[serde(rename = "salesChannel", default)]
    pub sales_channel: Option<EntityRef>,

    /// Ссылка на позиции заказа
    #[serde(default)]
    pub positions: Option<EntityRef>,
}

impl CustomerOrder {
    /// Дата заказа: часть moment до первого пробела
    pub fn moment_date(&self) -> Option<&str> {
        let moment = self.moment.as_deref()?;
        let date = moment.split(' ').next().unwrap_or(moment);
        if date.is_empty() {
            None
        } else {
            Some(date)
        }
    }
}

/// Канал продаж (entity/saleschannel)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesChannel {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
}

/// Товар/услуга/модификация, на которую ссылается позиция
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assortment {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
}

/// Позиция заказа (customerorder/{id}/positions)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub quantity: Option<f64>,

    #[serde(default)]
    pub assortment: Option<EntityRef>,

    /// Заполняется при обогащении, в API не приходит
    #[serde(rename = "assortmentData", default, skip_deserializing)]
    pub assortment_data: Option<Assortment>,
}

/// Заказ вместе с загруженными позициями
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderWithGoods {
    pub order: CustomerOrder,
    pub goods: Vec<Position>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()))
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_u64()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_parses_nested_fields() {
        let order: CustomerOrder = serde_json::from_value(json!({
            "id": "o-1",
            "name": "00042",
            "moment": "2024-05-01 10:15:00.000",
            "sum": 150000,
            "shipmentAddressFull": { "addInfo": "Москва" },
            "salesChannel": {
                "meta": { "href": "https://api.moysklad.ru/api/remap/1.2/entity/saleschannel/ch-1", "type": "saleschannel" },
                "name": "Ozon"
            },
            "positions": { "meta": { "href": "https://x/positions", "size": 2 } }
        }))
        .unwrap();

        assert_eq!(order.name.as_deref(), Some("00042"));
        assert_eq!(order.sum, Some(150000.0));
        assert_eq!(order.moment_date(), Some("2024-05-01"));
        assert_eq!(
            order.shipment_address_full.unwrap().add_info.as_deref(),
            Some("Москва")
        );
        assert_eq!(order.positions.unwrap().meta.unwrap().size, Some(2));
        assert_eq!(order.sales_channel.unwrap().name.as_deref(), Some("Ozon"));
    }

    #[test]
    fn test_wrong_scalar_types_become_none() {
        let order: CustomerOrder = serde_json::from_value(json!({
            "name": 42,
            "sum": "много",
            "moment": null
        }))
        .unwrap();

        assert_eq!(order.name, None);
        assert_eq!(order.sum, None);
        assert_eq!(order.moment_date(), None);
    }

    #[test]
    fn test_entity_ref_href_ignores_empty() {
        let r = EntityRef {
            meta: Some(Meta {
                href: Some(String::new()),
                ..Meta::default()
            }),
            ..EntityRef::default()
        };
        assert_eq!(r.href(), None);
    }
}
