use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Метка даты, когда в кеше нет ни одного заказа с датой
pub const NO_DATE: &str = "N/A";

/// Одна строка таблицы дашборда
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRow {
    /// Номер заказа
    pub name: String,
    /// Название канала продаж
    pub channel: String,
    /// Товары, по одному на строку (разделитель "\n")
    pub goods: String,
    /// Сумма в рублях, отформатированная
    pub amount: String,
    /// Адрес доставки
    pub address: String,
}

impl OrderRow {
    /// Строка в порядке колонок таблицы
    pub fn as_tuple(&self) -> [&str; 5] {
        [
            self.name.as_str(),
            self.channel.as_str(),
            self.goods.as_str(),
            self.amount.as_str(),
            self.address.as_str(),
        ]
    }
}

/// Опубликованный набор данных дашборда.
///
/// Заменяется только целиком: читатель видит либо старый, либо новый набор.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestOrdersSnapshot {
    /// Последняя дата среди заказов в формате "YYYY-MM-DD" или "N/A"
    pub date: String,
    pub rows: Vec<OrderRow>,
    /// Время завершения обновления; None до первого успешного обновления
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl LatestOrdersSnapshot {
    pub fn empty() -> Self {
        Self {
            date: NO_DATE.to_string(),
            rows: Vec::new(),
            refreshed_at: None,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

impl Default for LatestOrdersSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}
