use contracts::domain::a025_moysklad_order::SalesChannel;
use std::collections::HashMap;

/// Таблица id -> наименование (для каналов продаж)
pub type ChannelMap = HashMap<String, String>;

/// Справочная сущность с id и наименованием
pub trait ReferenceEntity {
    fn reference_id(&self) -> Option<&str>;
    fn reference_name(&self) -> Option<&str>;
}

impl ReferenceEntity for SalesChannel {
    fn reference_id(&self) -> Option<&str> {
        self.id.as_deref()
    }
    fn reference_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Строит таблицу id -> наименование.
///
/// Записи без id или без наименования пропускаются; при повторе id
/// побеждает последняя запись.
pub fn build_id_to_name_map<T: ReferenceEntity>(entities: &[T]) -> HashMap<String, String> {
    entities
        .iter()
        .filter_map(|e| {
            let id = e.reference_id().filter(|s| !s.is_empty())?;
            let name = e.reference_name().filter(|s| !s.is_empty())?;
            Some((id.to_string(), name.to_string()))
        })
        .collect()
}
