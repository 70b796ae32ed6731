use contracts::domain::a025_moysklad_order::{Assortment, CustomerOrder, Position};

use super::errors::{ApiError, EnrichmentError};
use super::moysklad_api_client::{decode_entity, rows_from_payload, MoySkladApi};

const ENTITY_POSITION: &str = "customerorderposition";
const ENTITY_ASSORTMENT: &str = "assortment";

/// Загружает позиции заказа и товар для каждой позиции.
///
/// Заказ без ссылки на позиции дает пустой список. Ошибка загрузки самой
/// страницы позиций возвращается вызывающему; ошибка загрузки товара
/// логируется, и позиция остается без `assortment_data`.
/// Все запросы выполняются последовательно.
pub async fn enrich_order_with_goods(
    api: &dyn MoySkladApi,
    order: &CustomerOrder,
) -> Result<Vec<Position>, ApiError> {
    let order_label = order.name.as_deref().unwrap_or("<no name>");

    let href = match order.positions.as_ref().and_then(|p| p.href()) {
        Some(href) => href,
        None => {
            tracing::debug!("Order {} has no positions link", order_label);
            return Ok(Vec::new());
        }
    };

    let payload = api.fetch_href(href).await?;
    let rows = rows_from_payload(ENTITY_POSITION, payload)?;

    let mut positions = Vec::with_capacity(rows.len());
    for row in rows {
        let mut position: Position = decode_entity(ENTITY_POSITION, row)?;
        if let Err(e) = enrich_position(api, &mut position).await {
            tracing::warn!("Order {}: {}", order_label, e);
        }
        positions.push(position);
    }

    tracing::debug!("Order {}: {} positions loaded", order_label, positions.len());
    Ok(positions)
}

/// Заполняет `assortment_data` позиции по ссылке assortment.meta.href
async fn enrich_position(
    api: &dyn MoySkladApi,
    position: &mut Position,
) -> Result<(), EnrichmentError> {
    let href = match position.assortment.as_ref().and_then(|a| a.href()) {
        Some(href) => href.to_string(),
        None => return Ok(()),
    };

    let to_error = |source: ApiError| EnrichmentError {
        position: position.id.clone().unwrap_or_else(|| href.clone()),
        source,
    };

    let value = api.fetch_href(&href).await.map_err(to_error)?;
    let assortment: Assortment = decode_entity(ENTITY_ASSORTMENT, value).map_err(to_error)?;
    position.assortment_data = Some(assortment);
    Ok(())
}
