use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use super::errors::{truncate_body, ApiError};

/// Сущность заказов покупателей
pub const ENTITY_CUSTOMER_ORDER: &str = "customerorder";
/// Сущность каналов продаж
pub const ENTITY_SALES_CHANNEL: &str = "saleschannel";

/// Доступ к API МойСклад.
///
/// Выделен в трейт, чтобы пагинацию и обогащение можно было проверять
/// без сети.
#[async_trait]
pub trait MoySkladApi: Send + Sync {
    /// Одна страница `entity/{entity}?limit=..&offset=..`, массив `rows`
    async fn fetch_rows(
        &self,
        entity: &str,
        limit: usize,
        offset: usize,
        expand: Option<&str>,
    ) -> Result<Vec<Value>, ApiError>;

    /// Произвольный ресурс по href из meta
    async fn fetch_href(&self, href: &str) -> Result<Value, ApiError>;
}

/// HTTP-клиент для работы с JSON API МойСклад (remap 1.2)
pub struct MoySkladApiClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl MoySkladApiClient {
    /// `timeout = None`: запросы без ограничения по времени
    pub fn new(base_url: &str, token: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder().gzip(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn entity_url(&self, entity: &str) -> String {
        format!("{}/entity/{}", self.base_url, entity)
    }

    /// GET с авторизацией, разбор тела как JSON
    async fn get_json(
        &self,
        url: &str,
        query: &[(&str, String)],
        entity: &str,
    ) -> Result<Value, ApiError> {
        tracing::debug!("MoySklad GET {} {:?}", url, query);

        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/json;charset=utf-8")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = truncate_body(&body);
            tracing::error!(
                "MoySklad request for {} failed {}: {}",
                entity,
                status,
                body
            );
            return Err(ApiError::Status {
                entity: entity.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<Value>(&body).map_err(|e| {
            tracing::error!("Failed to parse MoySklad response for {}: {}", entity, e);
            ApiError::Decode {
                entity: entity.to_string(),
                message: format!("{}. Response: {}", e, truncate_body(&body)),
            }
        })
    }
}

#[async_trait]
impl MoySkladApi for MoySkladApiClient {
    async fn fetch_rows(
        &self,
        entity: &str,
        limit: usize,
        offset: usize,
        expand: Option<&str>,
    ) -> Result<Vec<Value>, ApiError> {
        let url = self.entity_url(entity);
        let mut query = vec![("limit", limit.to_string()), ("offset", offset.to_string())];
        if let Some(expand) = expand {
            query.push(("expand", expand.to_string()));
        }

        let payload = self.get_json(&url, &query, entity).await?;
        rows_from_payload(entity, payload)
    }

    async fn fetch_href(&self, href: &str) -> Result<Value, ApiError> {
        self.get_json(href, &[], href).await
    }
}

/// Достает массив `rows` из ответа-коллекции
pub fn rows_from_payload(entity: &str, payload: Value) -> Result<Vec<Value>, ApiError> {
    match payload {
        Value::Object(mut map) => match map.remove("rows") {
            Some(Value::Array(rows)) => Ok(rows),
            other => {
                if let Some(rows) = other {
                    map.insert("rows".to_string(), rows);
                }
                Err(missing_rows(entity, &Value::Object(map)))
            }
        },
        other => Err(missing_rows(entity, &other)),
    }
}

fn missing_rows(entity: &str, payload: &Value) -> ApiError {
    let body = truncate_body(&payload.to_string());
    tracing::error!("Unexpected {} payload (no rows): {}", entity, body);
    ApiError::MissingRows {
        entity: entity.to_string(),
        body,
    }
}

/// Разбирает одну запись ответа в типизированную сущность
pub fn decode_entity<T: DeserializeOwned>(entity: &str, value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode {
        entity: entity.to_string(),
        message: e.to_string(),
    })
}

/// Загружает все записи сущности постранично.
///
/// Страницы `[offset, offset + page_size)` запрашиваются последовательно,
/// пока очередная страница не окажется короче `page_size`. Без повторов:
/// любая ошибка прерывает всю загрузку. Если за `max_pages` страниц конец
/// данных не достигнут, возвращается `PageLimitExceeded`.
pub async fn fetch_all_entities<T: DeserializeOwned>(
    api: &dyn MoySkladApi,
    entity: &str,
    page_size: usize,
    max_pages: usize,
    expand: Option<&str>,
) -> Result<Vec<T>, ApiError> {
    let mut all = Vec::new();
    let mut offset = 0usize;

    for page in 1..=max_pages {
        let rows = api.fetch_rows(entity, page_size, offset, expand).await?;
        let page_len = rows.len();

        for row in rows {
            all.push(decode_entity(entity, row)?);
        }

        tracing::debug!(
            "Fetched {} page {}: {} rows, total {}",
            entity,
            page,
            page_len,
            all.len()
        );

        if page_len < page_size {
            tracing::info!("Fetched {} {} records", all.len(), entity);
            return Ok(all);
        }

        offset += page_size;
    }

    tracing::error!(
        "Pagination of {} stopped after {} pages without end of data",
        entity,
        max_pages
    );
    Err(ApiError::PageLimitExceeded {
        entity: entity.to_string(),
        max_pages,
    })
}
