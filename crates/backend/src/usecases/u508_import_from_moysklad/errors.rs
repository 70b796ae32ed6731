use thiserror::Error;

/// Сколько символов тела ответа сохраняется в ошибке
pub const ERROR_BODY_LIMIT: usize = 1000;

/// Ошибки обращения к API МойСклад.
///
/// Любая из них прерывает текущую загрузку целиком.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("MoySklad request for {entity} failed with status {status}: {body}")]
    Status {
        entity: String,
        status: u16,
        body: String,
    },

    #[error("Unexpected MoySklad payload for {entity}: rows missing. Body: {body}")]
    MissingRows { entity: String, body: String },

    #[error("Failed to decode MoySklad {entity}: {message}")]
    Decode { entity: String, message: String },

    #[error("Pagination of {entity} did not finish within {max_pages} pages")]
    PageLimitExceeded { entity: String, max_pages: usize },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// HTTP статус, если ошибка пришла от API
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Ошибка загрузки товара для одной позиции заказа.
///
/// Не прерывает обработку заказа: позиция остается без данных товара.
#[derive(Debug, Error)]
#[error("Failed to load assortment for position {position}: {source}")]
pub struct EnrichmentError {
    pub position: String,
    #[source]
    pub source: ApiError,
}

/// Обрезает тело ответа для логов и ошибок
pub fn truncate_body(body: &str) -> String {
    let mut preview: String = body.chars().take(ERROR_BODY_LIMIT).collect();
    if preview.len() < body.len() {
        preview.push_str("...");
    }
    preview
}
