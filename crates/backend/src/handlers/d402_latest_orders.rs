use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use std::path::PathBuf;
use std::sync::Arc;

use crate::dashboards::d402_latest_orders::{render, DashboardState};

/// Общие данные обработчиков дашборда
pub struct DashboardContext {
    pub state: Arc<DashboardState>,
    pub template_path: PathBuf,
}

/// GET /
pub async fn latest_orders_page(State(ctx): State<Arc<DashboardContext>>) -> Response {
    let snapshot = ctx.state.current().await;

    match render::render_snapshot(&ctx.template_path, &snapshot).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Error generating orders page: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render::render_error_page(&e.to_string())),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::configure_routes;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use contracts::dashboards::d402_latest_orders::{LatestOrdersSnapshot, OrderRow};
    use tower::ServiceExt;

    fn template_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates/latest_orders.html")
    }

    async fn get_root(ctx: DashboardContext) -> (StatusCode, String, String) {
        let response = configure_routes(Arc::new(ctx))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string())
            .unwrap_or_default();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    fn snapshot() -> LatestOrdersSnapshot {
        LatestOrdersSnapshot {
            date: "2024-05-02".to_string(),
            rows: vec![OrderRow {
                name: "00002".to_string(),
                channel: "Ozon".to_string(),
                goods: "Чайник 2шт\nКружка 1шт".to_string(),
                amount: "15,00".to_string(),
                address: "<script>alert(1)</script>".to_string(),
            }],
            refreshed_at: None,
        }
    }

    #[tokio::test]
    async fn test_empty_cache_returns_placeholder_page() {
        let (status, content_type, body) = get_root(DashboardContext {
            state: Arc::new(DashboardState::new()),
            template_path: template_path(),
        })
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(content_type.starts_with("text/html"));
        assert!(body.contains("No orders found in cache."));
    }

    #[tokio::test]
    async fn test_renders_published_rows() {
        let state = Arc::new(DashboardState::new());
        state.publish(snapshot()).await;

        let (status, _, body) = get_root(DashboardContext {
            state,
            template_path: template_path(),
        })
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(!body.contains("{{DATE}}"));
        assert!(!body.contains("{{TABLE_ROWS}}"));
        assert_eq!(body.matches("2024-05-02").count(), 2);
        assert!(body.contains("Чайник&#32;2шт<br>Кружка&#32;1шт"));
        assert!(!body.contains("<script>"));
    }

    #[tokio::test]
    async fn test_missing_template_is_500() {
        let state = Arc::new(DashboardState::new());
        state.publish(snapshot()).await;

        let (status, _, body) = get_root(DashboardContext {
            state,
            template_path: PathBuf::from("/definitely/missing/template.html"),
        })
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("<h1>Error</h1>"));
    }

    #[tokio::test]
    async fn test_only_root_is_routed() {
        let response = configure_routes(Arc::new(DashboardContext {
            state: Arc::new(DashboardState::new()),
            template_path: template_path(),
        }))
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
