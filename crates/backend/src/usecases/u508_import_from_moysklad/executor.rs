use chrono::Utc;
use contracts::dashboards::d402_latest_orders::LatestOrdersSnapshot;
use contracts::domain::a025_moysklad_order::{CustomerOrder, OrderWithGoods, SalesChannel};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::enrichment::enrich_order_with_goods;
use super::errors::ApiError;
use super::moysklad_api_client::{
    fetch_all_entities, MoySkladApi, ENTITY_CUSTOMER_ORDER, ENTITY_SALES_CHANNEL,
};
use super::reference_map::{build_id_to_name_map, ChannelMap};
use crate::dashboards::d402_latest_orders::{service, state::DashboardState};

/// Параметры постраничной загрузки
#[derive(Debug, Clone, Copy)]
pub struct PagingOptions {
    pub page_size: usize,
    pub max_pages: usize,
}

impl Default for PagingOptions {
    fn default() -> Self {
        Self {
            page_size: 1000,
            max_pages: 100,
        }
    }
}

/// Итог одного цикла обновления
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Published { date: String, rows: usize },
    /// Предыдущий цикл еще выполняется
    Skipped,
}

/// Executor обновления дашборда заказов из МойСклад
pub struct RefreshExecutor {
    api: Arc<dyn MoySkladApi>,
    state: Arc<DashboardState>,
    paging: PagingOptions,
    running: Mutex<()>,
}

impl RefreshExecutor {
    pub fn new(api: Arc<dyn MoySkladApi>, state: Arc<DashboardState>, paging: PagingOptions) -> Self {
        Self {
            api,
            state,
            paging,
            running: Mutex::new(()),
        }
    }

    /// Все заказы покупателей (с развернутым каналом продаж)
    pub async fn fetch_orders(&self) -> Result<Vec<CustomerOrder>, ApiError> {
        fetch_all_entities(
            self.api.as_ref(),
            ENTITY_CUSTOMER_ORDER,
            self.paging.page_size,
            self.paging.max_pages,
            Some("salesChannel"),
        )
        .await
    }

    /// Таблица каналов продаж id -> наименование
    pub async fn fetch_channel_map(&self) -> Result<ChannelMap, ApiError> {
        let channels: Vec<SalesChannel> = fetch_all_entities(
            self.api.as_ref(),
            ENTITY_SALES_CHANNEL,
            self.paging.page_size,
            self.paging.max_pages,
            None,
        )
        .await?;
        Ok(build_id_to_name_map(&channels))
    }

    /// Один цикл обновления: загрузка, обогащение, проекция, публикация.
    ///
    /// Заказы и каналы загружаются параллельно, остальное последовательно.
    /// Позиции загружаются только для заказов последней даты. При ошибке
    /// опубликованные данные не меняются. Если предыдущий цикл еще идет,
    /// новый пропускается.
    pub async fn run_refresh(&self) -> Result<RefreshOutcome, ApiError> {
        let _guard = match self.running.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                tracing::warn!("Previous refresh is still running, skipping");
                return Ok(RefreshOutcome::Skipped);
            }
        };

        tracing::info!("Updating orders...");
        let (orders, channels) = tokio::try_join!(self.fetch_orders(), self.fetch_channel_map())?;
        tracing::info!(
            "Fetched {} orders and {} sales channels",
            orders.len(),
            channels.len()
        );

        let latest = service::latest_date(&orders);
        let mut enriched = Vec::new();
        if let Some(date) = latest.as_deref() {
            for order in orders.into_iter().filter(|o| service::is_on_date(o, date)) {
                let goods = match enrich_order_with_goods(self.api.as_ref(), &order).await {
                    Ok(goods) => goods,
                    Err(e) => {
                        tracing::warn!(
                            "Failed to load positions of order {}: {}",
                            order.name.as_deref().unwrap_or("<no name>"),
                            e
                        );
                        Vec::new()
                    }
                };
                enriched.push(OrderWithGoods { order, goods });
            }
        }

        let (date, rows) = service::project_to_rows(&enriched, &channels);
        let outcome = RefreshOutcome::Published {
            date: date.clone(),
            rows: rows.len(),
        };

        self.state
            .publish(LatestOrdersSnapshot {
                date,
                rows,
                refreshed_at: Some(Utc::now()),
            })
            .await;

        tracing::info!("Orders updated successfully: {:?}", outcome);
        Ok(outcome)
    }

    /// Обновление с логированием ошибки; устаревшие данные остаются видимыми
    pub async fn refresh_and_log(&self) {
        if let Err(e) = self.run_refresh().await {
            match e.status() {
                Some(status) => tracing::error!("Error updating orders (HTTP {}): {}", status, e),
                None => tracing::error!("Error updating orders: {}", e),
            }
        }
    }
}
