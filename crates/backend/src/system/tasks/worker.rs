use std::sync::Arc;
use tokio::time::{self, MissedTickBehavior};
use tracing::info;

use crate::usecases::u508_import_from_moysklad::RefreshExecutor;

/// Фоновый воркер периодического обновления дашборда.
pub struct RefreshWorker {
    executor: Arc<RefreshExecutor>,
    interval_seconds: u64,
}

impl RefreshWorker {
    pub fn new(executor: Arc<RefreshExecutor>, interval_seconds: u64) -> Self {
        Self {
            executor,
            interval_seconds,
        }
    }

    /// Запускает цикл обновления: сразу при старте, затем по интервалу.
    pub async fn run_loop(&self) {
        info!(
            "Refresh worker started with interval {} seconds",
            self.interval_seconds
        );
        let mut interval = time::interval(time::Duration::from_secs(self.interval_seconds));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            // первый tick срабатывает сразу
            interval.tick().await;
            self.executor.refresh_and_log().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d402_latest_orders::DashboardState;
    use crate::usecases::u508_import_from_moysklad::fake_api::FakeApi;
    use crate::usecases::u508_import_from_moysklad::moysklad_api_client::ENTITY_CUSTOMER_ORDER;
    use crate::usecases::u508_import_from_moysklad::PagingOptions;
    use serde_json::json;

    #[tokio::test(start_paused = true)]
    async fn test_refreshes_on_start_and_on_interval() {
        let api = Arc::new(FakeApi::new());
        api.push_page(
            ENTITY_CUSTOMER_ORDER,
            vec![json!({ "name": "1", "moment": "2024-05-01 10:00:00" })],
        );
        api.push_page(
            ENTITY_CUSTOMER_ORDER,
            vec![json!({ "name": "2", "moment": "2024-05-02 10:00:00" })],
        );

        let state = Arc::new(DashboardState::new());
        let executor = Arc::new(RefreshExecutor::new(
            api.clone(),
            Arc::clone(&state),
            PagingOptions::default(),
        ));
        let worker = RefreshWorker::new(executor, 300);
        let handle = tokio::spawn(async move { worker.run_loop().await });

        time::sleep(time::Duration::from_secs(1)).await;
        assert_eq!(state.current().await.date, "2024-05-01");

        time::sleep(time::Duration::from_secs(300)).await;
        assert_eq!(state.current().await.date, "2024-05-02");

        handle.abort();
    }
}
