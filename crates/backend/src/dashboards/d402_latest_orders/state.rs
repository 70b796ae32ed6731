use contracts::dashboards::d402_latest_orders::LatestOrdersSnapshot;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Ячейка с опубликованным набором данных дашборда.
///
/// Один писатель (обновление) и любое число читателей (запросы страницы).
/// Набор неизменяем и заменяется целиком подменой `Arc`.
pub struct DashboardState {
    snapshot: RwLock<Arc<LatestOrdersSnapshot>>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(LatestOrdersSnapshot::empty())),
        }
    }

    /// Текущий набор данных
    pub async fn current(&self) -> Arc<LatestOrdersSnapshot> {
        Arc::clone(&*self.snapshot.read().await)
    }

    /// Публикует новый набор, старый отбрасывается
    pub async fn publish(&self, snapshot: LatestOrdersSnapshot) {
        let snapshot = Arc::new(snapshot);
        *self.snapshot.write().await = snapshot;
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}
