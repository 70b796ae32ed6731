pub mod dashboards;
pub mod handlers;
pub mod routes;
pub mod shared;
pub mod system;
pub mod usecases;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use dashboards::d402_latest_orders::DashboardState;
use handlers::d402_latest_orders::DashboardContext;
use system::tasks::worker::RefreshWorker;
use usecases::u508_import_from_moysklad::{MoySkladApiClient, PagingOptions, RefreshExecutor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use tokio::net::TcpListener;

    system::tracing::initialize()?;

    let config = shared::config::load_config()?;
    let token = shared::config::api_token(&config)?;

    let timeout = match config.moysklad.request_timeout_secs {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };
    let api = Arc::new(MoySkladApiClient::new(
        &config.moysklad.base_url,
        &token,
        timeout,
    )?);

    let state = Arc::new(DashboardState::new());
    let executor = Arc::new(RefreshExecutor::new(
        api,
        Arc::clone(&state),
        PagingOptions {
            page_size: config.moysklad.page_size,
            max_pages: config.moysklad.max_pages,
        },
    ));

    // Обновление при старте и далее по таймеру
    let worker = RefreshWorker::new(executor, config.dashboard.refresh_interval_secs);
    tokio::spawn(async move {
        worker.run_loop().await;
    });

    let template_path = shared::config::get_template_path(&config);
    tracing::info!("Dashboard template: {}", template_path.display());

    let app = routes::configure_routes(Arc::new(DashboardContext {
        state,
        template_path,
    }));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid server address: {}", e))?;

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server running on http://{}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    config.server.port
                );
            } else {
                tracing::error!("Failed to bind to {}. Error: {}", addr, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
