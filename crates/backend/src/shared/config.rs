use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub moysklad: MoySkladConfig,
    pub dashboard: DashboardConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MoySkladConfig {
    pub base_url: String,
    /// Имя переменной окружения с Bearer токеном
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Ограничение на число страниц при пагинации
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    /// 0 = без таймаута
    #[serde(default)]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub template_path: String,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_token_env() -> String {
    "API_TOKEN".to_string()
}

fn default_page_size() -> usize {
    1000
}

fn default_max_pages() -> usize {
    100
}

fn default_refresh_interval() -> u64 {
    300
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[moysklad]
base_url = "https://api.moysklad.ru/api/remap/1.2"
token_env = "API_TOKEN"
page_size = 1000
max_pages = 100
request_timeout_secs = 0

[dashboard]
template_path = "templates/latest_orders.html"
refresh_interval_secs = 300

[server]
host = "0.0.0.0"
port = 3000
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Current working directory
/// 3. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    let mut candidates = Vec::new();
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.push(exe_dir.join("config.toml"));
        }
    }
    candidates.push(PathBuf::from("config.toml"));

    for config_path in candidates {
        if config_path.exists() {
            tracing::info!("Loading config from: {}", config_path.display());
            let contents = std::fs::read_to_string(&config_path)?;
            return parse_config(&contents);
        }
        tracing::debug!("config.toml not found at: {}", config_path.display());
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    if config.moysklad.page_size == 0 {
        anyhow::bail!("moysklad.page_size must be greater than zero");
    }
    if config.moysklad.max_pages == 0 {
        anyhow::bail!("moysklad.max_pages must be greater than zero");
    }
    if config.dashboard.refresh_interval_secs == 0 {
        anyhow::bail!("dashboard.refresh_interval_secs must be greater than zero");
    }
    Ok(config)
}

/// Bearer токен МойСклад из переменной окружения (с учетом .env)
pub fn api_token(config: &Config) -> anyhow::Result<String> {
    // .env необязателен
    let _ = dotenv::dotenv();

    let var = &config.moysklad.token_env;
    match std::env::var(var) {
        Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => anyhow::bail!("Environment variable {} with MoySklad token is not set", var),
    }
}

/// Get the template file path from configuration
///
/// Relative paths are tried against the working directory, the executable
/// directory and the backend crate directory, in that order.
pub fn get_template_path(config: &Config) -> PathBuf {
    resolve_relative(&config.dashboard.template_path)
}

fn resolve_relative(path_str: &str) -> PathBuf {
    let path = Path::new(path_str);

    if path.is_absolute() || path.exists() {
        return path.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let resolved = exe_dir.join(path);
            if resolved.exists() {
                return resolved;
            }
        }
    }

    Path::new(env!("CARGO_MANIFEST_DIR")).join(path)
}
