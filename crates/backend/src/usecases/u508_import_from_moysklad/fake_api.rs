//! In-memory реализация `MoySkladApi` для тестов.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

use super::errors::ApiError;
use super::moysklad_api_client::MoySkladApi;

#[derive(Default)]
pub struct FakeApi {
    pages: Mutex<HashMap<String, VecDeque<Result<Vec<Value>, ApiError>>>>,
    hrefs: Mutex<HashMap<String, Value>>,
    page_requests: Mutex<Vec<(String, usize, usize, Option<String>)>>,
    href_requests: Mutex<Vec<String>>,
    gate: Mutex<Option<Arc<Semaphore>>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_page(&self, entity: &str, rows: Vec<Value>) {
        self.pages
            .lock()
            .unwrap()
            .entry(entity.to_string())
            .or_default()
            .push_back(Ok(rows));
    }

    pub fn push_error(&self, entity: &str, error: ApiError) {
        self.pages
            .lock()
            .unwrap()
            .entry(entity.to_string())
            .or_default()
            .push_back(Err(error));
    }

    /// Ответ для href; незарегистрированный href отвечает 404
    pub fn set_href(&self, href: &str, value: Value) {
        self.hrefs.lock().unwrap().insert(href.to_string(), value);
    }

    /// Страницы отдаются только после выдачи разрешений семафора
    pub fn set_gate(&self, gate: Arc<Semaphore>) {
        *self.gate.lock().unwrap() = Some(gate);
    }

    /// (limit, offset) всех запросов страниц
    pub fn page_requests(&self) -> Vec<(usize, usize)> {
        self.page_requests
            .lock()
            .unwrap()
            .iter()
            .map(|(_, limit, offset, _)| (*limit, *offset))
            .collect()
    }

    pub fn expand_for(&self, entity: &str) -> Option<String> {
        self.page_requests
            .lock()
            .unwrap()
            .iter()
            .find(|(e, ..)| e == entity)
            .and_then(|(_, _, _, expand)| expand.clone())
    }

    pub fn href_requests(&self) -> Vec<String> {
        self.href_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl MoySkladApi for FakeApi {
    async fn fetch_rows(
        &self,
        entity: &str,
        limit: usize,
        offset: usize,
        expand: Option<&str>,
    ) -> Result<Vec<Value>, ApiError> {
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        self.page_requests.lock().unwrap().push((
            entity.to_string(),
            limit,
            offset,
            expand.map(str::to_string),
        ));

        self.pages
            .lock()
            .unwrap()
            .get_mut(entity)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn fetch_href(&self, href: &str) -> Result<Value, ApiError> {
        self.href_requests.lock().unwrap().push(href.to_string());

        self.hrefs
            .lock()
            .unwrap()
            .get(href)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                entity: href.to_string(),
                status: 404,
                body: "not found".to_string(),
            })
    }
}
