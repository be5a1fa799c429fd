// Shared helpers for view integration tests
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anemoi::{AnemoiError, ApiRequest, FetchContext, StatsClient};
use async_trait::async_trait;
use serde_json::{Value, json};

/// Answers requests from a queue of `(delay, response)` pairs and records
/// every request it receives.
#[derive(Default)]
pub struct QueuedBackend {
    responses: Mutex<VecDeque<(Duration, Value)>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl QueuedBackend {
    pub fn then(self, delay: Duration, response: Value) -> Self {
        self.responses.lock().unwrap().push_back((delay, response));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl StatsClient for QueuedBackend {
    async fn fetch(&self, request: &ApiRequest) -> Result<Value, AnemoiError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some((delay, response)) => {
                tokio::time::sleep(delay).await;
                Ok(response)
            }
            None => Err(AnemoiError::Backend {
                message: "backend queue exhausted".to_string(),
            }),
        }
    }
}

pub fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .unwrap()
}

pub fn context(runtime: &tokio::runtime::Runtime, backend: Arc<QueuedBackend>) -> FetchContext {
    FetchContext::new(backend, runtime.handle().clone(), Duration::from_secs(5))
}

pub fn drivers(count: usize) -> Value {
    let drivers: Vec<_> = (0..count)
        .map(|i| {
            json!({
                "givenName": "Driver",
                "familyName": format!("{:02}", i),
                "code": format!("D{:02}", i),
                "nationality": "British",
                "url": format!("http://en.wikipedia.org/wiki/Driver_{:02}", i),
            })
        })
        .collect();
    json!({ "drivers": drivers })
}
