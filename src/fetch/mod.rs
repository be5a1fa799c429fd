//! Request lifecycle for a single view.
//!
//! A `FetchController` owns the state of the one request a view cares about.
//! Every submission bumps a `RequestToken`; replies carry the token they were
//! issued with and anything but the latest token is dropped on arrival, so
//! results are applied in submission order regardless of network timing.

use std::fmt;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::api::{self, ApiRequest, Endpoint, StatsClient};
use crate::errors::AnemoiError;
use crate::query::{QueryModel, ValidFilters};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn next(self) -> Self {
        RequestToken(self.0 + 1)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Idle,
    Loading,
    Success(T),
    Error(String),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn payload(&self) -> Option<&T> {
        match self {
            FetchState::Success(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Where requests run and how long they may take.
#[derive(Clone)]
pub struct FetchContext {
    pub client: Arc<dyn StatsClient>,
    pub runtime: Handle,
    pub timeout: Duration,
}

impl FetchContext {
    pub fn new(client: Arc<dyn StatsClient>, runtime: Handle, timeout: Duration) -> Self {
        Self {
            client,
            runtime,
            timeout,
        }
    }
}

pub(crate) struct Reply<T> {
    token: RequestToken,
    outcome: Result<T, AnemoiError>,
}

pub struct FetchController<T> {
    context: FetchContext,
    endpoint: Endpoint,
    query_model: QueryModel,
    token: RequestToken,
    state: FetchState<T>,
    in_flight: Option<JoinHandle<()>>,
    reply_tx: Sender<Reply<T>>,
    reply_rx: Receiver<Reply<T>>,
}

impl<T> FetchController<T>
where
    T: DeserializeOwned + Send + 'static,
{
    pub fn new(context: FetchContext, endpoint: Endpoint, query_model: QueryModel) -> Self {
        let (reply_tx, reply_rx) = mpsc::channel();
        Self {
            context,
            endpoint,
            query_model,
            token: RequestToken::default(),
            state: FetchState::Idle,
            in_flight: None,
            reply_tx,
            reply_rx,
        }
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    /// Starts a new request, superseding whatever was in flight.
    pub fn submit(&mut self, filters: &ValidFilters) -> RequestToken {
        self.token = self.token.next();
        let token = self.token;
        self.state = FetchState::Loading;

        if let Some(previous) = self.in_flight.take() {
            if !previous.is_finished() {
                debug!("{}: aborting request superseded by {}", self.endpoint, token);
            }
            previous.abort();
        }

        let request = ApiRequest::new(self.endpoint, self.query_model.serialize(filters.filters()));
        info!("{}: submitting request {} {:?}", self.endpoint, token, request.params);

        let client = Arc::clone(&self.context.client);
        let reply_tx = self.reply_tx.clone();
        let timeout = self.context.timeout;
        let endpoint = self.endpoint;
        self.in_flight = Some(self.context.runtime.spawn(async move {
            let outcome = match tokio::time::timeout(timeout, client.fetch(&request)).await {
                Ok(result) => result.and_then(api::decode_payload::<T>),
                Err(_) => Err(AnemoiError::RequestTimeout {
                    timeout_s: timeout.as_secs(),
                }),
            };
            if reply_tx.send(Reply { token, outcome }).is_err() {
                debug!("{}: view closed before reply {} arrived", endpoint, token);
            }
        }));
        token
    }

    /// Applies every reply received so far. Returns true when the current
    /// request settled during this call.
    pub fn poll(&mut self) -> bool {
        let mut settled = false;
        while let Ok(reply) = self.reply_rx.try_recv() {
            settled |= self.apply(reply.token, reply.outcome);
        }
        settled
    }

    /// Blocks until the current request settles or `timeout` elapses.
    pub fn wait(&mut self, timeout: Duration) -> &FetchState<T> {
        let deadline = Instant::now() + timeout;
        while self.state.is_loading() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.reply_rx.recv_timeout(remaining) {
                Ok(reply) => {
                    self.apply(reply.token, reply.outcome);
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        &self.state
    }

    pub(crate) fn apply(&mut self, token: RequestToken, outcome: Result<T, AnemoiError>) -> bool {
        if token != self.token {
            debug!(
                "{}: discarding reply {} superseded by {}",
                self.endpoint, token, self.token
            );
            return false;
        }
        if !self.state.is_loading() {
            return false;
        }

        self.in_flight = None;
        self.state = match outcome {
            Ok(payload) => FetchState::Success(payload),
            Err(e) => {
                warn!("{}: request {} failed: {}", self.endpoint, token, e);
                FetchState::Error(e.to_string())
            }
        };
        true
    }
}

impl<T> Drop for FetchController<T> {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.abort();
        }
    }
}
