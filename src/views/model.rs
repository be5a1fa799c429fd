use std::time::Duration;

use log::{debug, warn};

use crate::api::types::{
    Champions, CircuitList, ConstructorList, DriverComparison, DriverList, EventSchedule,
    SessionOverview, Standings, TelemetryReport, TrackDominance,
};
use crate::fetch::{FetchContext, FetchController, FetchState, RequestToken};
use crate::paginate::PageState;
use crate::query::{FilterState, ValidFilters, ValidationError};
use crate::render::{Payload, Rendered, Row};

use super::{ViewKind, ViewSpec, view_spec};

/// What a view currently has to show below its form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewStatus<'a> {
    Idle,
    Loading,
    /// The request succeeded without any records.
    Empty(&'static str),
    Error { hint: &'static str, message: &'a str },
    Ready(&'a Rendered),
}

/// A mounted data view, independent of its payload type.
pub trait DataView {
    fn spec(&self) -> &'static ViewSpec;

    fn kind(&self) -> ViewKind {
        self.spec().kind
    }

    fn filters(&self) -> &FilterState;

    /// Direct access for text inputs. Callers report edits through `on_input`.
    fn field_mut(&mut self, name: &str) -> Option<&mut String>;

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), ValidationError>;

    /// Any edit clears a displayed validation error.
    fn on_input(&mut self);

    fn validation_error(&self) -> Option<&ValidationError>;

    /// Validates the form and starts a request. Nothing is sent when
    /// validation fails; the error is kept for display instead.
    fn submit(&mut self) -> Result<RequestToken, ValidationError>;

    /// Applies replies that arrived in the meantime. Returns true when the
    /// view changed.
    fn poll(&mut self) -> bool;

    /// Blocks until the current request settles or `timeout` elapses.
    fn wait(&mut self, timeout: Duration) -> ViewStatus<'_>;

    fn status(&self) -> ViewStatus<'_>;

    /// Page bookkeeping, only for paginated views.
    fn pages(&self) -> Option<&PageState>;

    fn pages_mut(&mut self) -> Option<&mut PageState>;

    /// Rows on the current page, or every row for views without pagination.
    fn visible_rows(&self) -> &[Row];
}

pub struct QueryView<T> {
    spec: &'static ViewSpec,
    filters: FilterState,
    validation_error: Option<ValidationError>,
    fetch: FetchController<T>,
    submitted: Option<ValidFilters>,
    rendered: Option<Rendered>,
    pages: PageState,
}

impl<T: Payload> QueryView<T> {
    pub fn new(spec: &'static ViewSpec, context: FetchContext) -> Self {
        Self {
            spec,
            filters: spec.query.empty_filters(),
            validation_error: None,
            fetch: FetchController::new(context, spec.endpoint, spec.query),
            submitted: None,
            rendered: None,
            pages: PageState::default(),
        }
    }

    /// Rebuilds the display model once the current request has settled.
    fn settle(&mut self) {
        self.rendered = match (self.fetch.state(), &self.submitted) {
            (FetchState::Success(payload), Some(submitted)) => {
                let rendered = payload.render(submitted.filters());
                self.pages.reset(rendered.rows().len());
                debug!(
                    "{}: {} rows over {} pages",
                    self.spec.kind,
                    rendered.rows().len(),
                    self.pages.total_pages()
                );
                Some(rendered)
            }
            _ => None,
        };
    }
}

impl<T: Payload> DataView for QueryView<T> {
    fn spec(&self) -> &'static ViewSpec {
        self.spec
    }

    fn filters(&self) -> &FilterState {
        &self.filters
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        self.filters.get_mut(name)
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), ValidationError> {
        self.filters.set(name, value)?;
        self.on_input();
        Ok(())
    }

    fn on_input(&mut self) {
        self.validation_error = None;
    }

    fn validation_error(&self) -> Option<&ValidationError> {
        self.validation_error.as_ref()
    }

    fn submit(&mut self) -> Result<RequestToken, ValidationError> {
        let valid = match self.spec.query.validate(&self.filters) {
            Ok(valid) => valid,
            Err(e) => {
                debug!("{}: not submitting, {}", self.spec.kind, e);
                self.validation_error = Some(e.clone());
                return Err(e);
            }
        };
        self.validation_error = None;
        self.rendered = None;
        let token = self.fetch.submit(&valid);
        self.submitted = Some(valid);
        Ok(token)
    }

    fn poll(&mut self) -> bool {
        let settled = self.fetch.poll();
        if settled {
            self.settle();
        }
        settled
    }

    fn wait(&mut self, timeout: Duration) -> ViewStatus<'_> {
        if self.fetch.state().is_loading() {
            self.fetch.wait(timeout);
            if !self.fetch.state().is_loading() {
                self.settle();
            }
        }
        self.status()
    }

    fn status(&self) -> ViewStatus<'_> {
        match self.fetch.state() {
            FetchState::Idle => ViewStatus::Idle,
            FetchState::Loading => ViewStatus::Loading,
            FetchState::Error(message) => ViewStatus::Error {
                hint: self.spec.error_hint,
                message,
            },
            FetchState::Success(_) => match &self.rendered {
                Some(rendered) if !rendered.is_empty() => ViewStatus::Ready(rendered),
                _ => ViewStatus::Empty(self.spec.empty_message),
            },
        }
    }

    fn pages(&self) -> Option<&PageState> {
        self.spec.paginated.then_some(&self.pages)
    }

    fn pages_mut(&mut self) -> Option<&mut PageState> {
        self.spec.paginated.then_some(&mut self.pages)
    }

    fn visible_rows(&self) -> &[Row] {
        let rows = self.rendered.as_ref().map(Rendered::rows).unwrap_or(&[]);
        if self.spec.paginated {
            self.pages.slice(rows)
        } else {
            rows
        }
    }
}

fn boxed<T: Payload>(spec: &'static ViewSpec, context: FetchContext) -> Box<dyn DataView> {
    Box::new(QueryView::<T>::new(spec, context))
}

/// Creates the view for `kind` with fresh filters and no fetch state, even
/// for views that list everything on mount.
pub fn mount_idle(kind: ViewKind, context: &FetchContext) -> Box<dyn DataView> {
    let spec = view_spec(kind);
    let context = context.clone();
    match kind {
        ViewKind::Calendar => boxed::<EventSchedule>(spec, context),
        ViewKind::Champions => boxed::<Champions>(spec, context),
        ViewKind::Session => boxed::<SessionOverview>(spec, context),
        ViewKind::Standings => boxed::<Standings>(spec, context),
        ViewKind::Circuits => boxed::<CircuitList>(spec, context),
        ViewKind::Constructors => boxed::<ConstructorList>(spec, context),
        ViewKind::Drivers => boxed::<DriverList>(spec, context),
        ViewKind::FastestLap | ViewKind::Telemetry => boxed::<TelemetryReport>(spec, context),
        ViewKind::TrackDominance => boxed::<TrackDominance>(spec, context),
        ViewKind::DriverComparison => boxed::<DriverComparison>(spec, context),
    }
}

/// Creates the view for `kind` and issues its unfiltered request when the
/// view lists everything on mount.
pub fn mount(kind: ViewKind, context: &FetchContext) -> Box<dyn DataView> {
    let mut view = mount_idle(kind, context);
    if view.spec().fetch_on_mount
        && let Err(e) = view.submit()
    {
        warn!("{}: initial fetch not issued: {}", kind, e);
    }
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Endpoint;
    use crate::api::mock::ScriptedClient;
    use serde_json::json;
    use std::sync::Arc;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap()
    }

    fn context(runtime: &tokio::runtime::Runtime, client: Arc<ScriptedClient>) -> FetchContext {
        FetchContext::new(client, runtime.handle().clone(), Duration::from_secs(5))
    }

    fn drivers(count: usize) -> serde_json::Value {
        let drivers: Vec<_> = (0..count)
            .map(|i| json!({"givenName": "Driver", "familyName": format!("{}", i), "nationality": "British"}))
            .collect();
        json!({ "drivers": drivers })
    }

    #[test]
    fn test_validation_failure_sends_nothing() {
        let runtime = runtime();
        let client = Arc::new(ScriptedClient::default());
        let mut view = mount(ViewKind::Calendar, &context(&runtime, client.clone()));

        assert!(matches!(
            view.submit().unwrap_err(),
            ValidationError::MissingField { field: "year", .. }
        ));
        assert!(view.validation_error().is_some());
        assert_eq!(view.status(), ViewStatus::Idle);
        assert_eq!(client.request_count(), 0);

        view.set_field("year", "2021").unwrap();
        assert!(view.validation_error().is_none());
    }

    #[test]
    fn test_mount_fetches_lists_immediately() {
        let runtime = runtime();
        let client = Arc::new(ScriptedClient::default().respond(Duration::ZERO, Ok(drivers(3))));
        let mut view = mount(ViewKind::Drivers, &context(&runtime, client.clone()));
        assert_eq!(view.status(), ViewStatus::Loading);

        assert!(matches!(view.wait(Duration::from_secs(5)), ViewStatus::Ready(_)));
        let requests = client.requests.lock().unwrap();
        assert_eq!(requests[0].endpoint, Endpoint::Drivers);
        assert!(requests[0].params.is_empty());
    }

    #[test]
    fn test_mount_idle_sends_nothing() {
        let runtime = runtime();
        let client = Arc::new(ScriptedClient::default());
        let view = mount_idle(ViewKind::Drivers, &context(&runtime, client.clone()));

        assert_eq!(view.status(), ViewStatus::Idle);
        assert_eq!(client.request_count(), 0);
    }

    #[test]
    fn test_new_result_resets_page() {
        let runtime = runtime();
        let client = Arc::new(
            ScriptedClient::default()
                .respond(Duration::ZERO, Ok(drivers(60)))
                .respond(Duration::ZERO, Ok(drivers(30))),
        );
        let mut view = mount(ViewKind::Drivers, &context(&runtime, client));
        view.wait(Duration::from_secs(5));
        let pages = view.pages_mut().unwrap();
        assert_eq!(pages.total_pages(), 3);
        pages.go_to(3);
        assert_eq!(view.visible_rows().len(), 10);

        view.set_field("year", "2021").unwrap();
        view.submit().unwrap();
        assert!(view.visible_rows().is_empty());
        view.wait(Duration::from_secs(5));

        let pages = view.pages().unwrap();
        assert_eq!(pages.current_page(), 1);
        assert_eq!(pages.total_pages(), 2);
        assert_eq!(view.visible_rows().len(), 25);
    }

    #[test]
    fn test_empty_and_error_are_distinct() {
        let runtime = runtime();
        let client = Arc::new(
            ScriptedClient::default()
                .respond(Duration::ZERO, Ok(json!({"constructors": []})))
                .respond(Duration::ZERO, Ok(json!({"error": "No data"}))),
        );
        let mut view = mount(ViewKind::Constructors, &context(&runtime, client));
        assert_eq!(
            view.wait(Duration::from_secs(5)),
            ViewStatus::Empty("No constructors found for the selected inputs.")
        );

        view.submit().unwrap();
        match view.wait(Duration::from_secs(5)) {
            ViewStatus::Error { hint, message } => {
                assert_eq!(message, "No data");
                assert!(hint.starts_with("Unable to fetch constructor data"));
            }
            other => panic!("Expected error status, got {:?}", other),
        }
    }

    #[test]
    fn test_unpaginated_view_shows_all_rows() {
        let runtime = runtime();
        let events: Vec<_> = (1..=30).map(|round| json!({"RoundNumber": round})).collect();
        let client = Arc::new(
            ScriptedClient::default().respond(Duration::ZERO, Ok(json!({"year": 2021, "events": events}))),
        );
        let mut view = mount(ViewKind::Calendar, &context(&runtime, client));
        view.set_field("year", "2021").unwrap();
        view.submit().unwrap();
        view.wait(Duration::from_secs(5));

        assert!(view.pages().is_none());
        assert_eq!(view.visible_rows().len(), 30);
    }
}
