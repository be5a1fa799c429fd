// Library interface for anemoi
// The desktop client and the headless query command are thin front ends over these modules

pub mod api;
pub mod config;
pub mod errors;
pub mod fetch;
pub mod headless;
pub mod paginate;
pub mod query;
pub mod render;
pub mod views;

// Re-export commonly used types
pub use api::{ApiRequest, Endpoint, ReqwestClient, StatsClient};
pub use config::AppConfig;
pub use errors::AnemoiError;
pub use fetch::{FetchContext, FetchController, FetchState, RequestToken};
pub use paginate::{PAGE_SIZE, PageState, paginate};
pub use query::{FilterState, QueryModel, QueryParams, ValidationError};
pub use render::{Cell, MISSING, Rendered, Row, Table};
pub use views::{DataView, ViewHost, ViewKind, ViewRouter, ViewStatus, mount, mount_idle};
