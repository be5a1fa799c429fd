//! One-shot queries for the `query` subcommand.

use std::path::Path;
use std::time::Duration;

use itertools::Itertools;
use log::info;

use crate::errors::AnemoiError;
use crate::fetch::FetchContext;
use crate::render::{Rendered, Row};
use crate::views::{ViewKind, ViewStatus, mount_idle};

// grace period on top of the request timeout before giving up on a reply
const WAIT_MARGIN: Duration = Duration::from_secs(2);

pub fn parse_filter(input: &str) -> Result<(String, String), AnemoiError> {
    match input.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(AnemoiError::InvalidFilterArgument {
            input: input.to_string(),
        }),
    }
}

/// Validates `filters`, sends exactly one request and returns the text report
/// for the requested page. Plots are written to `image_out` when given.
pub fn run_query(
    context: &FetchContext,
    kind: ViewKind,
    filters: &[(String, String)],
    page: usize,
    image_out: Option<&Path>,
) -> Result<String, AnemoiError> {
    let mut view = mount_idle(kind, context);
    for (name, value) in filters {
        view.set_field(name, value)?;
    }
    let token = view.submit()?;
    info!("{}: waiting for request {}", kind, token);

    view.wait(context.timeout + WAIT_MARGIN);
    if let Some(pages) = view.pages_mut() {
        pages.go_to(page);
    }

    match view.status() {
        ViewStatus::Idle | ViewStatus::Loading => Err(AnemoiError::RequestTimeout {
            timeout_s: context.timeout.as_secs(),
        }),
        ViewStatus::Empty(message) => Ok(format!("{}\n", message)),
        ViewStatus::Error { hint, message } => Err(AnemoiError::QueryFailed {
            hint: hint.to_string(),
            message: message.to_string(),
        }),
        ViewStatus::Ready(rendered) => {
            let mut report = format_rendered(rendered, view.visible_rows());
            if let Some(pages) = view.pages() {
                report.push_str(&format!(
                    "Page {} of {}\n",
                    pages.current_page(),
                    pages.total_pages()
                ));
            }
            if let Some(line) = write_image(rendered, image_out)? {
                report.push_str(&line);
            }
            Ok(report)
        }
    }
}

fn format_rendered(rendered: &Rendered, rows: &[Row]) -> String {
    let mut out = String::new();
    if let Some(heading) = &rendered.heading {
        out.push_str(&format!("{}\n\n", heading));
    }
    for (label, value) in &rendered.details {
        out.push_str(&format!("{:>12}: {}\n", label, value));
    }
    if !rendered.details.is_empty() {
        out.push('\n');
    }
    if let Some(notice) = &rendered.notice {
        out.push_str(&format!("{}\n\n", notice));
    }
    if let Some(table) = &rendered.table {
        let titles = table.columns.iter().map(|c| c.title()).collect_vec();
        out.push_str(&format_table(&titles, rows));
    }
    out
}

/// Left-aligned columns padded to their widest cell.
fn format_table(titles: &[&str], rows: &[Row]) -> String {
    let widths = titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            rows.iter()
                .filter_map(|row| row.cells.get(i))
                .map(|cell| cell.text().chars().count())
                .chain(std::iter::once(title.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect_vec();

    let mut out = String::new();
    out.push_str(&pad_line(titles, &widths));
    out.push('\n');
    out.push_str(&widths.iter().map(|w| "-".repeat(*w)).join("  "));
    out.push('\n');
    for row in rows {
        let cells = row.cells.iter().map(|c| c.text()).collect_vec();
        out.push_str(&pad_line(&cells, &widths));
        out.push('\n');
    }
    out
}

fn pad_line(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(text, width)| format!("{:<width$}", text, width = *width))
        .join("  ")
        .trim_end()
        .to_string()
}

fn write_image(rendered: &Rendered, image_out: Option<&Path>) -> Result<Option<String>, AnemoiError> {
    match (&rendered.image, image_out) {
        (Some(image), Some(path)) => {
            std::fs::write(path, &image.png[..])
                .map_err(|e| AnemoiError::ImageWriteError { source: e })?;
            Ok(Some(format!("{} written to {}\n", image.title, path.display())))
        }
        (Some(image), None) => Ok(Some(format!(
            "{} available, pass --image-out to save it\n",
            image.title
        ))),
        (None, _) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Endpoint;
    use crate::api::mock::ScriptedClient;
    use crate::render::Cell;
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap()
    }

    fn context(
        runtime: &tokio::runtime::Runtime,
        client: Arc<ScriptedClient>,
        timeout: Duration,
    ) -> FetchContext {
        FetchContext::new(client, runtime.handle().clone(), timeout)
    }

    fn drivers(count: usize) -> serde_json::Value {
        let drivers: Vec<_> = (0..count)
            .map(|i| json!({"givenName": "Driver", "familyName": format!("{:02}", i), "code": "DRV"}))
            .collect();
        json!({ "drivers": drivers })
    }

    fn filters(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(
            parse_filter("driverId=hamilton").unwrap(),
            ("driverId".to_string(), "hamilton".to_string())
        );
        assert_eq!(
            parse_filter("grandPrix=Abu Dhabi").unwrap(),
            ("grandPrix".to_string(), "Abu Dhabi".to_string())
        );
        assert!(parse_filter("year").is_err());
        assert!(parse_filter("=2021").is_err());
    }

    #[test]
    fn test_format_table_pads_columns() {
        let rows = vec![Row {
            cells: vec![
                Cell::Text("1".to_string()),
                Cell::Link {
                    text: "Lewis Hamilton".to_string(),
                    url: "http://en.wikipedia.org/wiki/Lewis_Hamilton".to_string(),
                },
            ],
        }];
        let table = format_table(&["Position", "Driver"], &rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "Position  Driver");
        assert_eq!(lines[1], "--------  --------------");
        assert_eq!(lines[2], "1         Lewis Hamilton");
    }

    #[test]
    fn test_query_sends_one_filtered_request_and_prints_page() {
        let runtime = runtime();
        let client = Arc::new(ScriptedClient::default().respond(Duration::ZERO, Ok(drivers(28))));
        let ctx = context(&runtime, client.clone(), Duration::from_secs(5));

        let report = run_query(
            &ctx,
            ViewKind::Drivers,
            &filters(&[("year", "2021")]),
            2,
            None,
        )
        .unwrap();

        let requests = client.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].endpoint, Endpoint::Drivers);
        assert_eq!(requests[0].params.get("year"), Some("2021"));

        assert!(report.ends_with("Page 2 of 2\n"));
        assert!(report.contains("Driver 25"));
        assert!(report.contains("Driver 27"));
        assert!(!report.contains("Driver 24"));
        // header, separator, three rows, page line
        assert_eq!(report.lines().count(), 6);
    }

    #[test]
    fn test_query_page_is_clamped() {
        let runtime = runtime();
        let client = Arc::new(ScriptedClient::default().respond(Duration::ZERO, Ok(drivers(28))));
        let ctx = context(&runtime, client, Duration::from_secs(5));

        let report = run_query(&ctx, ViewKind::Drivers, &[], 99, None).unwrap();
        assert!(report.ends_with("Page 2 of 2\n"));
    }

    #[test]
    fn test_query_empty_result() {
        let runtime = runtime();
        let client = Arc::new(
            ScriptedClient::default().respond(Duration::ZERO, Ok(json!({"constructors": []}))),
        );
        let ctx = context(&runtime, client, Duration::from_secs(5));

        let report = run_query(&ctx, ViewKind::Constructors, &[], 1, None).unwrap();
        assert_eq!(report, "No constructors found for the selected inputs.\n");
    }

    #[test]
    fn test_query_backend_error() {
        let runtime = runtime();
        let client = Arc::new(
            ScriptedClient::default().respond(Duration::ZERO, Ok(json!({"error": "No data"}))),
        );
        let ctx = context(&runtime, client, Duration::from_secs(5));

        match run_query(&ctx, ViewKind::Champions, &filters(&[("year", "1949")]), 1, None) {
            Err(AnemoiError::QueryFailed { hint, message }) => {
                assert_eq!(message, "No data");
                assert!(!hint.is_empty());
            }
            other => panic!("Expected a failed query, got {:?}", other),
        }
    }

    #[test]
    fn test_query_timeout() {
        let runtime = runtime();
        let client = Arc::new(
            ScriptedClient::default().respond(Duration::from_secs(3), Ok(drivers(1))),
        );
        let ctx = context(&runtime, client, Duration::from_millis(100));

        match run_query(&ctx, ViewKind::Drivers, &[], 1, None) {
            Err(AnemoiError::QueryFailed { message, .. }) => {
                assert!(message.starts_with("No response from backend"));
            }
            other => panic!("Expected a timed out query, got {:?}", other),
        }
    }

    #[test]
    fn test_query_validation_sends_nothing() {
        let runtime = runtime();
        let client = Arc::new(ScriptedClient::default());
        let ctx = context(&runtime, client.clone(), Duration::from_secs(5));

        let err = run_query(&ctx, ViewKind::Calendar, &[], 1, None).unwrap_err();
        assert!(matches!(err, AnemoiError::InvalidQuery { .. }));
        assert_eq!(client.request_count(), 0);
    }

    #[test]
    fn test_query_writes_image() {
        let runtime = runtime();
        let client = Arc::new(ScriptedClient::default().respond(
            Duration::ZERO,
            Ok(json!({
                "gp": "Monza", "year": 2021, "identifier": "Q",
                "driver1": "VER", "driver2": "HAM",
                "image_base64": "data:image/png;base64,iVBORw0KGgo="
            })),
        ));
        let ctx = context(&runtime, client, Duration::from_secs(5));
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dominance.png");

        let report = run_query(
            &ctx,
            ViewKind::TrackDominance,
            &filters(&[
                ("year", "2021"),
                ("grandPrix", "Monza"),
                ("sessionIdentifier", "Q"),
                ("driver1", "VER"),
                ("driver2", "HAM"),
            ]),
            1,
            Some(&path),
        )
        .unwrap();

        assert!(report.starts_with("Track Dominance: VER vs HAM\n"));
        assert!(report.contains("written to"));
        assert_eq!(std::fs::read(&path).unwrap(), b"\x89PNG\r\n\x1a\n");
    }
}
