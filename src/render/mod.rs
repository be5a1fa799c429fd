//! Turns decoded payloads into display rows, details and images.
//!
//! Missing optional values are always shown as [`MISSING`] so that every
//! table cell is visibly populated. Which columns a table has depends only on
//! the entity type and the active mode, never on the data.

mod payloads;
mod tables;

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::api::types::Scalar;
use crate::query::FilterState;

pub use tables::StandingType;

/// Display value used in place of missing or null optional fields.
pub const MISSING: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    /// External reference, opened in a new browsing context by the front end.
    Link { text: String, url: String },
}

impl Cell {
    pub fn text(&self) -> &str {
        match self {
            Cell::Text(text) | Cell::Link { text, .. } => text,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Cell::Link { url, .. } => Some(url),
            Cell::Text(_) => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Round,
    Event,
    Country,
    Location,
    Date,
    EventFormat,
    QualifyingDate,
    RaceDate,
    Year,
    WorldDriversChampion,
    WorldConstructorsChampion,
    Circuit,
    Locality,
    Latitude,
    Longitude,
    Constructor,
    Nationality,
    Driver,
    Code,
    DateOfBirth,
    Position,
    Number,
    Team,
    Time,
    Status,
    Points,
    Wins,
    Speed,
    Rpm,
    Gear,
}

impl Column {
    pub fn title(&self) -> &'static str {
        match self {
            Column::Round => "Round",
            Column::Event => "Event",
            Column::Country => "Country",
            Column::Location => "Location",
            Column::Date => "Date",
            Column::EventFormat => "Event Format",
            Column::QualifyingDate => "Qualifying Date",
            Column::RaceDate => "Race Date",
            Column::Year => "Year",
            Column::WorldDriversChampion => "WDC Winner",
            Column::WorldConstructorsChampion => "WCC Winner",
            Column::Circuit => "Circuit",
            Column::Locality => "Locality",
            Column::Latitude => "Latitude",
            Column::Longitude => "Longitude",
            Column::Constructor => "Constructor",
            Column::Nationality => "Nationality",
            Column::Driver => "Driver",
            Column::Code => "Code Name",
            Column::DateOfBirth => "Date Of Birth",
            Column::Position => "Position",
            Column::Number => "Number",
            Column::Team => "Team",
            Column::Time => "Time",
            Column::Status => "Status",
            Column::Points => "Points",
            Column::Wins => "Wins",
            Column::Speed => "Speed",
            Column::Rpm => "RPM",
            Column::Gear => "Gear",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

/// An entity that can be displayed as a table row.
pub trait Tabular {
    type Mode: Copy;

    fn columns(mode: Self::Mode) -> &'static [Column];

    fn cell(&self, column: Column, mode: Self::Mode) -> Cell;
}

pub fn render_rows<E: Tabular>(entities: &[E], mode: E::Mode) -> Vec<Row> {
    let columns = E::columns(mode);
    entities
        .iter()
        .map(|entity| Row {
            cells: columns.iter().map(|c| entity.cell(*c, mode)).collect(),
        })
        .collect()
}

pub fn render_table<E: Tabular>(entities: &[E], mode: E::Mode) -> Table {
    Table {
        columns: E::columns(mode).to_vec(),
        rows: render_rows(entities, mode),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub title: String,
    pub png: Arc<[u8]>,
}

/// Everything a view shows for one successful response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    pub heading: Option<String>,
    pub details: Vec<(&'static str, String)>,
    pub table: Option<Table>,
    pub image: Option<RenderedImage>,
    pub notice: Option<String>,
}

impl Rendered {
    pub fn rows(&self) -> &[Row] {
        self.table.as_ref().map(|t| t.rows.as_slice()).unwrap_or(&[])
    }

    /// True when the response carried no records at all.
    pub fn is_empty(&self) -> bool {
        self.details.is_empty() && self.rows().is_empty() && self.image.is_none()
    }
}

/// A decoded endpoint response. `filters` are the ones the request was
/// submitted with, used to pick the display mode.
pub trait Payload: DeserializeOwned + Send + 'static {
    fn render(&self, filters: &FilterState) -> Rendered;
}

fn non_blank(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty() && value != "None" && value != "NaN").then_some(value)
}

pub(crate) fn display(value: Option<&Scalar>) -> String {
    value
        .map(|v| v.to_string())
        .as_deref()
        .and_then(non_blank)
        .unwrap_or(MISSING)
        .to_string()
}

pub(crate) fn text_cell(value: Option<&Scalar>) -> Cell {
    Cell::Text(display(value))
}

pub(crate) fn str_cell(value: Option<&str>) -> Cell {
    Cell::Text(value.and_then(non_blank).unwrap_or(MISSING).to_string())
}

/// Only the date part of a timestamp such as `2021-03-28 15:00:00`.
pub(crate) fn date_cell(value: Option<&Scalar>) -> Cell {
    let date = value
        .map(|v| v.to_string())
        .and_then(|v| v.split_whitespace().next().map(str::to_string))
        .filter(|d| d != "NaT" && non_blank(d).is_some());
    Cell::Text(date.unwrap_or_else(|| MISSING.to_string()))
}

pub(crate) fn link_cell(text: Option<&str>, url: Option<&str>) -> Cell {
    let text = text.and_then(non_blank).unwrap_or(MISSING).to_string();
    match url.and_then(non_blank) {
        Some(url) => Cell::Link {
            text,
            url: url.to_string(),
        },
        None => Cell::Text(text),
    }
}

pub(crate) fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_values_use_sentinel() {
        assert_eq!(text_cell(None), Cell::Text(MISSING.to_string()));
        assert_eq!(text_cell(Some(&Scalar::from(""))), Cell::Text(MISSING.to_string()));
        assert_eq!(str_cell(Some("None")), Cell::Text(MISSING.to_string()));
        assert_eq!(text_cell(Some(&Scalar::from(7))), Cell::Text("7".to_string()));
    }

    #[test]
    fn test_date_cell_keeps_date_part() {
        assert_eq!(
            date_cell(Some(&Scalar::from("2021-03-28 15:00:00"))),
            Cell::Text("2021-03-28".to_string())
        );
        assert_eq!(date_cell(Some(&Scalar::from("NaT"))), Cell::Text(MISSING.to_string()));
        assert_eq!(date_cell(None), Cell::Text(MISSING.to_string()));
    }

    #[test]
    fn test_link_without_url_is_text() {
        assert_eq!(
            link_cell(Some("Monza"), Some("http://en.wikipedia.org/wiki/Monza_Circuit")),
            Cell::Link {
                text: "Monza".to_string(),
                url: "http://en.wikipedia.org/wiki/Monza_Circuit".to_string()
            }
        );
        assert_eq!(link_cell(Some("Monza"), None), Cell::Text("Monza".to_string()));
        assert_eq!(link_cell(None, Some("")).text(), MISSING);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("abu DHABI grand prix"), "Abu Dhabi Grand Prix");
        assert_eq!(title_case("  race "), "Race");
    }
}
