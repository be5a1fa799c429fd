use std::fmt;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::errors::AnemoiError;

/// A JSON leaf value that may arrive as a string, a number or a boolean
/// depending on which backend data source produced it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => write!(f, "{}", s),
            Scalar::Number(n) => match n.as_f64() {
                // backend floats such as positions arrive as 1.0
                Some(v) if !n.is_i64() && !n.is_u64() && v.fract() == 0.0 && v.abs() < 1e15 => {
                    write!(f, "{}", v as i64)
                }
                _ => write!(f, "{}", n),
            },
            Scalar::Flag(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value.into())
    }
}

/// Decodes a base64 PNG, with or without a `data:` URI prefix.
pub fn decode_image(encoded: &str) -> Result<Vec<u8>, AnemoiError> {
    let data = match encoded.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => encoded,
    };
    base64::engine::general_purpose::STANDARD
        .decode(data.trim())
        .map_err(|e| AnemoiError::ImageDecode { source: e })
}

// events/{year}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EventSchedule {
    #[serde(default)]
    pub year: Option<Scalar>,
    #[serde(default)]
    pub events: Vec<ScheduledEvent>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduledEvent {
    #[serde(default)]
    pub round_number: Option<Scalar>,
    #[serde(default)]
    pub event_name: Option<Scalar>,
    #[serde(default)]
    pub country: Option<Scalar>,
    #[serde(default)]
    pub location: Option<Scalar>,
    #[serde(default)]
    pub event_date: Option<Scalar>,
    #[serde(default)]
    pub event_format: Option<Scalar>,
    #[serde(default)]
    pub qualifying: Option<Scalar>,
    #[serde(default)]
    pub race: Option<Scalar>,
}

// winners/{year}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Champions {
    #[serde(default)]
    pub year: Option<Scalar>,
    #[serde(default)]
    pub wdc: Option<Scalar>,
    #[serde(default)]
    pub wcc: Option<Scalar>,
}

// circuits

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CircuitList {
    #[serde(default)]
    pub circuits: Vec<Circuit>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circuit {
    #[serde(default)]
    pub circuit_name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub locality: Option<Scalar>,
    #[serde(default)]
    pub country: Option<Scalar>,
    #[serde(default)]
    pub lat: Option<Scalar>,
    #[serde(default)]
    pub long: Option<Scalar>,
    #[serde(default, rename = "Location")]
    pub location: Option<CircuitLocation>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CircuitLocation {
    #[serde(default)]
    pub locality: Option<Scalar>,
    #[serde(default)]
    pub country: Option<Scalar>,
    #[serde(default)]
    pub lat: Option<Scalar>,
    #[serde(default)]
    pub long: Option<Scalar>,
}

// constructors

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ConstructorList {
    #[serde(default)]
    pub constructors: Vec<Constructor>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Constructor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nationality: Option<Scalar>,
    #[serde(default)]
    pub url: Option<String>,
}

// drivers

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DriverList {
    #[serde(default)]
    pub drivers: Vec<Driver>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub code: Option<Scalar>,
    #[serde(default)]
    pub date_of_birth: Option<Scalar>,
    #[serde(default)]
    pub nationality: Option<Scalar>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Driver {
    pub fn full_name(&self) -> Option<String> {
        let name = [self.given_name.as_deref(), self.family_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        (!name.is_empty()).then_some(name)
    }
}

// session

#[derive(Clone, Debug, Deserialize)]
pub struct SessionOverview {
    pub session: SessionDetails,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SessionDetails {
    #[serde(default)]
    pub year: Option<Scalar>,
    #[serde(default)]
    pub grand_prix: Option<Scalar>,
    #[serde(default)]
    pub session: Option<Scalar>,
    #[serde(default)]
    pub date: Option<Scalar>,
    #[serde(default)]
    pub event: Option<Scalar>,
    #[serde(default)]
    pub location: Option<Scalar>,
    #[serde(default)]
    pub results: Vec<SessionResult>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SessionResult {
    #[serde(default)]
    pub position: Option<Scalar>,
    #[serde(default)]
    pub full_name: Option<Scalar>,
    #[serde(default)]
    pub headshot_url: Option<String>,
    #[serde(default)]
    pub team_name: Option<Scalar>,
    #[serde(default)]
    pub time: Option<Scalar>,
    #[serde(default)]
    pub status: Option<Scalar>,
    #[serde(default)]
    pub points: Option<Scalar>,
}

// standings

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Standings {
    #[serde(default)]
    pub year: Option<Scalar>,
    #[serde(default)]
    pub standings: Vec<StandingEntry>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StandingEntry {
    #[serde(default)]
    pub position: Option<Scalar>,
    #[serde(default)]
    pub driver: Option<StandingDriver>,
    #[serde(default)]
    pub constructor: Option<StandingConstructor>,
    #[serde(default)]
    pub points: Option<Scalar>,
    #[serde(default)]
    pub wins: Option<Scalar>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StandingDriver {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "URL")]
    pub url: Option<String>,
    #[serde(default)]
    pub permanent_number: Option<Scalar>,
    #[serde(default)]
    pub nationality: Option<Scalar>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StandingConstructor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "URL")]
    pub url: Option<String>,
    #[serde(default)]
    pub nationality: Option<Scalar>,
}

// telemetry

/// The telemetry endpoint answers either with a fastest-lap plot for one
/// driver or with a per-driver results table.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum TelemetryReport {
    Results(TelemetryResults),
    FastestLap(FastestLapReport),
}

#[derive(Clone, Debug, Deserialize)]
pub struct TelemetryResults {
    pub results: Vec<TelemetryEntry>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TelemetryEntry {
    #[serde(default, rename = "DriverName")]
    pub driver_name: Option<Scalar>,
    #[serde(default, rename = "HeadshotUrl")]
    pub headshot_url: Option<String>,
    #[serde(default, rename = "Speed")]
    pub speed: Option<Scalar>,
    #[serde(default, rename = "RPM")]
    pub rpm: Option<Scalar>,
    #[serde(default, rename = "Gear")]
    pub gear: Option<Scalar>,
    #[serde(default, rename = "Status")]
    pub status: Option<Scalar>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FastestLapReport {
    pub session: LapSession,
    #[serde(default)]
    pub image_base64: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LapSession {
    #[serde(default)]
    pub grand_prix: Option<Scalar>,
    #[serde(default)]
    pub year: Option<Scalar>,
    #[serde(default)]
    pub session: Option<Scalar>,
    #[serde(default)]
    pub driver: Option<Scalar>,
    #[serde(default)]
    pub event: Option<Scalar>,
    #[serde(default)]
    pub location: Option<Scalar>,
}

// driver-comparison and track-dominance

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DriverComparison {
    #[serde(default)]
    pub gp: Option<Scalar>,
    #[serde(default)]
    pub year: Option<Scalar>,
    #[serde(default)]
    pub identifier: Option<Scalar>,
    #[serde(default)]
    pub driver1: Option<Scalar>,
    #[serde(default)]
    pub driver2: Option<Scalar>,
    #[serde(default)]
    pub closest_lap: Option<Scalar>,
    #[serde(default)]
    pub image_base64: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TrackDominance {
    #[serde(default)]
    pub gp: Option<Scalar>,
    #[serde(default)]
    pub year: Option<Scalar>,
    #[serde(default)]
    pub identifier: Option<Scalar>,
    #[serde(default)]
    pub driver1: Option<Scalar>,
    #[serde(default)]
    pub driver2: Option<Scalar>,
    #[serde(default)]
    pub image_base64: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_display_drops_zero_fraction() {
        let position: Scalar = serde_json::from_value(json!(1.0)).unwrap();
        assert_eq!(position.to_string(), "1");
        let points: Scalar = serde_json::from_value(json!(12.5)).unwrap();
        assert_eq!(points.to_string(), "12.5");
        let wins: Scalar = serde_json::from_value(json!("3")).unwrap();
        assert_eq!(wins.to_string(), "3");
    }

    #[test]
    fn test_telemetry_report_variants() {
        let lap: TelemetryReport = serde_json::from_value(json!({
            "session": {"GrandPrix": "Monza", "Year": 2021, "Driver": "HAM"},
            "image_base64": "aGVsbG8="
        }))
        .unwrap();
        assert!(matches!(lap, TelemetryReport::FastestLap(_)));

        let results: TelemetryReport = serde_json::from_value(json!({
            "results": [{"DriverName": "Lewis Hamilton", "Speed": 330.1, "RPM": 11800, "Gear": 8}]
        }))
        .unwrap();
        match results {
            TelemetryReport::Results(r) => assert_eq!(r.results.len(), 1),
            _ => panic!("Expected telemetry results"),
        }
    }

    #[test]
    fn test_standings_decoding() {
        let standings: Standings = serde_json::from_value(json!({
            "Year": "2021",
            "Standings": [{
                "Position": "1",
                "Driver": {"Name": "Max Verstappen", "URL": "http://en.wikipedia.org/wiki/Max_Verstappen", "PermanentNumber": "33"},
                "Constructor": {"Name": "Red Bull", "URL": "http://en.wikipedia.org/wiki/Red_Bull_Racing"},
                "Points": "395.5",
                "Wins": "10"
            }]
        }))
        .unwrap();
        let entry = &standings.standings[0];
        assert_eq!(entry.driver.as_ref().unwrap().url.as_deref(), Some("http://en.wikipedia.org/wiki/Max_Verstappen"));
        assert!(entry.driver.as_ref().unwrap().nationality.is_none());
    }

    #[test]
    fn test_decode_image_accepts_data_uri() {
        assert_eq!(decode_image("aGVsbG8=").unwrap(), b"hello");
        assert_eq!(decode_image("data:image/png;base64,aGVsbG8=").unwrap(), b"hello");
        assert!(matches!(
            decode_image("not base64!"),
            Err(AnemoiError::ImageDecode { .. })
        ));
    }

    #[test]
    fn test_driver_full_name() {
        let driver = Driver {
            given_name: Some("Lewis".to_string()),
            family_name: Some("Hamilton".to_string()),
            ..Driver::default()
        };
        assert_eq!(driver.full_name().as_deref(), Some("Lewis Hamilton"));
        assert_eq!(Driver::default().full_name(), None);
    }
}
