use std::fmt;
use std::str::FromStr;

use crate::api::types::{
    Champions, Circuit, Constructor, Driver, ScheduledEvent, SessionResult, StandingEntry,
    TelemetryEntry,
};
use crate::errors::AnemoiError;

use super::{Cell, Column, Tabular, date_cell, link_cell, str_cell, text_cell};

/// Championship the standings table is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StandingType {
    #[default]
    DriverStandings,
    ConstructorStandings,
}

impl StandingType {
    pub const CHOICES: &'static [(&'static str, &'static str)] = &[
        ("driverStandings", "Driver Standings"),
        ("constructorStandings", "Constructor Standings"),
    ];

    pub fn wire_value(&self) -> &'static str {
        match self {
            StandingType::DriverStandings => "driverStandings",
            StandingType::ConstructorStandings => "constructorStandings",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            StandingType::DriverStandings => "Driver Standings",
            StandingType::ConstructorStandings => "Constructor Standings",
        }
    }
}

impl fmt::Display for StandingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_value())
    }
}

impl FromStr for StandingType {
    type Err = AnemoiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "driverStandings" => Ok(StandingType::DriverStandings),
            "constructorStandings" => Ok(StandingType::ConstructorStandings),
            other => Err(AnemoiError::InvalidFilterArgument {
                input: other.to_string(),
            }),
        }
    }
}

impl Tabular for ScheduledEvent {
    type Mode = ();

    fn columns(_: ()) -> &'static [Column] {
        &[
            Column::Round,
            Column::Event,
            Column::Country,
            Column::Location,
            Column::Date,
            Column::EventFormat,
            Column::QualifyingDate,
            Column::RaceDate,
        ]
    }

    fn cell(&self, column: Column, _: ()) -> Cell {
        match column {
            Column::Round => text_cell(self.round_number.as_ref()),
            Column::Event => text_cell(self.event_name.as_ref()),
            Column::Country => text_cell(self.country.as_ref()),
            Column::Location => text_cell(self.location.as_ref()),
            Column::Date => date_cell(self.event_date.as_ref()),
            Column::EventFormat => text_cell(self.event_format.as_ref()),
            Column::QualifyingDate => date_cell(self.qualifying.as_ref()),
            Column::RaceDate => date_cell(self.race.as_ref()),
            _ => str_cell(None),
        }
    }
}

impl Tabular for Champions {
    type Mode = ();

    fn columns(_: ()) -> &'static [Column] {
        &[
            Column::Year,
            Column::WorldDriversChampion,
            Column::WorldConstructorsChampion,
        ]
    }

    fn cell(&self, column: Column, _: ()) -> Cell {
        match column {
            Column::Year => text_cell(self.year.as_ref()),
            Column::WorldDriversChampion => text_cell(self.wdc.as_ref()),
            Column::WorldConstructorsChampion => text_cell(self.wcc.as_ref()),
            _ => str_cell(None),
        }
    }
}

impl Tabular for Circuit {
    type Mode = ();

    fn columns(_: ()) -> &'static [Column] {
        &[
            Column::Circuit,
            Column::Locality,
            Column::Country,
            Column::Latitude,
            Column::Longitude,
        ]
    }

    fn cell(&self, column: Column, _: ()) -> Cell {
        // nested Ergast location wins over the flat fields
        let nested = self.location.as_ref();
        match column {
            Column::Circuit => link_cell(self.circuit_name.as_deref(), self.url.as_deref()),
            Column::Locality => text_cell(
                nested
                    .and_then(|l| l.locality.as_ref())
                    .or(self.locality.as_ref()),
            ),
            Column::Country => text_cell(
                nested
                    .and_then(|l| l.country.as_ref())
                    .or(self.country.as_ref()),
            ),
            Column::Latitude => text_cell(nested.and_then(|l| l.lat.as_ref()).or(self.lat.as_ref())),
            Column::Longitude => {
                text_cell(nested.and_then(|l| l.long.as_ref()).or(self.long.as_ref()))
            }
            _ => str_cell(None),
        }
    }
}

impl Tabular for Constructor {
    type Mode = ();

    fn columns(_: ()) -> &'static [Column] {
        &[Column::Constructor, Column::Nationality]
    }

    fn cell(&self, column: Column, _: ()) -> Cell {
        match column {
            Column::Constructor => link_cell(self.name.as_deref(), self.url.as_deref()),
            Column::Nationality => text_cell(self.nationality.as_ref()),
            _ => str_cell(None),
        }
    }
}

impl Tabular for Driver {
    type Mode = ();

    fn columns(_: ()) -> &'static [Column] {
        &[
            Column::Driver,
            Column::Code,
            Column::DateOfBirth,
            Column::Nationality,
        ]
    }

    fn cell(&self, column: Column, _: ()) -> Cell {
        match column {
            Column::Driver => link_cell(self.full_name().as_deref(), self.url.as_deref()),
            Column::Code => text_cell(self.code.as_ref()),
            Column::DateOfBirth => date_cell(self.date_of_birth.as_ref()),
            Column::Nationality => text_cell(self.nationality.as_ref()),
            _ => str_cell(None),
        }
    }
}

impl Tabular for SessionResult {
    type Mode = ();

    fn columns(_: ()) -> &'static [Column] {
        &[
            Column::Position,
            Column::Driver,
            Column::Team,
            Column::Time,
            Column::Status,
            Column::Points,
        ]
    }

    fn cell(&self, column: Column, _: ()) -> Cell {
        match column {
            Column::Position => text_cell(self.position.as_ref()),
            Column::Driver => text_cell(self.full_name.as_ref()),
            Column::Team => text_cell(self.team_name.as_ref()),
            Column::Time => text_cell(self.time.as_ref()),
            Column::Status => text_cell(self.status.as_ref()),
            Column::Points => text_cell(self.points.as_ref()),
            _ => str_cell(None),
        }
    }
}

impl Tabular for StandingEntry {
    type Mode = StandingType;

    fn columns(mode: StandingType) -> &'static [Column] {
        match mode {
            StandingType::DriverStandings => &[
                Column::Position,
                Column::Driver,
                Column::Number,
                Column::Nationality,
                Column::Constructor,
                Column::Points,
                Column::Wins,
            ],
            StandingType::ConstructorStandings => &[
                Column::Position,
                Column::Constructor,
                Column::Nationality,
                Column::Points,
                Column::Wins,
            ],
        }
    }

    fn cell(&self, column: Column, mode: StandingType) -> Cell {
        let driver = self.driver.as_ref();
        let constructor = self.constructor.as_ref();
        match column {
            Column::Position => text_cell(self.position.as_ref()),
            Column::Driver => link_cell(
                driver.and_then(|d| d.name.as_deref()),
                driver.and_then(|d| d.url.as_deref()),
            ),
            Column::Number => text_cell(driver.and_then(|d| d.permanent_number.as_ref())),
            Column::Nationality => match mode {
                StandingType::DriverStandings => {
                    text_cell(driver.and_then(|d| d.nationality.as_ref()))
                }
                StandingType::ConstructorStandings => {
                    text_cell(constructor.and_then(|c| c.nationality.as_ref()))
                }
            },
            Column::Constructor => link_cell(
                constructor.and_then(|c| c.name.as_deref()),
                constructor.and_then(|c| c.url.as_deref()),
            ),
            Column::Points => text_cell(self.points.as_ref()),
            Column::Wins => text_cell(self.wins.as_ref()),
            _ => str_cell(None),
        }
    }
}

impl Tabular for TelemetryEntry {
    type Mode = ();

    fn columns(_: ()) -> &'static [Column] {
        &[
            Column::Driver,
            Column::Speed,
            Column::Rpm,
            Column::Gear,
            Column::Status,
        ]
    }

    fn cell(&self, column: Column, _: ()) -> Cell {
        match column {
            Column::Driver => text_cell(self.driver_name.as_ref()),
            Column::Speed => text_cell(self.speed.as_ref()),
            Column::Rpm => text_cell(self.rpm.as_ref()),
            Column::Gear => text_cell(self.gear.as_ref()),
            Column::Status => text_cell(self.status.as_ref()),
            _ => str_cell(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{CircuitList, Standings};
    use crate::render::{MISSING, render_rows, render_table};
    use proptest::prelude::*;
    use serde_json::json;

    fn standings() -> Standings {
        serde_json::from_value(json!({
            "Year": "2021",
            "Standings": [{
                "Position": "1",
                "Driver": {"Name": "Max Verstappen", "URL": "http://en.wikipedia.org/wiki/Max_Verstappen", "PermanentNumber": "33", "Nationality": "Dutch"},
                "Constructor": {"Name": "Red Bull", "URL": "http://en.wikipedia.org/wiki/Red_Bull_Racing", "Nationality": "Austrian"},
                "Points": 395.5,
                "Wins": 10.0
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_standing_columns_follow_mode() {
        let data = standings();
        let drivers = render_table(&data.standings, StandingType::DriverStandings);
        let constructors = render_table(&data.standings, StandingType::ConstructorStandings);

        assert_eq!(drivers.columns.len(), 7);
        assert_eq!(constructors.columns.len(), 5);
        assert!(!constructors.columns.contains(&Column::Driver));
        assert!(!constructors.columns.contains(&Column::Number));

        let row = &drivers.rows[0].cells;
        assert_eq!(row[1].url(), Some("http://en.wikipedia.org/wiki/Max_Verstappen"));
        assert_eq!(row[3].text(), "Dutch");
        assert_eq!(row[5].text(), "395.5");
        assert_eq!(row[6].text(), "10");

        let row = &constructors.rows[0].cells;
        assert_eq!(row[1].text(), "Red Bull");
        assert_eq!(row[2].text(), "Austrian");
    }

    #[test]
    fn test_columns_do_not_depend_on_data() {
        let empty: Vec<StandingEntry> = vec![StandingEntry::default()];
        let rows = render_rows(&empty, StandingType::DriverStandings);
        assert_eq!(rows[0].cells.len(), 7);
        assert!(rows[0].cells.iter().all(|c| c.text() == MISSING));
    }

    #[test]
    fn test_standing_type_parse() {
        assert_eq!(
            "constructorStandings".parse::<StandingType>().unwrap(),
            StandingType::ConstructorStandings
        );
        assert!("teams".parse::<StandingType>().is_err());
    }

    #[test]
    fn test_circuit_location_shapes() {
        let list: CircuitList = serde_json::from_value(json!({
            "circuits": [
                {"circuitName": "Monza", "url": "http://en.wikipedia.org/wiki/Monza_Circuit",
                 "locality": "Monza", "country": "Italy", "lat": "45.6156", "long": "9.28111"},
                {"circuitName": "Spa", "Location": {"locality": "Spa", "country": "Belgium", "lat": "50.4372", "long": "5.97139"},
                 "country": "ignored"}
            ]
        }))
        .unwrap();
        let rows = render_rows(&list.circuits, ());
        assert_eq!(rows[0].cells[2].text(), "Italy");
        assert_eq!(rows[1].cells[2].text(), "Belgium");
        assert_eq!(rows[1].cells[0], Cell::Text("Spa".to_string()));
    }

    #[test]
    fn test_calendar_dates_trimmed() {
        let event: ScheduledEvent = serde_json::from_value(json!({
            "RoundNumber": 1,
            "EventName": "Bahrain Grand Prix",
            "EventDate": "2021-03-28 00:00:00",
            "Qualifying": "NaT",
            "Race": "2021-03-28 15:00:00"
        }))
        .unwrap();
        let row = &render_rows(&[event], ())[0].cells;
        assert_eq!(row[0].text(), "1");
        assert_eq!(row[2].text(), MISSING);
        assert_eq!(row[4].text(), "2021-03-28");
        assert_eq!(row[6].text(), MISSING);
        assert_eq!(row[7].text(), "2021-03-28");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_missing_nationality_renders_sentinel(
            given in proptest::option::of("[A-Z][a-z]{1,8}"),
            family in proptest::option::of("[A-Z][a-z]{1,8}"),
            code in proptest::option::of("[A-Z]{3}"),
            blank in "( *|None)?",
        ) {
            let nationality = if blank.is_empty() { None } else { Some(blank.as_str().into()) };
            let driver = Driver {
                given_name: given,
                family_name: family,
                code: code.as_deref().map(Into::into),
                nationality,
                ..Driver::default()
            };
            let row = &render_rows(&[driver], ())[0];
            prop_assert_eq!(row.cells[3].text(), MISSING);
            for cell in &row.cells {
                prop_assert!(!cell.text().is_empty());
            }
        }

        #[test]
        fn prop_constructor_nationality_never_empty(name in proptest::option::of("[A-Za-z ]{0,10}")) {
            let constructor = Constructor { name, ..Constructor::default() };
            let row = &render_rows(&[constructor], ())[0];
            prop_assert_eq!(row.cells[1].text(), MISSING);
            prop_assert!(!row.cells[0].text().is_empty());
        }
    }
}
