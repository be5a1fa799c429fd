// Declarative description of every view: its form, rules and endpoint

use crate::api::Endpoint;
use crate::query::{DependencyRule, FieldKind, FieldSpec, QueryModel};
use crate::render::StandingType;

use super::ViewKind;

pub const SESSION_IDENTIFIERS: &[&str] = &[
    "Race",
    "Qualifying",
    "Sprint",
    "Sprint Qualifying",
    "Practice 1",
    "Practice 2",
    "Practice 3",
];

#[derive(Debug, Clone, Copy)]
pub struct ViewSpec {
    pub kind: ViewKind,
    pub endpoint: Endpoint,
    pub query: QueryModel,
    /// Results are sliced into pages of `PAGE_SIZE` rows.
    pub paginated: bool,
    /// An unfiltered request is issued as soon as the view is mounted.
    pub fetch_on_mount: bool,
    pub submit_label: &'static str,
    pub empty_message: &'static str,
    pub error_hint: &'static str,
}

impl ViewSpec {
    pub fn fields(&self) -> &'static [FieldSpec] {
        self.query.fields()
    }
}

const YEAR: FieldSpec = FieldSpec::numeric("year", "year", "Year").hint("Enter Year");
const GRAND_PRIX: FieldSpec =
    FieldSpec::text("grandPrix", "gp", "Grand Prix").hint("Enter Grand Prix Name");
const SESSION_IDENTIFIER: FieldSpec =
    FieldSpec::text("sessionIdentifier", "identifier", "Session")
        .hint("Enter Session Identifier (e.g., Race)")
        .kind(FieldKind::Suggest(SESSION_IDENTIFIERS));
const DRIVER_ONE: FieldSpec = FieldSpec::text("driver1", "driver1", "Driver 1")
    .hint("Enter Driver 1 (e.g., HAM)")
    .required();
const DRIVER_TWO: FieldSpec = FieldSpec::text("driver2", "driver2", "Driver 2")
    .hint("Enter Driver 2 (e.g., VER)")
    .required();

const SESSION_FIELDS: &[FieldSpec] = &[
    YEAR.required(),
    GRAND_PRIX.required(),
    SESSION_IDENTIFIER.required(),
];

const LAP_FIELDS: &[FieldSpec] = &[
    YEAR.required(),
    GRAND_PRIX.required(),
    SESSION_IDENTIFIER.required(),
    FieldSpec::text("driver", "driver", "Driver")
        .hint("Enter Driver (e.g., HAM)")
        .required(),
];

const TELEMETRY_FIELDS: &[FieldSpec] = &[
    YEAR.required(),
    GRAND_PRIX.required(),
    SESSION_IDENTIFIER.required(),
    FieldSpec::text("driver", "driver", "Driver").hint("Enter Driver (e.g., HAM)"),
];

const DOMINANCE_FIELDS: &[FieldSpec] = &[
    YEAR.required(),
    GRAND_PRIX.required(),
    SESSION_IDENTIFIER.required(),
    DRIVER_ONE,
    DRIVER_TWO,
];

const COMPARISON_FIELDS: &[FieldSpec] = &[
    YEAR.required(),
    GRAND_PRIX.required(),
    SESSION_IDENTIFIER.required(),
    DRIVER_ONE,
    DRIVER_TWO,
    FieldSpec::numeric("stint", "stint", "Stint")
        .hint("Enter Stint Number (default: 1)")
        .initial("1"),
];

const CIRCUIT_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("search", "search", "Search").hint("Search Circuits (e.g., Catalunya)"),
    YEAR.hint("Year (e.g., 2021)"),
    FieldSpec::text("driverId", "driver_id", "Driver ID").hint("Driver ID (e.g., hamilton)"),
    FieldSpec::text("constructorId", "constructor_id", "Constructor ID")
        .hint("Constructor ID (e.g., ferrari)"),
    FieldSpec::text("country", "country", "Country").hint("Country (e.g., Italy)"),
];

const CONSTRUCTOR_FIELDS: &[FieldSpec] = &[
    YEAR.hint("Year (e.g., 2010)"),
    FieldSpec::text("driverId", "driver_id", "Driver ID").hint("Driver ID (e.g., alonso)"),
    FieldSpec::text("circuitId", "circuit_id", "Circuit ID")
        .hint("Circuit ID (e.g., albert_park)"),
    FieldSpec::text("country", "country", "Country").hint("Country (e.g., Australia)"),
];

const DRIVER_FIELDS: &[FieldSpec] = &[
    YEAR.hint("Year (e.g., 2020)"),
    FieldSpec::numeric("round", "round", "Round").hint("Round (e.g., 5)"),
    FieldSpec::text("constructorId", "constructor_id", "Constructor ID")
        .hint("Constructor ID (e.g., ferrari)"),
    FieldSpec::text("circuitId", "circuit_id", "Circuit ID").hint("Circuit ID (e.g., monza)"),
    FieldSpec::text("driverId", "driver_id", "Driver ID").hint("Driver ID (e.g., hamilton)"),
];

const STANDING_FIELDS: &[FieldSpec] = &[
    YEAR.required(),
    FieldSpec::text("standingType", "type", "Standing Type")
        .hint("Select Standing Type")
        .required()
        .kind(FieldKind::Choice(StandingType::CHOICES)),
];

const YEAR_ONLY: &[FieldSpec] = &[YEAR.required()];

const CIRCUIT_RULES: &[DependencyRule] = &[DependencyRule::new("constructorId", "driverId")];
const CONSTRUCTOR_RULES: &[DependencyRule] = &[DependencyRule::new("driverId", "year")];
const DRIVER_RULES: &[DependencyRule] = &[DependencyRule::new("round", "year")];

static CALENDAR: ViewSpec = ViewSpec {
    kind: ViewKind::Calendar,
    endpoint: Endpoint::Events,
    query: QueryModel::new(YEAR_ONLY, &[]),
    paginated: false,
    fetch_on_mount: false,
    submit_label: "Get Calendar",
    empty_message: "No events scheduled for this season.",
    error_hint: "Sorry, no calendar found for the provided year.",
};

static CHAMPIONS: ViewSpec = ViewSpec {
    kind: ViewKind::Champions,
    endpoint: Endpoint::Winners,
    query: QueryModel::new(YEAR_ONLY, &[]),
    paginated: false,
    fetch_on_mount: false,
    submit_label: "Get Champions",
    empty_message: "No champions recorded for this season.",
    error_hint: "Sorry, no championship data found for the provided year.",
};

static SESSION: ViewSpec = ViewSpec {
    kind: ViewKind::Session,
    endpoint: Endpoint::Session,
    query: QueryModel::new(SESSION_FIELDS, &[]),
    paginated: false,
    fetch_on_mount: false,
    submit_label: "Get Session Details",
    empty_message: "No results available for this session.",
    error_hint: "Sorry, no session data found for the provided input. Please try again with different values.",
};

static STANDINGS: ViewSpec = ViewSpec {
    kind: ViewKind::Standings,
    endpoint: Endpoint::Standings,
    query: QueryModel::new(STANDING_FIELDS, &[]),
    paginated: false,
    fetch_on_mount: false,
    submit_label: "Get Standings",
    empty_message: "No standings available for this season.",
    error_hint: "Sorry, no standings data found for the provided input. Please try again with different values.",
};

static CIRCUITS: ViewSpec = ViewSpec {
    kind: ViewKind::Circuits,
    endpoint: Endpoint::Circuits,
    query: QueryModel::new(CIRCUIT_FIELDS, CIRCUIT_RULES),
    paginated: true,
    fetch_on_mount: true,
    submit_label: "Search",
    empty_message: "No circuits found for the selected inputs.",
    error_hint: "Unable to fetch circuit data. Please check your inputs.",
};

static CONSTRUCTORS: ViewSpec = ViewSpec {
    kind: ViewKind::Constructors,
    endpoint: Endpoint::Constructors,
    query: QueryModel::new(CONSTRUCTOR_FIELDS, CONSTRUCTOR_RULES),
    paginated: true,
    fetch_on_mount: true,
    submit_label: "Search",
    empty_message: "No constructors found for the selected inputs.",
    error_hint: "Unable to fetch constructor data. Please check your inputs.",
};

static DRIVERS: ViewSpec = ViewSpec {
    kind: ViewKind::Drivers,
    endpoint: Endpoint::Drivers,
    query: QueryModel::new(DRIVER_FIELDS, DRIVER_RULES),
    paginated: true,
    fetch_on_mount: true,
    submit_label: "Search",
    empty_message: "No drivers found for the selected inputs.",
    error_hint: "Unable to fetch driver data. Please check your inputs.",
};

static FASTEST_LAP: ViewSpec = ViewSpec {
    kind: ViewKind::FastestLap,
    endpoint: Endpoint::Telemetry,
    query: QueryModel::new(LAP_FIELDS, &[]),
    paginated: false,
    fetch_on_mount: false,
    submit_label: "Get Fastest Lap",
    empty_message: "No fastest lap recorded for this driver.",
    error_hint: "Sorry, no telemetry details found for the provided input. Please try again with different values.",
};

static TELEMETRY: ViewSpec = ViewSpec {
    kind: ViewKind::Telemetry,
    endpoint: Endpoint::Telemetry,
    query: QueryModel::new(TELEMETRY_FIELDS, &[]),
    paginated: false,
    fetch_on_mount: false,
    submit_label: "Get Telemetry Details",
    empty_message: "No telemetry available for this session.",
    error_hint: "Sorry, no telemetry details found for the provided input. Please try again with different values.",
};

static TRACK_DOMINANCE: ViewSpec = ViewSpec {
    kind: ViewKind::TrackDominance,
    endpoint: Endpoint::TrackDominance,
    query: QueryModel::new(DOMINANCE_FIELDS, &[]),
    paginated: false,
    fetch_on_mount: false,
    submit_label: "Compare Drivers",
    empty_message: "No track dominance data for these drivers.",
    error_hint: "Sorry, no track dominance data found for the provided input. Please try again with different values.",
};

static DRIVER_COMPARISON: ViewSpec = ViewSpec {
    kind: ViewKind::DriverComparison,
    endpoint: Endpoint::DriverComparison,
    query: QueryModel::new(COMPARISON_FIELDS, &[]),
    paginated: false,
    fetch_on_mount: false,
    submit_label: "Compare Drivers",
    empty_message: "No comparison data for these drivers.",
    error_hint: "Sorry, no driver comparison data found for the provided input. Please try again with different values or check if both drivers were on track during the same stint.",
};

pub fn view_spec(kind: ViewKind) -> &'static ViewSpec {
    match kind {
        ViewKind::Calendar => &CALENDAR,
        ViewKind::Champions => &CHAMPIONS,
        ViewKind::Session => &SESSION,
        ViewKind::Standings => &STANDINGS,
        ViewKind::Circuits => &CIRCUITS,
        ViewKind::Constructors => &CONSTRUCTORS,
        ViewKind::Drivers => &DRIVERS,
        ViewKind::FastestLap => &FASTEST_LAP,
        ViewKind::Telemetry => &TELEMETRY,
        ViewKind::TrackDominance => &TRACK_DOMINANCE,
        ViewKind::DriverComparison => &DRIVER_COMPARISON,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ValidationError;

    #[test]
    fn test_every_view_has_a_spec_for_itself() {
        for kind in ViewKind::ALL {
            let spec = view_spec(*kind);
            assert_eq!(spec.kind, *kind);
            assert!(!spec.fields().is_empty());
        }
    }

    #[test]
    fn test_mount_fetching_views_need_no_input() {
        for kind in ViewKind::ALL {
            let spec = view_spec(*kind);
            if spec.fetch_on_mount {
                assert!(spec.query.validate(&spec.query.empty_filters()).is_ok());
            }
        }
    }

    #[test]
    fn test_circuits_constructor_requires_driver() {
        let spec = view_spec(ViewKind::Circuits);
        let mut filters = spec.query.empty_filters();
        filters.set("constructorId", "ferrari").unwrap();
        let err = spec.query.validate(&filters).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::MissingDependency {
                dependent: "constructorId",
                required: "driverId",
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "Driver ID is required when filtering by Constructor ID."
        );
    }

    #[test]
    fn test_drivers_round_requires_year() {
        let spec = view_spec(ViewKind::Drivers);
        let mut filters = spec.query.empty_filters();
        filters.set("round", "5").unwrap();
        assert!(spec.query.validate(&filters).is_err());
        filters.set("year", "2020").unwrap();
        assert!(spec.query.validate(&filters).is_ok());
    }

    #[test]
    fn test_comparison_stint_defaults_to_one() {
        let spec = view_spec(ViewKind::DriverComparison);
        assert_eq!(spec.query.empty_filters().get("stint"), "1");
    }

    #[test]
    fn test_calendar_year_is_path_parameter() {
        let spec = view_spec(ViewKind::Calendar);
        assert_eq!(spec.endpoint.path_parameter(), Some("year"));
        assert!(spec.fields().iter().any(|f| f.wire == "year" && f.required));
    }
}
