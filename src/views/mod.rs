//! The set of data views and the single-selection controller between them.

mod catalog;
mod model;

use std::fmt;
use std::str::FromStr;

use log::info;
use serde::{Deserialize, Serialize};

use crate::errors::AnemoiError;
use crate::fetch::FetchContext;

pub use catalog::{SESSION_IDENTIFIERS, ViewSpec, view_spec};
pub use model::{DataView, QueryView, ViewStatus, mount, mount_idle};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewKind {
    #[default]
    Calendar,
    Champions,
    Session,
    Standings,
    Circuits,
    Constructors,
    Drivers,
    FastestLap,
    TrackDominance,
    DriverComparison,
    Telemetry,
}

impl ViewKind {
    /// Navigation order.
    pub const ALL: &'static [ViewKind] = &[
        ViewKind::Calendar,
        ViewKind::Champions,
        ViewKind::Session,
        ViewKind::Standings,
        ViewKind::Circuits,
        ViewKind::Constructors,
        ViewKind::Drivers,
        ViewKind::FastestLap,
        ViewKind::TrackDominance,
        ViewKind::DriverComparison,
        ViewKind::Telemetry,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ViewKind::Calendar => "calendar",
            ViewKind::Champions => "champions",
            ViewKind::Session => "session",
            ViewKind::Standings => "standings",
            ViewKind::Circuits => "circuits",
            ViewKind::Constructors => "constructors",
            ViewKind::Drivers => "drivers",
            ViewKind::FastestLap => "fastestLap",
            ViewKind::TrackDominance => "trackDominance",
            ViewKind::DriverComparison => "driverComparison",
            ViewKind::Telemetry => "telemetry",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ViewKind::Calendar => "Calendar",
            ViewKind::Champions => "Champions",
            ViewKind::Session => "Session",
            ViewKind::Standings => "Standings",
            ViewKind::Circuits => "Circuits",
            ViewKind::Constructors => "Constructors",
            ViewKind::Drivers => "Drivers",
            ViewKind::FastestLap => "Fastest Lap",
            ViewKind::TrackDominance => "Track Dominance",
            ViewKind::DriverComparison => "Driver Comparison",
            ViewKind::Telemetry => "Telemetry",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ViewKind {
    type Err = AnemoiError;

    /// Accepts `fastestLap`, `fastest-lap` and `fastest_lap` alike.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        ViewKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().to_lowercase() == wanted)
            .ok_or_else(|| AnemoiError::UnknownView {
                name: s.to_string(),
            })
    }
}

/// Exactly one view is active at a time; the navigation overlay is transient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewRouter {
    active: ViewKind,
    nav_open: bool,
}

impl ViewRouter {
    pub fn new(initial: ViewKind) -> Self {
        Self {
            active: initial,
            nav_open: false,
        }
    }

    pub fn active(&self) -> ViewKind {
        self.active
    }

    pub fn is_nav_open(&self) -> bool {
        self.nav_open
    }

    /// Activates `kind` and closes the overlay. Returns true when the active
    /// view changed.
    pub fn select_view(&mut self, kind: ViewKind) -> bool {
        self.nav_open = false;
        if kind == self.active {
            return false;
        }
        info!("Switching view {} -> {}", self.active, kind);
        self.active = kind;
        true
    }

    pub fn toggle_nav(&mut self) {
        self.nav_open = !self.nav_open;
    }

    pub fn close_nav(&mut self) {
        self.nav_open = false;
    }
}

impl Default for ViewRouter {
    fn default() -> Self {
        Self::new(ViewKind::default())
    }
}

/// Keeps the mounted view in step with the router. Switching views discards
/// the previous view's filters and fetch state.
pub struct ViewHost {
    router: ViewRouter,
    context: FetchContext,
    view: Box<dyn DataView>,
}

impl ViewHost {
    pub fn new(initial: ViewKind, context: FetchContext) -> Self {
        let view = mount(initial, &context);
        Self {
            router: ViewRouter::new(initial),
            context,
            view,
        }
    }

    pub fn router(&self) -> &ViewRouter {
        &self.router
    }

    pub fn router_mut(&mut self) -> &mut ViewRouter {
        &mut self.router
    }

    pub fn select(&mut self, kind: ViewKind) -> bool {
        let changed = self.router.select_view(kind);
        if changed {
            self.view = mount(kind, &self.context);
        }
        changed
    }

    pub fn view(&self) -> &dyn DataView {
        self.view.as_ref()
    }

    pub fn view_mut(&mut self) -> &mut dyn DataView {
        self.view.as_mut()
    }
}
