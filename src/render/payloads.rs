use log::warn;

use crate::api::types::{
    Champions, CircuitList, ConstructorList, DriverComparison, DriverList, EventSchedule,
    FastestLapReport, Scalar, SessionOverview, Standings, TelemetryReport, TrackDominance,
    decode_image,
};
use crate::query::FilterState;

use super::{
    MISSING, Payload, Rendered, RenderedImage, StandingType, display, render_table, title_case,
};

fn heading_with_year(title: &str, year: Option<&Scalar>) -> String {
    match year {
        Some(year) => format!("{} ({})", title, year),
        None => title.to_string(),
    }
}

/// Decodes an optional plot, leaving a notice behind when it is unusable.
fn attach_image(rendered: &mut Rendered, title: String, encoded: Option<&str>) {
    let Some(encoded) = encoded.filter(|e| !e.trim().is_empty()) else {
        return;
    };
    match decode_image(encoded) {
        Ok(png) => {
            rendered.image = Some(RenderedImage {
                title,
                png: png.into(),
            })
        }
        Err(e) => {
            warn!("Discarding undecodable plot: {}", e);
            rendered.notice = Some(format!("The plot could not be displayed: {}", e));
        }
    }
}

impl Payload for EventSchedule {
    fn render(&self, _: &FilterState) -> Rendered {
        Rendered {
            heading: Some(heading_with_year("Race Calendar", self.year.as_ref())),
            table: Some(render_table(&self.events, ())),
            ..Rendered::default()
        }
    }
}

impl Payload for Champions {
    fn render(&self, _: &FilterState) -> Rendered {
        Rendered {
            heading: Some(heading_with_year("World Champions", self.year.as_ref())),
            table: Some(render_table(std::slice::from_ref(self), ())),
            ..Rendered::default()
        }
    }
}

impl Payload for CircuitList {
    fn render(&self, _: &FilterState) -> Rendered {
        Rendered {
            table: Some(render_table(&self.circuits, ())),
            ..Rendered::default()
        }
    }
}

impl Payload for ConstructorList {
    fn render(&self, _: &FilterState) -> Rendered {
        Rendered {
            table: Some(render_table(&self.constructors, ())),
            ..Rendered::default()
        }
    }
}

impl Payload for DriverList {
    fn render(&self, _: &FilterState) -> Rendered {
        Rendered {
            table: Some(render_table(&self.drivers, ())),
            ..Rendered::default()
        }
    }
}

impl Payload for SessionOverview {
    fn render(&self, _: &FilterState) -> Rendered {
        let session = &self.session;
        let titled = |value: Option<&Scalar>| match display(value) {
            missing if missing == MISSING => missing,
            value => title_case(&value),
        };
        Rendered {
            heading: Some("Session Overview".to_string()),
            details: vec![
                ("Year", display(session.year.as_ref())),
                ("Grand Prix", titled(session.grand_prix.as_ref())),
                ("Session", titled(session.session.as_ref())),
                ("Date", display(session.date.as_ref())),
                ("Event", display(session.event.as_ref())),
                ("Location", display(session.location.as_ref())),
            ],
            table: Some(render_table(&session.results, ())),
            ..Rendered::default()
        }
    }
}

impl Payload for Standings {
    fn render(&self, filters: &FilterState) -> Rendered {
        let mode = filters
            .get("standingType")
            .parse::<StandingType>()
            .unwrap_or_default();
        Rendered {
            heading: Some(heading_with_year(mode.title(), self.year.as_ref())),
            table: Some(render_table(&self.standings, mode)),
            ..Rendered::default()
        }
    }
}

fn render_fastest_lap(report: &FastestLapReport) -> Rendered {
    let session = &report.session;
    let mut rendered = Rendered {
        heading: Some(format!(
            "{} Fastest Lap: {}",
            display(session.grand_prix.as_ref()),
            display(session.driver.as_ref())
        )),
        details: vec![
            ("Year", display(session.year.as_ref())),
            ("Grand Prix", display(session.grand_prix.as_ref())),
            ("Session", display(session.session.as_ref())),
            ("Driver", display(session.driver.as_ref())),
            ("Event", display(session.event.as_ref())),
            ("Location", display(session.location.as_ref())),
        ],
        ..Rendered::default()
    };
    let title = format!("Fastest lap of {}", display(session.driver.as_ref()));
    attach_image(&mut rendered, title, report.image_base64.as_deref());
    rendered
}

impl Payload for TelemetryReport {
    fn render(&self, _: &FilterState) -> Rendered {
        match self {
            TelemetryReport::FastestLap(report) => render_fastest_lap(report),
            TelemetryReport::Results(results) => Rendered {
                heading: Some("Telemetry".to_string()),
                table: Some(render_table(&results.results, ())),
                ..Rendered::default()
            },
        }
    }
}

impl Payload for DriverComparison {
    fn render(&self, _: &FilterState) -> Rendered {
        let driver1 = display(self.driver1.as_ref());
        let driver2 = display(self.driver2.as_ref());
        let mut rendered = Rendered {
            heading: Some(format!("Driver Comparison: {} vs {}", driver1, driver2)),
            details: vec![
                ("Year", display(self.year.as_ref())),
                ("Grand Prix", display(self.gp.as_ref())),
                ("Session", display(self.identifier.as_ref())),
                ("Closest Lap", display(self.closest_lap.as_ref())),
            ],
            ..Rendered::default()
        };
        let title = format!("{} vs {} lap comparison", driver1, driver2);
        attach_image(&mut rendered, title, self.image_base64.as_deref());
        rendered
    }
}

impl Payload for TrackDominance {
    fn render(&self, _: &FilterState) -> Rendered {
        let driver1 = display(self.driver1.as_ref());
        let driver2 = display(self.driver2.as_ref());
        let mut rendered = Rendered {
            heading: Some(format!("Track Dominance: {} vs {}", driver1, driver2)),
            details: vec![
                ("Year", display(self.year.as_ref())),
                ("Grand Prix", display(self.gp.as_ref())),
                ("Session", display(self.identifier.as_ref())),
            ],
            ..Rendered::default()
        };
        let title = format!("Track dominance {} vs {}", driver1, driver2);
        attach_image(&mut rendered, title, self.image_base64.as_deref());
        rendered
    }
}
