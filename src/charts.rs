//! Chart Builders - derived tables to Plotly figure JSON
//!
//! The browser hands the serialized `ChartSpec` straight to `Plotly.react`,
//! so field names follow Plotly's figure schema.

use serde::Serialize;

use crate::engine::{PieRow, ScatterPoint};
use crate::selection::SiteSelection;

pub const PAYLOAD_AXIS_TITLE: &str = "Payload Mass (kg)";
pub const OUTCOME_AXIS_TITLE: &str = "class";
pub const BOOSTER_LEGEND_TITLE: &str = "Booster Version Category";

/// Declarative figure: traces plus layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Pie {
        labels: Vec<String>,
        values: Vec<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        hovertext: Option<Vec<String>>,
    },
    Scatter {
        name: String,
        legendgroup: String,
        mode: String,
        x: Vec<f64>,
        y: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub title: Title,
}

fn title(text: impl Into<String>) -> Title {
    Title { text: text.into() }
}

impl ChartSpec {
    /// Figure with no traces, used when there is nothing to draw
    pub fn empty(title_text: impl Into<String>) -> Self {
        Self {
            data: Vec::new(),
            layout: Layout {
                title: title(title_text),
                xaxis: None,
                yaxis: None,
                legend: None,
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Pie title for the current dropdown value
pub fn pie_title(site: &SiteSelection) -> String {
    match site {
        SiteSelection::All => "All Sites Success Rate".to_string(),
        SiteSelection::Site(name) => format!("{} site Success Rate", name),
    }
}

/// Scatter title for the current dropdown value
pub fn scatter_title(site: &SiteSelection) -> String {
    match site {
        SiteSelection::All => "Payload vs. Outcome for All Sites".to_string(),
        SiteSelection::Site(name) => format!("Payload vs. Outcome for {}", name),
    }
}

pub fn build_pie_spec(rows: &[PieRow], title_text: &str) -> ChartSpec {
    let mut spec = ChartSpec::empty(title_text);
    if rows.is_empty() {
        return spec;
    }

    let labels = rows.iter().map(PieRow::label).collect();
    let values = rows.iter().map(PieRow::value).collect();
    let hovertext = rows
        .iter()
        .map(|row| match row {
            PieRow::BySite { successes, launches, .. } => {
                format!("{} of {} launches succeeded", successes, launches)
            }
            PieRow::ByOutcome { outcome, count } => {
                let word = if outcome.is_success() { "success" } else { "failure" };
                format!("{} {}", count, word)
            }
        })
        .collect();

    spec.data.push(Trace::Pie {
        labels,
        values,
        hovertext: Some(hovertext),
    });
    spec
}

/// One marker trace per booster version category, in first-appearance order
pub fn build_scatter_spec(points: &[ScatterPoint], title_text: &str) -> ChartSpec {
    let mut groups: Vec<(&str, Vec<f64>, Vec<u8>)> = Vec::new();
    for point in points {
        let category = point.booster_version_category.as_str();
        let idx = match groups.iter().position(|(name, _, _)| *name == category) {
            Some(idx) => idx,
            None => {
                groups.push((category, Vec::new(), Vec::new()));
                groups.len() - 1
            }
        };
        groups[idx].1.push(point.payload_mass_kg);
        groups[idx].2.push(point.outcome.as_u8());
    }

    let data = groups
        .into_iter()
        .map(|(name, x, y)| Trace::Scatter {
            name: name.to_string(),
            legendgroup: name.to_string(),
            mode: "markers".to_string(),
            x,
            y,
        })
        .collect();

    ChartSpec {
        data,
        layout: Layout {
            title: title(title_text),
            xaxis: Some(Axis { title: title(PAYLOAD_AXIS_TITLE) }),
            yaxis: Some(Axis { title: title(OUTCOME_AXIS_TITLE) }),
            legend: Some(Legend { title: title(BOOSTER_LEGEND_TITLE) }),
        },
    }
}
