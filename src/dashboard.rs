//! Dashboard - page layout and the reactive callback table
//!
//! Each output figure is bound to one pure callback and the input controls it
//! reads. A control change re-runs exactly the callbacks that list it.

use serde::Serialize;
use std::sync::Arc;

use crate::charts::{self, ChartSpec};
use crate::config::DashboardConfig;
use crate::dataset::Dataset;
use crate::engine::{self, EngineError};
use crate::selection::{PayloadRange, Selection, SelectionError, ALL_SITES};

pub const SITE_DROPDOWN: &str = "site-dropdown";
pub const PAYLOAD_SLIDER: &str = "payload-slider";
pub const PIE_CHART: &str = "success-pie-chart";
pub const SCATTER_CHART: &str = "success-payload-scatter-chart";

const INPUTS: [&str; 2] = [SITE_DROPDOWN, PAYLOAD_SLIDER];

type CallbackFn = fn(&Dataset, &Selection) -> ChartSpec;

/// A figure output and the inputs that trigger its recomputation
#[derive(Clone, Copy)]
pub struct Callback {
    pub output: &'static str,
    pub inputs: &'static [&'static str],
    compute: CallbackFn,
}

impl Callback {
    pub fn depends_on(&self, input: &str) -> bool {
        self.inputs.iter().any(|i| *i == input)
    }
}

/// Pie figure for the dropdown value
fn pie_callback(dataset: &Dataset, selection: &Selection) -> ChartSpec {
    let title = charts::pie_title(&selection.site);
    match engine::compute_pie_data(dataset, &selection.site) {
        Ok(rows) => charts::build_pie_spec(&rows, &title),
        Err(err) => recoverable(err, title),
    }
}

/// Scatter figure for the dropdown value and slider range
fn scatter_callback(dataset: &Dataset, selection: &Selection) -> ChartSpec {
    let points = engine::compute_scatter_data(dataset, &selection.site, &selection.payload);
    tracing::debug!(
        "Scatter: site={} range=[{}, {}] -> {} points",
        selection.site,
        selection.payload.min(),
        selection.payload.max(),
        points.len()
    );
    let spec = charts::build_scatter_spec(&points, &charts::scatter_title(&selection.site));
    if spec.is_empty() {
        tracing::debug!("No launches in range, scatter is empty");
    }
    spec
}

/// Unknown site or empty dataset: draw nothing, keep serving
fn recoverable(err: EngineError, title: String) -> ChartSpec {
    tracing::warn!("Rendering empty figure '{}': {}", title, err);
    ChartSpec::empty(title)
}

#[derive(Debug, Clone, Serialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DropdownLayout {
    pub id: &'static str,
    pub options: Vec<DropdownOption>,
    pub value: String,
    pub placeholder: String,
    pub searchable: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SliderMark {
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SliderLayout {
    pub id: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub marks: Vec<SliderMark>,
    pub value: [f64; 2],
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub records: usize,
    pub sites: usize,
    pub min_payload: Option<f64>,
    pub max_payload: Option<f64>,
    pub loaded_at: String,
}

/// Everything the page needs to draw its controls
#[derive(Debug, Clone, Serialize)]
pub struct PageLayout {
    pub title: String,
    pub dropdown: DropdownLayout,
    pub slider: SliderLayout,
    pub outputs: Vec<&'static str>,
    pub dataset: DatasetSummary,
}

/// Callback table bound to one immutable dataset
pub struct Dashboard {
    dataset: Arc<Dataset>,
    config: DashboardConfig,
    callbacks: Vec<Callback>,
}

impl Dashboard {
    pub fn new(dataset: Arc<Dataset>, config: DashboardConfig) -> Self {
        let callbacks = vec![
            Callback {
                output: PIE_CHART,
                inputs: &[SITE_DROPDOWN],
                compute: pie_callback,
            },
            Callback {
                output: SCATTER_CHART,
                inputs: &[SITE_DROPDOWN, PAYLOAD_SLIDER],
                compute: scatter_callback,
            },
        ];
        tracing::debug!("Registered {} callbacks", callbacks.len());

        Self {
            dataset,
            config,
            callbacks,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn callbacks(&self) -> &[Callback] {
        &self.callbacks
    }

    /// Selection the page starts with: all sites, slider default range
    pub fn default_selection(&self) -> Result<Selection, SelectionError> {
        Ok(Selection {
            site: Default::default(),
            payload: PayloadRange::try_from(self.config.slider.value)?,
        })
    }

    /// Re-run every callback that reads `changed_input`, in registration order
    pub fn dispatch(
        &self,
        changed_input: &str,
        selection: &Selection,
    ) -> Result<Vec<(&'static str, ChartSpec)>, SelectionError> {
        if !INPUTS.iter().any(|i| *i == changed_input) {
            return Err(SelectionError::UnknownInput(changed_input.to_string()));
        }

        let outputs: Vec<_> = self
            .callbacks
            .iter()
            .filter(|cb| cb.depends_on(changed_input))
            .map(|cb| (cb.output, (cb.compute)(self.dataset(), selection)))
            .collect();
        tracing::debug!(
            "Input '{}' changed, recomputed {:?}",
            changed_input,
            outputs.iter().map(|(id, _)| *id).collect::<Vec<_>>()
        );
        Ok(outputs)
    }

    /// Evaluate every callback, as on first page load
    pub fn render_all(&self, selection: &Selection) -> Vec<(&'static str, ChartSpec)> {
        self.callbacks
            .iter()
            .map(|cb| (cb.output, (cb.compute)(self.dataset(), selection)))
            .collect()
    }

    /// Evaluate the callback bound to a single output
    pub fn render(&self, output: &str, selection: &Selection) -> Option<ChartSpec> {
        self.callbacks
            .iter()
            .find(|cb| cb.output == output)
            .map(|cb| (cb.compute)(self.dataset(), selection))
    }

    pub fn layout(&self) -> PageLayout {
        let dropdown_config = &self.config.dropdown;
        let mut options = vec![DropdownOption {
            label: dropdown_config.all_label.clone(),
            value: ALL_SITES.to_string(),
        }];
        options.extend(self.dataset.sites().iter().map(|site| DropdownOption {
            label: site.clone(),
            value: site.clone(),
        }));

        let slider = &self.config.slider;
        let marks = slider
            .marks
            .iter()
            .map(|&value| SliderMark {
                value,
                label: format!("{}", value),
            })
            .collect();

        PageLayout {
            title: self.config.title.clone(),
            dropdown: DropdownLayout {
                id: SITE_DROPDOWN,
                options,
                value: ALL_SITES.to_string(),
                placeholder: dropdown_config.placeholder.clone(),
                searchable: dropdown_config.searchable,
            },
            slider: SliderLayout {
                id: PAYLOAD_SLIDER,
                min: slider.min,
                max: slider.max,
                step: slider.step,
                marks,
                value: slider.value,
            },
            outputs: self.callbacks.iter().map(|cb| cb.output).collect(),
            dataset: DatasetSummary {
                records: self.dataset.len(),
                sites: self.dataset.sites().len(),
                min_payload: self.dataset.min_payload(),
                max_payload: self.dataset.max_payload(),
                loaded_at: self.dataset.loaded_at().to_rfc3339(),
            },
        }
    }
}
