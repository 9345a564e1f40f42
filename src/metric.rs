use crate::delta::delta_between;
use crate::format::{format_unit, is_negative_display};
use crate::lookup::lookup;
use crate::month::MonthCode;
use crate::schema::{MeasureName, Record, ValueUnit};
use crate::trend::{series, TrendDirection};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How a change against the previous period should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeltaMode {
    /// Increases are good (sales, profit).
    #[default]
    Default,
    /// Direction carries no judgement (stock levels, consumption).
    Neutral,
    /// Decreases are good (costs, expenses).
    Inverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaTone {
    Favourable,
    Adverse,
    Muted,
    Unknown,
}

impl DeltaMode {
    pub fn tone(self, delta: Option<f64>) -> DeltaTone {
        if self == DeltaMode::Neutral {
            return DeltaTone::Muted;
        }
        let Some(d) = delta else {
            return DeltaTone::Unknown;
        };
        let favourable = match self {
            DeltaMode::Inverse => d <= 0.0,
            _ => d >= 0.0,
        };
        if favourable {
            DeltaTone::Favourable
        } else {
            DeltaTone::Adverse
        }
    }

    /// `+12.3% vs prev`, or `vs prev 12.3%` in neutral mode.
    pub fn describe(self, delta: f64) -> String {
        match self {
            DeltaMode::Neutral => format!("vs prev {:.1}%", delta.abs()),
            _ => {
                let sign = if delta >= 0.0 { "+" } else { "" };
                format!("{}{:.1}% vs prev", sign, delta)
            }
        }
    }
}

/// Headline figure for one label: current value, change against the previous
/// period and, optionally, its year-to-date history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub title: String,
    pub value: Option<f64>,
    pub previous: Option<f64>,
    pub display: String,
    pub is_negative: bool,
    pub delta: Option<f64>,
    pub delta_text: Option<String>,
    pub tone: DeltaTone,
    pub history: Vec<f64>,
    pub direction: Option<TrendDirection>,
}

impl MetricSummary {
    pub fn new(
        title: impl Into<String>,
        value: Option<f64>,
        previous: Option<f64>,
        unit: ValueUnit,
        mode: DeltaMode,
    ) -> Self {
        let display = format_unit(value, unit);
        let delta = delta_between(value, previous);

        Self {
            title: title.into(),
            value,
            previous,
            is_negative: is_negative_display(&display),
            display,
            delta,
            delta_text: delta.map(|d| mode.describe(d)),
            tone: mode.tone(delta),
            history: Vec::new(),
            direction: None,
        }
    }

    /// Reads `label` at `month` from `current` and at `previous_month` from `previous`.
    #[allow(clippy::too_many_arguments)]
    pub fn from_records(
        title: impl Into<String>,
        label: &str,
        current: &[Record],
        month: MonthCode,
        previous: &[Record],
        previous_month: Option<MonthCode>,
        unit: ValueUnit,
        mode: DeltaMode,
    ) -> Self {
        let value = lookup(current, label, month, MeasureName::Value);
        let prev = previous_month.and_then(|m| lookup(previous, label, m, MeasureName::Value));
        Self::new(title, value, prev, unit, mode)
    }

    /// Attaches the April-to-`through` history of `label` for a sparkline.
    pub fn with_history(mut self, history: &[Record], label: &str, through: MonthCode) -> Self {
        let trend = series(history, label, through);
        self.history = trend.values();
        self.direction = trend.direction();
        self
    }

    /// At least two points are needed to draw a trend.
    pub fn has_trend(&self) -> bool {
        self.history.len() >= 2
    }
}
