use crate::error::{PivotError, Result};
use crate::month::MonthCode;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// The measures a record may carry. Any of them may be missing for a given row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MeasureName {
    Value,
    Qty,
    Rate,
    OpeningStockQty,
    OpeningStockValue,
    PurchasesQty,
    PurchasesValue,
    SalesQty,
    SalesValue,
    ClosingStockQty,
    ClosingStockValue,
}

impl Default for MeasureName {
    fn default() -> Self {
        Self::Value
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Measures {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_stock_qty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_stock_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchases_qty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchases_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_qty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_stock_qty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_stock_value: Option<f64>,
}

impl Measures {
    pub fn value(value: f64) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    pub fn get(&self, measure: MeasureName) -> Option<f64> {
        match measure {
            MeasureName::Value => self.value,
            MeasureName::Qty => self.qty,
            MeasureName::Rate => self.rate,
            MeasureName::OpeningStockQty => self.opening_stock_qty,
            MeasureName::OpeningStockValue => self.opening_stock_value,
            MeasureName::PurchasesQty => self.purchases_qty,
            MeasureName::PurchasesValue => self.purchases_value,
            MeasureName::SalesQty => self.sales_qty,
            MeasureName::SalesValue => self.sales_value,
            MeasureName::ClosingStockQty => self.closing_stock_qty,
            MeasureName::ClosingStockValue => self.closing_stock_value,
        }
    }
}

/// One `(month, label)` observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Record {
    pub month: MonthCode,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub measures: Measures,
}

impl Record {
    pub fn new(month: MonthCode, label: impl Into<String>, measures: Measures) -> Self {
        Self {
            month,
            label: label.into(),
            category: None,
            measures,
        }
    }

    /// Record carrying only the default `value` measure.
    pub fn with_value(month: MonthCode, label: impl Into<String>, value: Option<f64>) -> Self {
        Self::new(
            month,
            label,
            Measures {
                value,
                ..Measures::default()
            },
        )
    }

    pub fn measure(&self, measure: MeasureName) -> Option<f64> {
        self.measures.get(measure)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    #[schemars(description = "One value column for the selected month.")]
    Single,

    #[schemars(description = "One column per selected month plus a Quarter Total column.")]
    Quarterly,

    #[schemars(
        description = "Every month from April to the current month, current month emitted first."
    )]
    MtyAll,

    #[schemars(description = "Current month next to its fiscal year-to-date figure.")]
    Comparison,
}

impl ViewMode {
    pub const ALL: [ViewMode; 4] = [
        ViewMode::Single,
        ViewMode::Quarterly,
        ViewMode::MtyAll,
        ViewMode::Comparison,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Single => "single",
            ViewMode::Quarterly => "quarterly",
            ViewMode::MtyAll => "mty-all",
            ViewMode::Comparison => "comparison",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = PivotError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == s.trim())
            .ok_or_else(|| PivotError::UnknownViewMode(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AggregationKind {
    #[schemars(
        description = "Period activity (sales, expenses). Values are summed across months."
    )]
    Flow,

    #[schemars(
        description = "Point-in-time balance (closing stock). A period takes its last month's value."
    )]
    Snapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ValueUnit {
    Plain,
    Currency,
    Percent,
}

impl Default for ValueUnit {
    fn default() -> Self {
        Self::Plain
    }
}

/// Label sets that decide a row's display unit, e.g. for a KPI scorecard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UnitRules {
    #[serde(default)]
    pub percent: BTreeSet<String>,
    #[serde(default)]
    pub currency: BTreeSet<String>,
}

impl UnitRules {
    /// Units used by the KPI scorecard.
    pub fn kpi_defaults() -> Self {
        Self {
            percent: ["Revenue growth", "Gross margin", "EBITDA", "Net Margin"]
                .into_iter()
                .map(String::from)
                .collect(),
            currency: ["EV (Enterprise Value)"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }

    pub fn unit_for(&self, label: &str) -> Option<ValueUnit> {
        if self.percent.contains(label) {
            Some(ValueUnit::Percent)
        } else if self.currency.contains(label) {
            Some(ValueUnit::Currency)
        } else {
            None
        }
    }

    pub fn to_label_units(&self) -> BTreeMap<String, ValueUnit> {
        let mut units = BTreeMap::new();
        for label in &self.currency {
            units.insert(label.clone(), ValueUnit::Currency);
        }
        for label in &self.percent {
            units.insert(label.clone(), ValueUnit::Percent);
        }
        units
    }
}

/// A row label plus whether the row is a total line (rendered emphasised).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RowLabel {
    pub name: String,
    #[serde(default)]
    pub is_total: bool,
}

impl RowLabel {
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_total: false,
        }
    }

    pub fn total(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_total: true,
        }
    }
}

impl From<&str> for RowLabel {
    fn from(name: &str) -> Self {
        Self::plain(name)
    }
}

impl From<String> for RowLabel {
    fn from(name: String) -> Self {
        Self::plain(name)
    }
}

/// Wording-based total detection kept for parity with existing statements.
/// Prefer setting [`RowLabel::is_total`] explicitly.
pub fn looks_like_total(label: &str) -> bool {
    let lower = label.trim().to_lowercase();
    lower.starts_with("total") || lower.starts_with("grand") || lower == "nett profit"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", content = "month", rename_all = "snake_case")]
pub enum ColumnRole {
    Label,
    PlainValue,
    QuarterTotal,
    YtdTotal,
    GroupedByMonth(MonthCode),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnSpec {
    pub key: String,
    pub header: String,
    pub role: ColumnRole,
    /// Set on the current-month column of the mty-all view.
    #[serde(default)]
    pub emphasized: bool,
}

impl ColumnSpec {
    pub fn new(key: impl Into<String>, header: impl Into<String>, role: ColumnRole) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            role,
            emphasized: false,
        }
    }

    pub fn is_label(&self) -> bool {
        self.role == ColumnRole::Label
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormattedRow {
    pub label: String,
    pub is_total: bool,
    /// Column key to display string, including the label column.
    pub cells: BTreeMap<String, String>,
}

impl FormattedRow {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.cells.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PivotTable {
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<FormattedRow>,
}

impl PivotTable {
    pub fn column_keys(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.key.as_str()).collect()
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.header.as_str()).collect()
    }

    pub fn row(&self, label: &str) -> Option<&FormattedRow> {
        self.rows.iter().find(|r| r.label == label)
    }

    /// Display string for `label` in column `key`.
    pub fn cell(&self, label: &str, key: &str) -> Option<&str> {
        self.row(label).and_then(|r| r.get(key))
    }
}

pub const DEFAULT_LABEL_HEADER: &str = "Item";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PivotOptions {
    #[schemars(description = "Flow sums across months; Snapshot takes the period-end value.")]
    pub aggregation: AggregationKind,

    #[serde(default)]
    #[schemars(description = "Display unit applied to every row without a per-label override.")]
    pub unit: ValueUnit,

    #[serde(default = "default_label_header")]
    #[schemars(description = "Header text of the label column.")]
    pub label_header: String,

    #[serde(default)]
    #[schemars(description = "Per-label display unit overrides.")]
    pub label_units: BTreeMap<String, ValueUnit>,
}

fn default_label_header() -> String {
    DEFAULT_LABEL_HEADER.to_string()
}

impl PivotOptions {
    pub fn new(aggregation: AggregationKind) -> Self {
        Self {
            aggregation,
            unit: ValueUnit::Plain,
            label_header: default_label_header(),
            label_units: BTreeMap::new(),
        }
    }

    pub fn flow() -> Self {
        Self::new(AggregationKind::Flow)
    }

    pub fn snapshot() -> Self {
        Self::new(AggregationKind::Snapshot)
    }

    pub fn with_unit(mut self, unit: ValueUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_label_header(mut self, header: impl Into<String>) -> Self {
        self.label_header = header.into();
        self
    }

    pub fn with_label_units(mut self, units: BTreeMap<String, ValueUnit>) -> Self {
        self.label_units = units;
        self
    }

    pub fn unit_for(&self, label: &str) -> ValueUnit {
        self.label_units.get(label).copied().unwrap_or(self.unit)
    }
}

/// A view request as sent by a client, e.g.
/// `{"view": "quarterly", "months": ["Apr", "May", "Jun"], "aggregation": "flow"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PivotRequest {
    pub view: ViewMode,
    pub months: Vec<MonthCode>,
    #[schemars(description = "Required; there is no default aggregation.")]
    pub aggregation: AggregationKind,
    #[serde(default)]
    pub unit: ValueUnit,
}

/// Tokens kept as strings so bad ones surface as `UnknownViewMode` / `UnknownMonth`.
#[derive(Debug, Deserialize)]
struct RawPivotRequest {
    view: String,
    months: Vec<String>,
    aggregation: AggregationKind,
    #[serde(default)]
    unit: ValueUnit,
}

impl PivotRequest {
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawPivotRequest = serde_json::from_str(json)?;
        let months = raw
            .months
            .iter()
            .map(|m| m.parse::<MonthCode>())
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            view: raw.view.parse()?,
            months,
            aggregation: raw.aggregation,
            unit: raw.unit,
        })
    }

    pub fn options(&self) -> PivotOptions {
        PivotOptions::new(self.aggregation).with_unit(self.unit)
    }
}
