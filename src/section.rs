use crate::error::{PivotError, Result};
use crate::metric::{DeltaMode, MetricSummary};
use crate::month::{FiscalYear, MonthCode};
use crate::pivot::build_pivot;
use crate::schema::{
    AggregationKind, MeasureName, PivotOptions, PivotTable, Record, RowLabel, UnitRules,
    ValueUnit, ViewMode,
};
use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HeroSpec {
    #[schemars(description = "Card title, e.g. 'Total Sales'.")]
    pub title: String,

    #[schemars(description = "Label whose current-month value the card shows.")]
    pub label: String,

    #[serde(default)]
    pub unit: Option<ValueUnit>,

    #[serde(default)]
    #[schemars(description = "default: increases are good; inverse: decreases are good; neutral: no judgement.")]
    pub delta_mode: DeltaMode,
}

/// One collapsible ledger section: a group of labels that share an aggregation kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SectionSpec {
    pub title: String,

    #[serde(default = "default_label_key")]
    #[schemars(description = "Column key of the label column, e.g. line_item or material.")]
    pub label_key: String,

    #[schemars(description = "Row labels in display order.")]
    pub labels: Vec<String>,

    #[serde(default)]
    #[schemars(description = "Labels rendered as total rows.")]
    pub totals: BTreeSet<String>,

    #[schemars(
        description = "Required. Flow for activity lines (sales, expenses); snapshot for balances such as opening/closing stock."
    )]
    pub aggregation: AggregationKind,

    #[serde(default)]
    pub unit: ValueUnit,

    #[serde(default)]
    pub heroes: Vec<HeroSpec>,
}

fn default_label_key() -> String {
    "line_item".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionView {
    pub title: String,
    pub table: PivotTable,
    pub heroes: Vec<MetricSummary>,
}

/// The month selection a section is rendered for.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub view: ViewMode,
    pub months: &'a [MonthCode],
    pub previous_months: &'a [MonthCode],
}

impl<'a> ViewContext<'a> {
    pub fn new(view: ViewMode, months: &'a [MonthCode], previous_months: &'a [MonthCode]) -> Self {
        Self {
            view,
            months,
            previous_months,
        }
    }

    pub fn current_month(&self) -> Option<MonthCode> {
        self.months.last().copied()
    }

    pub fn previous_month(&self) -> Option<MonthCode> {
        self.previous_months.last().copied()
    }
}

impl SectionSpec {
    pub fn row_labels(&self) -> Vec<RowLabel> {
        self.labels
            .iter()
            .map(|name| RowLabel {
                name: name.clone(),
                is_total: self.totals.contains(name),
            })
            .collect()
    }

    pub fn options(&self) -> PivotOptions {
        PivotOptions::new(self.aggregation).with_unit(self.unit)
    }

    pub fn build(
        &self,
        current: &[Record],
        previous: &[Record],
        ctx: &ViewContext<'_>,
    ) -> Result<SectionView> {
        let options = self.options();
        let table = build_pivot(
            current,
            &self.label_key,
            MeasureName::Value,
            &self.row_labels(),
            ctx.view,
            ctx.months,
            &options,
        )?;

        let month = ctx
            .current_month()
            .ok_or(PivotError::EmptySelection { view: ctx.view })?;

        let heroes = self
            .heroes
            .iter()
            .map(|hero| {
                MetricSummary::from_records(
                    hero.title.clone(),
                    &hero.label,
                    current,
                    month,
                    previous,
                    ctx.previous_month(),
                    hero.unit.unwrap_or(self.unit),
                    hero.delta_mode,
                )
            })
            .collect();

        debug!(
            "Section '{}': {} rows, {} hero cards",
            self.title,
            table.rows.len(),
            self.heroes.len()
        );

        Ok(SectionView {
            title: self.title.clone(),
            table,
            heroes,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DashboardConfig {
    #[schemars(description = "Name shown on the dashboard.")]
    pub organization_name: String,

    #[schemars(description = "Fiscal year being reported (April start).")]
    pub fiscal_year: FiscalYear,

    #[serde(default)]
    pub sections: Vec<SectionSpec>,

    #[serde(default = "UnitRules::kpi_defaults")]
    #[schemars(description = "Which KPI names render as percentages or currency.")]
    pub kpi_units: UnitRules,
}

impl DashboardConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(DashboardConfig)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }

    /// Options for a KPI scorecard table, applying `kpi_units` per row.
    pub fn kpi_options(&self) -> PivotOptions {
        PivotOptions::new(AggregationKind::Snapshot)
            .with_label_header("KPI")
            .with_label_units(self.kpi_units.to_label_units())
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            organization_name: String::new(),
            fiscal_year: FiscalYear::new(2025),
            sections: Vec::new(),
            kpi_units: UnitRules::kpi_defaults(),
        }
    }
}
