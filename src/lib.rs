//! # Ledger Pivot
//!
//! Turns flat monthly ledger records into display-ready pivot tables for an
//! Indian fiscal year (April to March).
//!
//! ## Core Concepts
//!
//! - **Records**: One row per (month, label) with one or more measures (value, qty, rate, stock figures)
//! - **Views**: Single month, quarterly with a quarter total, month-till-year with the current month first, and comparison with a year-to-date column
//! - **Flow vs Snapshot**: Activity lines (sales, expenses) sum across months; balances (stock) take the period-end value
//! - **Display**: Two decimals with Indian digit grouping, negatives in parentheses, "—" for missing or zero
//!
//! ## Example
//!
//! ```rust,ignore
//! use ledger_pivot::*;
//!
//! let records = parse_records(r#"{"data": [
//!     {"month": "Apr", "line_item": "Sales", "value": 1200.0},
//!     {"month": "May", "line_item": "Sales", "value": 800.0}
//! ]}"#)?;
//!
//! let table = build_pivot(
//!     &records,
//!     "line_item",
//!     MeasureName::Value,
//!     &[RowLabel::plain("Sales")],
//!     ViewMode::Quarterly,
//!     &[MonthCode::Apr, MonthCode::May],
//!     &PivotOptions::flow().with_unit(ValueUnit::Currency),
//! )?;
//!
//! assert_eq!(table.cell("Sales", "q_total"), Some("₹\u{a0}2,000.00"));
//! println!("{}", table.to_markdown());
//! ```

pub mod delta;
pub mod error;
pub mod export;
pub mod format;
pub mod ingestion;
pub mod lookup;
pub mod metric;
pub mod month;
pub mod pivot;
pub mod schema;
pub mod section;
pub mod selection;
pub mod trend;

pub use delta::{delta, delta_between};
pub use error::{PivotError, Result};
pub use format::{
    format_unit, format_value, is_negative_display, FormatOptions, CURRENCY_GLYPH, PLACEHOLDER,
};
pub use ingestion::{convert_rows, parse_months, parse_records, ApiRow};
pub use lookup::{find, labels_in_order, lookup, lookup_value, month_total, ytd_sum};
pub use metric::{DeltaMode, DeltaTone, MetricSummary};
pub use month::*;
pub use pivot::*;
pub use schema::*;
pub use section::{DashboardConfig, HeroSpec, SectionSpec, SectionView, ViewContext};
pub use selection::*;
pub use trend::{series, TrendDirection, TrendSeries};

use log::{debug, info};

/// Builds every section of `config` for the selection in `ctx`.
///
/// `previous` holds the records the hero cards compare against; it may be
/// the same slice as `current` when the baseline month is in the same year.
pub fn build_dashboard(
    config: &DashboardConfig,
    current: &[Record],
    previous: &[Record],
    ctx: &ViewContext<'_>,
) -> Result<Vec<SectionView>> {
    if ctx.months.is_empty() {
        return Err(PivotError::EmptySelection { view: ctx.view });
    }

    info!(
        "Building dashboard for {} (FY {}), view {}",
        config.organization_name,
        config.fiscal_year.suffix(),
        ctx.view
    );
    debug!(
        "{} sections, {} current records, {} previous records, months {:?}",
        config.sections.len(),
        current.len(),
        previous.len(),
        ctx.months
    );

    config
        .sections
        .iter()
        .map(|section| section.build(current, previous, ctx))
        .collect()
}

/// Builds the KPI scorecard: every label in `records`, in first-seen order,
/// using the config's percent/currency rules.
pub fn build_kpi_table(
    config: &DashboardConfig,
    records: &[Record],
    view: ViewMode,
    months: &[MonthCode],
) -> Result<PivotTable> {
    let labels: Vec<RowLabel> = labels_in_order(records)
        .into_iter()
        .map(RowLabel::plain)
        .collect();
    debug!("KPI table with {} labels", labels.len());

    build_pivot(
        records,
        "kpi_name",
        MeasureName::Value,
        &labels,
        view,
        months,
        &config.kpi_options(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::month::MonthCode::*;

    fn config() -> DashboardConfig {
        DashboardConfig::from_json(
            r#"{
                "organization_name": "Monofil Mills",
                "fiscal_year": {"start_year": 2025},
                "sections": [
                    {
                        "title": "Revenue",
                        "labels": ["Sales", "Total Inc"],
                        "totals": ["Total Inc"],
                        "aggregation": "flow",
                        "unit": "currency",
                        "heroes": [{"title": "Sales", "label": "Sales"}]
                    },
                    {
                        "title": "Stock",
                        "labels": ["Cl Stk"],
                        "aggregation": "snapshot"
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    fn records() -> Vec<Record> {
        vec![
            Record::with_value(Apr, "Sales", Some(100.0)),
            Record::with_value(May, "Sales", Some(150.0)),
            Record::with_value(Apr, "Total Inc", Some(110.0)),
            Record::with_value(May, "Total Inc", Some(160.0)),
            Record::with_value(Apr, "Cl Stk", Some(40.0)),
            Record::with_value(May, "Cl Stk", Some(30.0)),
        ]
    }

    #[test]
    fn test_build_dashboard_comparison() {
        let records = records();
        let months = [Apr, May];
        let previous_months = [Apr];
        let ctx = ViewContext::new(ViewMode::Comparison, &months, &previous_months);

        let sections = build_dashboard(&config(), &records, &records, &ctx).unwrap();
        assert_eq!(sections.len(), 2);

        let revenue = &sections[0].table;
        assert_eq!(revenue.cell("Sales", CURRENT_MONTH_KEY), Some("₹\u{a0}150.00"));
        assert_eq!(revenue.cell("Sales", YTD_KEY), Some("₹\u{a0}250.00"));
        assert!(revenue.row("Total Inc").unwrap().is_total);
        assert_eq!(sections[0].heroes[0].delta, Some(50.0));

        let stock = &sections[1].table;
        assert_eq!(stock.cell("Cl Stk", YTD_KEY), Some("30.00"));
    }

    #[test]
    fn test_build_dashboard_empty_selection() {
        let ctx = ViewContext::new(ViewMode::MtyAll, &[], &[]);
        assert!(matches!(
            build_dashboard(&config(), &records(), &[], &ctx),
            Err(PivotError::EmptySelection {
                view: ViewMode::MtyAll
            })
        ));
    }

    #[test]
    fn test_build_kpi_table() {
        let kpis = vec![
            Record::with_value(Apr, "Gross margin", Some(21.5)),
            Record::with_value(Apr, "EV (Enterprise Value)", Some(1500000.0)),
            Record::with_value(Apr, "Debt/Equity", Some(0.5)),
            Record::with_value(May, "Gross margin", Some(22.0)),
        ];
        let table = build_kpi_table(&config(), &kpis, ViewMode::Single, &[Apr]).unwrap();

        assert_eq!(table.headers(), vec!["KPI", "Apr"]);
        assert_eq!(table.cell("Gross margin", "value"), Some("21.50%"));
        assert_eq!(
            table.cell("EV (Enterprise Value)", "value"),
            Some("₹\u{a0}15,00,000.00")
        );
        assert_eq!(table.cell("Debt/Equity", "value"), Some("0.50"));
        assert_eq!(table.rows.len(), 3);
    }
}
