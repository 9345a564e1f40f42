use crate::error::{PivotError, Result};
use crate::format::format_unit;
use crate::lookup::{lookup, ytd_sum};
use crate::month::{MonthCode, FISCAL_ORDER};
use crate::schema::{
    AggregationKind, ColumnRole, ColumnSpec, FormattedRow, MeasureName, PivotOptions, PivotTable,
    Record, RowLabel, ViewMode,
};
use log::{debug, trace, warn};
use std::collections::BTreeMap;

pub const VALUE_KEY: &str = "value";
pub const QUARTER_TOTAL_KEY: &str = "q_total";
pub const CURRENT_MONTH_KEY: &str = "cur_month";
pub const YTD_KEY: &str = "ytd";

pub const QUARTER_TOTAL_HEADER: &str = "Quarter Total";
pub const CURRENT_MONTH_MARKER: &str = "▶";

/// Cell keys used by value columns. Month columns are keyed by the month code.
pub const RESERVED_KEYS: [&str; 4] = [VALUE_KEY, QUARTER_TOTAL_KEY, CURRENT_MONTH_KEY, YTD_KEY];

/// True when `key` would share a cell with a value column.
pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key) || FISCAL_ORDER.iter().any(|m| m.as_str() == key)
}

/// Reshapes a flat record set into the column layout of one [`ViewMode`].
///
/// Holds no state between calls; every `build` is a pure function of the
/// records, labels, view and month selection.
pub struct PivotBuilder<'a> {
    records: &'a [Record],
    label_key: &'a str,
    measure: MeasureName,
    options: &'a PivotOptions,
}

impl<'a> PivotBuilder<'a> {
    pub fn new(
        records: &'a [Record],
        label_key: &'a str,
        measure: MeasureName,
        options: &'a PivotOptions,
    ) -> Self {
        Self {
            records,
            label_key,
            measure,
            options,
        }
    }

    pub fn build(
        &self,
        labels: &[RowLabel],
        view: ViewMode,
        months: &[MonthCode],
    ) -> Result<PivotTable> {
        if months.is_empty() {
            warn!("Rejecting {} pivot with no selected months", view);
            return Err(PivotError::EmptySelection { view });
        }
        if is_reserved_key(self.label_key) {
            warn!("Rejecting label key '{}' shared with a value column", self.label_key);
            return Err(PivotError::ReservedLabelKey(self.label_key.to_string()));
        }

        let months = dedup_months(months);

        debug!(
            "Building {} pivot: {} labels, {} months, {:?} aggregation over {} records",
            view,
            labels.len(),
            months.len(),
            self.options.aggregation,
            self.records.len()
        );

        let table = match view {
            ViewMode::Single => self.build_single(labels, months[0]),
            ViewMode::Quarterly => self.build_quarterly(labels, &months),
            ViewMode::MtyAll => self.build_mty_all(labels, &months),
            ViewMode::Comparison => self.build_comparison(labels, &months),
        };

        debug!("Pivot produced {} columns", table.columns.len());
        Ok(table)
    }

    fn build_single(&self, labels: &[RowLabel], month: MonthCode) -> PivotTable {
        let columns = vec![
            self.label_column(),
            ColumnSpec::new(VALUE_KEY, month.as_str(), ColumnRole::PlainValue),
        ];

        let rows = labels
            .iter()
            .map(|label| {
                let mut row = self.start_row(label);
                let value = self.value(&label.name, month);
                row.cells
                    .insert(VALUE_KEY.to_string(), self.display(&label.name, value));
                row
            })
            .collect();

        PivotTable { columns, rows }
    }

    fn build_quarterly(&self, labels: &[RowLabel], months: &[MonthCode]) -> PivotTable {
        let mut columns = vec![self.label_column()];
        columns.extend(months.iter().map(|m| month_column(*m)));
        columns.push(ColumnSpec::new(
            QUARTER_TOTAL_KEY,
            QUARTER_TOTAL_HEADER,
            ColumnRole::QuarterTotal,
        ));

        // months is non-empty, checked in build()
        let last = months[months.len() - 1];

        let rows = labels
            .iter()
            .map(|label| {
                let mut row = self.start_row(label);
                let values: Vec<Option<f64>> =
                    months.iter().map(|m| self.value(&label.name, *m)).collect();

                for (month, value) in months.iter().zip(&values) {
                    row.cells
                        .insert(month.as_str().to_string(), self.display(&label.name, *value));
                }

                let total = match self.options.aggregation {
                    AggregationKind::Flow => sum_present(&values),
                    AggregationKind::Snapshot => self.value(&label.name, last),
                };
                trace!(
                    "Quarter total for '{}' ({:?}): {:?}",
                    label.name,
                    self.options.aggregation,
                    total
                );
                row.cells.insert(
                    QUARTER_TOTAL_KEY.to_string(),
                    self.display(&label.name, total),
                );
                row
            })
            .collect();

        PivotTable { columns, rows }
    }

    /// One column per selected month, current (last) month first. Callers pass
    /// the April-to-current prefix, e.g. from [`crate::selection::default_selection`];
    /// months missing from the selection get no column.
    fn build_mty_all(&self, labels: &[RowLabel], months: &[MonthCode]) -> PivotTable {
        let current = months[months.len() - 1];
        let ordered: Vec<MonthCode> = std::iter::once(current)
            .chain(months.iter().copied().filter(|m| *m != current))
            .collect();

        let mut columns = vec![self.label_column()];
        for month in &ordered {
            let mut column = month_column(*month);
            if *month == current {
                column.header = format!("{} {}", CURRENT_MONTH_MARKER, month);
                column.emphasized = true;
            }
            columns.push(column);
        }

        let rows = labels
            .iter()
            .map(|label| {
                let mut row = self.start_row(label);
                for month in &ordered {
                    let value = self.value(&label.name, *month);
                    row.cells
                        .insert(month.as_str().to_string(), self.display(&label.name, value));
                }
                row
            })
            .collect();

        PivotTable { columns, rows }
    }

    fn build_comparison(&self, labels: &[RowLabel], months: &[MonthCode]) -> PivotTable {
        let current = months[months.len() - 1];

        let columns = vec![
            self.label_column(),
            ColumnSpec::new(CURRENT_MONTH_KEY, current.as_str(), ColumnRole::PlainValue),
            ColumnSpec::new(
                YTD_KEY,
                format!("YTD ({}–{})", FISCAL_ORDER[0], current),
                ColumnRole::YtdTotal,
            ),
        ];

        let rows = labels
            .iter()
            .map(|label| {
                let mut row = self.start_row(label);
                let current_value = self.value(&label.name, current);
                let ytd = match self.options.aggregation {
                    AggregationKind::Flow => {
                        Some(ytd_sum(self.records, &label.name, current, self.measure))
                    }
                    AggregationKind::Snapshot => current_value,
                };
                trace!("YTD for '{}' through {}: {:?}", label.name, current, ytd);

                row.cells.insert(
                    CURRENT_MONTH_KEY.to_string(),
                    self.display(&label.name, current_value),
                );
                row.cells
                    .insert(YTD_KEY.to_string(), self.display(&label.name, ytd));
                row
            })
            .collect();

        PivotTable { columns, rows }
    }

    fn label_column(&self) -> ColumnSpec {
        ColumnSpec::new(
            self.label_key,
            self.options.label_header.as_str(),
            ColumnRole::Label,
        )
    }

    fn start_row(&self, label: &RowLabel) -> FormattedRow {
        let mut cells = BTreeMap::new();
        cells.insert(self.label_key.to_string(), label.name.clone());
        FormattedRow {
            label: label.name.clone(),
            is_total: label.is_total,
            cells,
        }
    }

    fn value(&self, label: &str, month: MonthCode) -> Option<f64> {
        lookup(self.records, label, month, self.measure)
    }

    fn display(&self, label: &str, value: Option<f64>) -> String {
        format_unit(value, self.options.unit_for(label))
    }
}

/// Builds one pivot table. See [`PivotBuilder`].
pub fn build_pivot(
    records: &[Record],
    label_key: &str,
    measure: MeasureName,
    labels: &[RowLabel],
    view: ViewMode,
    months: &[MonthCode],
    options: &PivotOptions,
) -> Result<PivotTable> {
    PivotBuilder::new(records, label_key, measure, options).build(labels, view, months)
}

fn month_column(month: MonthCode) -> ColumnSpec {
    ColumnSpec::new(
        month.as_str(),
        month.as_str(),
        ColumnRole::GroupedByMonth(month),
    )
}

fn sum_present(values: &[Option<f64>]) -> Option<f64> {
    values
        .iter()
        .flatten()
        .fold(None, |acc, v| Some(acc.unwrap_or(0.0) + v))
}

fn dedup_months(months: &[MonthCode]) -> Vec<MonthCode> {
    let mut unique = Vec::with_capacity(months.len());
    for month in months {
        if !unique.contains(month) {
            unique.push(*month);
        }
    }
    if unique.len() != months.len() {
        warn!("Ignoring repeated months in selection {:?}", months);
    }
    unique
}
