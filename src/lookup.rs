//! Queries over a flat record set.
//!
//! Record sets are small (tens to a few hundred rows), so every query is a
//! linear scan. When a `(label, month)` pair occurs more than once the first
//! record wins.

use crate::month::{prefix_through, MonthCode};
use crate::schema::{MeasureName, Record};
use std::collections::HashSet;

pub fn find<'a>(records: &'a [Record], label: &str, month: MonthCode) -> Option<&'a Record> {
    records
        .iter()
        .find(|r| r.month == month && r.label == label)
}

/// The `measure` of the first record matching `label` and `month`.
pub fn lookup(
    records: &[Record],
    label: &str,
    month: MonthCode,
    measure: MeasureName,
) -> Option<f64> {
    find(records, label, month).and_then(|r| r.measure(measure))
}

/// Shorthand for [`lookup`] on the `value` measure.
pub fn lookup_value(records: &[Record], label: &str, month: MonthCode) -> Option<f64> {
    lookup(records, label, month, MeasureName::Value)
}

/// Sum of `label`'s values from April through `through`, absent months counting as zero.
pub fn ytd_sum(records: &[Record], label: &str, through: MonthCode, measure: MeasureName) -> f64 {
    prefix_through(through)
        .iter()
        .filter_map(|m| lookup(records, label, *m, measure))
        .sum()
}

/// Sum of `measure` over every label in `month`, or `None` if no record carries it.
pub fn month_total(records: &[Record], month: MonthCode, measure: MeasureName) -> Option<f64> {
    records
        .iter()
        .filter(|r| r.month == month)
        .filter_map(|r| r.measure(measure))
        .fold(None, |acc, v| Some(acc.unwrap_or(0.0) + v))
}

/// Distinct labels in first-seen order.
pub fn labels_in_order(records: &[Record]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    records
        .iter()
        .filter(|r| seen.insert(r.label.as_str()))
        .map(|r| r.label.clone())
        .collect()
}
