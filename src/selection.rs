//! Month-selection helpers for choosing which months a view covers.

use crate::month::{prefix_through, MonthCode, Quarter, FISCAL_ORDER};
use crate::schema::{Record, ViewMode};

/// Most months a custom multi-month selection may hold.
pub const MAX_CUSTOM_MONTHS: usize = 3;

const MONTHS_PER_QUARTER: usize = 3;

/// Months with at least one record, in fiscal order.
pub fn available_months(records: &[Record]) -> Vec<MonthCode> {
    FISCAL_ORDER
        .iter()
        .copied()
        .filter(|m| records.iter().any(|r| r.month == *m))
        .collect()
}

/// Sorts into fiscal order and drops repeats.
pub fn fiscal_sorted(months: &[MonthCode]) -> Vec<MonthCode> {
    FISCAL_ORDER
        .iter()
        .copied()
        .filter(|m| months.contains(m))
        .collect()
}

/// The selection a view starts with when the user switches to it.
///
/// `available` must be in fiscal order. Returns an empty selection when
/// nothing is available.
pub fn default_selection(view: ViewMode, available: &[MonthCode]) -> Vec<MonthCode> {
    let Some(&latest) = available.last() else {
        return Vec::new();
    };

    match view {
        ViewMode::Single | ViewMode::Comparison => vec![latest],
        ViewMode::Quarterly => {
            let end = available.len();
            let start = end.saturating_sub(MONTHS_PER_QUARTER);
            available[start..end].to_vec()
        }
        ViewMode::MtyAll => prefix_through(latest)
            .iter()
            .copied()
            .filter(|m| available.contains(m))
            .collect(),
    }
}

/// The quarter's months that have data.
pub fn quarter_selection(quarter: Quarter, available: &[MonthCode]) -> Vec<MonthCode> {
    quarter
        .months()
        .iter()
        .copied()
        .filter(|m| available.contains(m))
        .collect()
}

/// Adds or removes `month` from a custom selection.
///
/// The last remaining month cannot be removed and no more than
/// [`MAX_CUSTOM_MONTHS`] can be selected; in those cases the selection is
/// returned unchanged.
pub fn toggle_month(selected: &[MonthCode], month: MonthCode) -> Vec<MonthCode> {
    if selected.contains(&month) {
        if selected.len() > 1 {
            return selected.iter().copied().filter(|m| *m != month).collect();
        }
        return selected.to_vec();
    }

    if selected.len() < MAX_CUSTOM_MONTHS {
        let mut next = selected.to_vec();
        next.push(month);
        return fiscal_sorted(&next);
    }

    selected.to_vec()
}

/// The available month immediately before `current`, used as the comparison baseline.
pub fn previous_month(current: MonthCode, available: &[MonthCode]) -> Option<MonthCode> {
    let idx = available.iter().position(|m| *m == current)?;
    idx.checked_sub(1).map(|i| available[i])
}
