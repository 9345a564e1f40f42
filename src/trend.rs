use crate::lookup::lookup;
use crate::month::{prefix_through, MonthCode};
use crate::schema::{MeasureName, Record};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Rising,
    Falling,
}

/// Historical values of one label, April through `through`, with absent months dropped.
///
/// Nothing is cached: every call to [`TrendSeries::iter`] rescans the records,
/// so a series can be iterated any number of times.
#[derive(Debug, Clone, Copy)]
pub struct TrendSeries<'a> {
    records: &'a [Record],
    label: &'a str,
    through: MonthCode,
    measure: MeasureName,
}

impl<'a> TrendSeries<'a> {
    pub fn new(records: &'a [Record], label: &'a str, through: MonthCode) -> Self {
        Self {
            records,
            label,
            through,
            measure: MeasureName::Value,
        }
    }

    pub fn with_measure(mut self, measure: MeasureName) -> Self {
        self.measure = measure;
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + 'a {
        let Self {
            records,
            label,
            measure,
            ..
        } = *self;
        prefix_through(self.through)
            .iter()
            .filter_map(move |m| lookup(records, label, *m, measure))
    }

    /// Like [`TrendSeries::iter`], but keeps the month of each point.
    pub fn points(&self) -> impl Iterator<Item = (MonthCode, f64)> + 'a {
        let Self {
            records,
            label,
            measure,
            ..
        } = *self;
        prefix_through(self.through)
            .iter()
            .filter_map(move |m| lookup(records, label, *m, measure).map(|v| (*m, v)))
    }

    pub fn values(&self) -> Vec<f64> {
        self.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// `Rising` when the last point is at least the first. Needs two points.
    pub fn direction(&self) -> Option<TrendDirection> {
        let mut iter = self.iter();
        let first = iter.next()?;
        let last = iter.last()?;
        if last >= first {
            Some(TrendDirection::Rising)
        } else {
            Some(TrendDirection::Falling)
        }
    }
}

impl<'a> IntoIterator for TrendSeries<'a> {
    type Item = f64;
    type IntoIter = Box<dyn Iterator<Item = f64> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

pub fn series<'a>(records: &'a [Record], label: &'a str, through: MonthCode) -> TrendSeries<'a> {
    TrendSeries::new(records, label, through)
}
