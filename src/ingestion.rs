//! Conversion of API payloads into [`Record`]s.
//!
//! Every endpoint returns `{"data": [...]}` with rows shaped like
//! `{"month": "Apr", "line_item": "Sales", "value": 1200.0}`. The label column
//! differs per ledger (`line_item`, `material`, `kpi_name`, `particulars`).

use crate::error::{PivotError, Result};
use crate::month::MonthCode;
use crate::schema::{Measures, Record};
use crate::selection::fiscal_sorted;
use log::{debug, warn};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiRow {
    pub month: String,
    #[serde(
        default,
        alias = "line_item",
        alias = "material",
        alias = "kpi_name",
        alias = "particulars"
    )]
    pub label: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub qty: Option<f64>,
    #[serde(default)]
    pub rate: Option<f64>,
    #[serde(default)]
    pub opening_stock_qty: Option<f64>,
    #[serde(default)]
    pub opening_stock_value: Option<f64>,
    #[serde(default)]
    pub purchases_qty: Option<f64>,
    #[serde(default)]
    pub purchases_value: Option<f64>,
    #[serde(default)]
    pub sales_qty: Option<f64>,
    #[serde(default)]
    pub sales_value: Option<f64>,
    #[serde(default)]
    pub closing_stock_qty: Option<f64>,
    #[serde(default)]
    pub closing_stock_value: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DataPayload {
    Envelope { data: Vec<ApiRow> },
    Rows(Vec<ApiRow>),
}

#[derive(Debug, Deserialize)]
struct MonthsPayload {
    months: Vec<String>,
}

pub fn convert_rows(rows: Vec<ApiRow>) -> Result<Vec<Record>> {
    let mut records = Vec::with_capacity(rows.len());

    for (index, row) in rows.into_iter().enumerate() {
        let month: MonthCode = row.month.parse().map_err(|_| PivotError::InvalidRecord {
            index,
            details: format!("unknown month '{}'", row.month),
        })?;

        let label = match row.label {
            Some(label) if !label.trim().is_empty() => label,
            _ => {
                return Err(PivotError::InvalidRecord {
                    index,
                    details: "missing label (line_item, material, kpi_name or particulars)"
                        .to_string(),
                })
            }
        };

        let measures = Measures {
            value: row.value,
            qty: row.qty,
            rate: row.rate,
            opening_stock_qty: row.opening_stock_qty,
            opening_stock_value: row.opening_stock_value,
            purchases_qty: row.purchases_qty,
            purchases_value: row.purchases_value,
            sales_qty: row.sales_qty,
            sales_value: row.sales_value,
            closing_stock_qty: row.closing_stock_qty,
            closing_stock_value: row.closing_stock_value,
        };

        if measures == Measures::default() {
            debug!("Record #{} ({} / {}) carries no measures", index, month, label);
        }

        records.push(Record {
            month,
            label,
            category: row.category,
            measures,
        });
    }

    Ok(records)
}

/// Parses `{"data": [...]}` or a bare array of rows.
pub fn parse_records(json: &str) -> Result<Vec<Record>> {
    let rows = match serde_json::from_str::<DataPayload>(json)? {
        DataPayload::Envelope { data } => data,
        DataPayload::Rows(rows) => rows,
    };
    let records = convert_rows(rows)?;
    debug!("Parsed {} records", records.len());
    Ok(records)
}

/// Parses `{"months": [...]}` into fiscal order. Unknown tokens are skipped.
pub fn parse_months(json: &str) -> Result<Vec<MonthCode>> {
    let payload: MonthsPayload = serde_json::from_str(json)?;
    let mut months = Vec::with_capacity(payload.months.len());
    for token in &payload.months {
        match token.parse::<MonthCode>() {
            Ok(month) => months.push(month),
            Err(_) => warn!("Skipping unknown month '{}' in months payload", token),
        }
    }
    Ok(fiscal_sorted(&months))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::MeasureName;

    #[test]
    fn test_parse_pal_envelope() {
        let json = r#"{"data": [
            {"month": "Apr", "line_item": "Sales", "qty": 10.0, "value": 1200.5, "rate": null},
            {"month": "May", "line_item": "Sales", "qty": null, "value": -40.0, "rate": 4.0}
        ]}"#;
        let records = parse_records(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].month, MonthCode::Apr);
        assert_eq!(records[0].label, "Sales");
        assert_eq!(records[0].measure(MeasureName::Qty), Some(10.0));
        assert_eq!(records[0].measure(MeasureName::Rate), None);
        assert_eq!(records[1].measure(MeasureName::Value), Some(-40.0));
    }

    #[test]
    fn test_label_aliases() {
        let json = r#"[
            {"month": "Apr", "material": "Yarn", "closing_stock_value": 50.0},
            {"month": "Apr", "kpi_name": "EBITDA", "value": 12.0},
            {"month": "Apr", "category": "Power", "line_item": "Electricity", "value": 8.0}
        ]"#;
        let records = parse_records(json).unwrap();
        assert_eq!(records[0].label, "Yarn");
        assert_eq!(records[0].measure(MeasureName::ClosingStockValue), Some(50.0));
        assert_eq!(records[1].label, "EBITDA");
        assert_eq!(records[2].label, "Electricity");
        assert_eq!(records[2].category.as_deref(), Some("Power"));
    }

    #[test]
    fn test_invalid_rows() {
        let bad_month = r#"{"data": [{"month": "Apr", "line_item": "A"}, {"month": "Sept", "line_item": "B"}]}"#;
        match parse_records(bad_month) {
            Err(PivotError::InvalidRecord { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected InvalidRecord, got {:?}", other),
        }

        let no_label = r#"[{"month": "Apr", "value": 1.0}]"#;
        assert!(matches!(
            parse_records(no_label),
            Err(PivotError::InvalidRecord { index: 0, .. })
        ));

        assert!(matches!(
            parse_records("not json"),
            Err(PivotError::Serialization(_))
        ));
    }

    #[test]
    fn test_parse_months() {
        let months = parse_months(r#"{"months": ["Jan", "Apr", "Bogus", "May"]}"#).unwrap();
        assert_eq!(months, vec![MonthCode::Apr, MonthCode::May, MonthCode::Jan]);
    }
}
