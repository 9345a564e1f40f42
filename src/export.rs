//! Text renderings of a [`PivotTable`]: CSV, Markdown and JSON.

use crate::error::{PivotError, Result};
use crate::schema::{ColumnSpec, FormattedRow, PivotTable};

impl PivotTable {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Headers first, then one line per row. Values keep their display form,
    /// so grouped numbers such as `12,34,567.89` are quoted.
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(self.headers())?;

        for row in &self.rows {
            writer.write_record(self.columns.iter().map(|c| cell_text(row, c)))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| PivotError::Export(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| PivotError::Export(e.to_string()))
    }

    /// GitHub-flavoured table. Value columns are right-aligned and total rows
    /// have their label in bold.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        let headers: Vec<String> = self.columns.iter().map(|c| escape(&c.header)).collect();
        output.push_str(&format!("| {} |\n", headers.join(" | ")));

        let alignment: Vec<&str> = self
            .columns
            .iter()
            .map(|c| if c.is_label() { ":---" } else { "---:" })
            .collect();
        output.push_str(&format!("| {} |\n", alignment.join(" | ")));

        for row in &self.rows {
            let cells: Vec<String> = self
                .columns
                .iter()
                .map(|c| {
                    let text = escape(cell_text(row, c));
                    if row.is_total && c.is_label() && !text.is_empty() {
                        format!("**{}**", text)
                    } else {
                        text
                    }
                })
                .collect();
            output.push_str(&format!("| {} |\n", cells.join(" | ")));
        }

        output
    }
}

fn cell_text<'a>(row: &'a FormattedRow, column: &ColumnSpec) -> &'a str {
    row.get(&column.key).unwrap_or("")
}

fn escape(text: &str) -> String {
    text.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::month::MonthCode::*;
    use crate::pivot::build_pivot;
    use crate::schema::{MeasureName, PivotOptions, Record, RowLabel, ViewMode};

    fn quarterly_table() -> PivotTable {
        let records = vec![
            Record::with_value(Apr, "Sales", Some(1234567.891)),
            Record::with_value(May, "Sales", Some(100.0)),
            Record::with_value(Apr, "Total Expns", Some(-50.0)),
        ];
        let labels = vec![RowLabel::plain("Sales"), RowLabel::total("Total Expns")];
        build_pivot(
            &records,
            "line_item",
            MeasureName::Value,
            &labels,
            ViewMode::Quarterly,
            &[Apr, May],
            &PivotOptions::flow(),
        )
        .unwrap()
    }

    #[test]
    fn test_table_to_csv() {
        let csv = quarterly_table().to_csv().unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Item,Apr,May,Quarter Total");
        assert_eq!(lines[1], "Sales,\"12,34,567.89\",100.00,\"12,34,667.89\"");
        assert_eq!(lines[2], "Total Expns,(50.00),—,(50.00)");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_csv_round_trips_through_reader() {
        let csv = quarterly_table().to_csv().unwrap();
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let first = reader.records().next().unwrap().unwrap();
        assert_eq!(&first[1], "12,34,567.89");
    }

    #[test]
    fn test_table_to_markdown() {
        let markdown = quarterly_table().to_markdown();
        let lines: Vec<&str> = markdown.lines().collect();

        assert_eq!(lines[0], "| Item | Apr | May | Quarter Total |");
        assert_eq!(lines[1], "| :--- | ---: | ---: | ---: |");
        assert!(lines[2].starts_with("| Sales |"));
        assert!(lines[3].starts_with("| **Total Expns** |"));
    }

    #[test]
    fn test_markdown_escapes_pipes() {
        let records = vec![Record::with_value(Apr, "Yarn | 2/40", Some(1.0))];
        let table = build_pivot(
            &records,
            "material",
            MeasureName::Value,
            &[RowLabel::plain("Yarn | 2/40")],
            ViewMode::Single,
            &[Apr],
            &PivotOptions::flow(),
        )
        .unwrap();
        assert!(table.to_markdown().contains("Yarn \\| 2/40"));
    }

    #[test]
    fn test_table_to_json() {
        let table = quarterly_table();
        let json = table.to_json().unwrap();
        let parsed: PivotTable = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, table);
        assert!(json.contains("\"quarter_total\""));
    }
}
