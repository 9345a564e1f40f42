use ledger_pivot::{
    available_months, build_pivot, default_selection, looks_like_total, parse_records, series,
    MeasureName, PivotOptions, RowLabel, ValueUnit, ViewMode, QUARTER_TOTAL_KEY,
};

const PAYLOAD: &str = r#"{"data": [
    {"month": "Apr", "line_item": "Sales", "value": 1845000.0},
    {"month": "May", "line_item": "Sales", "value": 1920500.5},
    {"month": "Jun", "line_item": "Sales", "value": 2010750.0},
    {"month": "Apr", "line_item": "Power", "value": 312000.0},
    {"month": "May", "line_item": "Power", "value": 298400.0},
    {"month": "Jun", "line_item": "Power", "value": 305900.0},
    {"month": "Apr", "line_item": "Total Expns", "value": 1610000.0},
    {"month": "May", "line_item": "Total Expns", "value": 1702000.0},
    {"month": "Jun", "line_item": "Total Expns", "value": 1755250.0},
    {"month": "Apr", "line_item": "Nett Profit", "value": 235000.0},
    {"month": "May", "line_item": "Nett Profit", "value": 218500.5},
    {"month": "Jun", "line_item": "Nett Profit", "value": -12500.0}
]}"#;

fn main() {
    let records = parse_records(PAYLOAD).expect("demo payload should parse");
    let months = default_selection(ViewMode::Quarterly, &available_months(&records));

    let labels: Vec<RowLabel> = ["Sales", "Power", "Total Expns", "Nett Profit"]
        .into_iter()
        .map(|name| RowLabel {
            name: name.to_string(),
            is_total: looks_like_total(name),
        })
        .collect();

    let table = build_pivot(
        &records,
        "line_item",
        MeasureName::Value,
        &labels,
        ViewMode::Quarterly,
        &months,
        &PivotOptions::flow().with_unit(ValueUnit::Currency),
    )
    .expect("quarterly pivot should build");

    println!("{}", table.to_markdown());

    if let Some(total) = table.cell("Nett Profit", QUARTER_TOTAL_KEY) {
        println!("Quarter net profit: {}", total);
    }

    let trend = series(&records, "Nett Profit", months[months.len() - 1]);
    println!("Net profit trend: {:?} ({:?})", trend.values(), trend.direction());
}
