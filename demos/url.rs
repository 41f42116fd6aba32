use anyhow::Result;
use quickchart::prelude::*;
use serde_json::json;

fn main() -> Result<()> {
    let callback = ChartValue::raw("function (value) { return '$' + value; }");
    let qc = QuickChart::default()
        .set_config(json!({
            "type": "bar",
            "data": {
                "labels": ["January", "February", "March", "April", "May"],
                "datasets": [{ "label": "Dogs", "data": [50, 60, 70, 180, 190] }]
            },
            "options": {
                "scales": { "yAxes": [{ "ticks": { "callback": callback } }] }
            }
        }))
        .set_width(500)
        .set_height(300)
        .set_background_color("#0febc2");

    println!("{}", qc.get_url()?);
    Ok(())
}
