use anyhow::Result;
use quickchart::prelude::*;
use serde_json::json;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let qc = QuickChart::default().set_config(json!({
        "type": "radar",
        "data": {
            "labels": ["A", "B", "C"],
            "datasets": [{
                "backgroundColor": image_fill(
                    "https://cdn.pixabay.com/photo/2017/08/30/01/05/milky-way-2695569__340.jpg"
                ),
                "borderColor": "green",
                "borderWidth": 1,
                "pointRadius": 0,
                "data": [1, 2, 3]
            }]
        },
        "options": {
            "legend": { "display": false },
            "scale": {
                "ticks": { "beginAtZero": true },
                "angleLines": { "display": false },
                "pointLabels": { "display": false }
            }
        }
    }));

    qc.to_file("/tmp/chart.png").await?;
    println!("Written to /tmp/chart.png");
    Ok(())
}
