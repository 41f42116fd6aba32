use anyhow::Result;
use quickchart::prelude::*;
use serde_json::json;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let data: Vec<u32> = (0..100).collect();
    let qc = QuickChart::default().set_config(json!({
        "type": "bar",
        "data": {
            "labels": ["Hello world", "Foo bar"],
            "datasets": [{ "label": "Foo", "data": data }]
        }
    }));

    println!("{}", qc.get_url()?);
    println!("{}", qc.get_short_url().await?);
    Ok(())
}
