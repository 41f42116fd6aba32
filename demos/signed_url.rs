use anyhow::Result;
use quickchart::prelude::*;
use serde_json::json;

fn main() -> Result<()> {
    let qc = QuickChart::with_credentials("abc123", "12345")
        .set_config(json!({
            "type": "bar",
            "data": {
                "labels": ["Hello world", "Foo bar"],
                "datasets": [{ "label": "Foo", "data": [1, 2] }]
            }
        }))
        .set_background_color("transparent");

    println!("{}", qc.get_signed_url()?);
    Ok(())
}
