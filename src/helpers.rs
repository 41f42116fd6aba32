//! Fill helpers evaluated by the rendering service.
//!
//! Each function returns a [`Helper`] holding a call such as
//! `getImageFill("https://...")`. Put it anywhere in a chart config, either as
//! a [`ChartValue`] or inside `serde_json::json!`, and it is written into the
//! chart string as a bare call instead of a string literal.

use std::fmt::{self, Display};

use serde::{Serialize, Serializer};
use serde_json::{Value, json};

use crate::config::ChartValue;

const BEGIN_MARKER: &str = "__BEGINFUNCTION__";
const END_MARKER: &str = "__ENDFUNCTION__";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Helper(String);

impl Helper {
    fn call(name: &str, args: &[String]) -> Self {
        Helper(format!("{name}({})", args.join(", ")))
    }

    /// The call expression, e.g. `getImageFill("https://example.com/a.png")`.
    pub fn expression(&self) -> &str {
        &self.0
    }
}

impl Display for Helper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Helper> for ChartValue {
    fn from(helper: Helper) -> Self {
        ChartValue::Raw(helper.0)
    }
}

impl Serialize for Helper {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&wrap_marker(&self.0))
    }
}

pub(crate) fn wrap_marker(expression: &str) -> String {
    format!("{BEGIN_MARKER}{expression}{END_MARKER}")
}

/// The expression inside a string that is exactly one marked call.
pub(crate) fn unwrap_marker(s: &str) -> Option<&str> {
    let inner = s.strip_prefix(BEGIN_MARKER)?.strip_suffix(END_MARKER)?;
    if inner.contains(BEGIN_MARKER) || inner.contains(END_MARKER) {
        return None;
    }
    Some(inner)
}

/// Integral values are written without a fraction, like `JSON.stringify`.
fn js_number(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GradientDimensions {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl GradientDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }

    fn to_value(self) -> Value {
        let mut map = serde_json::Map::new();
        if let Some(width) = self.width {
            map.insert("width".to_string(), width.into());
        }
        if let Some(height) = self.height {
            map.insert("height".to_string(), height.into());
        }
        Value::Object(map)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: String,
}

impl GradientStop {
    pub fn new(offset: f64, color: impl Into<String>) -> Self {
        Self {
            offset,
            color: color.into(),
        }
    }
}

/// Linear gradient across `colors` along `direction` (`"horizontal"` or
/// `"vertical"`). Without `dimensions` the service uses the chart size.
pub fn gradient_fill_helper<S: AsRef<str>>(
    direction: &str,
    colors: &[S],
    dimensions: Option<GradientDimensions>,
) -> Helper {
    let colors: Vec<Value> = colors.iter().map(|c| Value::from(c.as_ref())).collect();
    let dimensions = match dimensions {
        Some(dimensions) => dimensions.to_value().to_string(),
        None => "undefined".to_string(),
    };
    Helper::call(
        "getGradientFillHelper",
        &[
            Value::from(direction).to_string(),
            Value::Array(colors).to_string(),
            dimensions,
        ],
    )
}

/// Canvas gradient with explicit color stops. `linear_gradient` holds the
/// `x0, y0, x1, y1` coordinates.
pub fn gradient_fill(stops: &[GradientStop], linear_gradient: [f64; 4]) -> Helper {
    let stops: Vec<Value> = stops
        .iter()
        .map(|stop| json!({ "offset": js_number(stop.offset), "color": stop.color }))
        .collect();
    let coordinates: Vec<Value> = linear_gradient.iter().copied().map(js_number).collect();
    Helper::call(
        "getGradientFill",
        &[
            Value::Array(stops).to_string(),
            Value::Array(coordinates).to_string(),
        ],
    )
}

pub fn image_fill(url: &str) -> Helper {
    Helper::call("getImageFill", &[Value::from(url).to_string()])
}

pub mod pattern {
    use serde_json::Value;

    use super::{Helper, js_number};

    /// Procedural pattern fill. `shape_type` is one of the service's shapes
    /// (`"square"`, `"circle"`, `"diagonal"`, ...).
    pub fn draw(
        shape_type: &str,
        background_color: &str,
        pattern_color: &str,
        requested_size: f64,
    ) -> Helper {
        Helper::call(
            "pattern.draw",
            &[
                Value::from(shape_type).to_string(),
                Value::from(background_color).to_string(),
                Value::from(pattern_color).to_string(),
                js_number(requested_size).to_string(),
            ],
        )
    }
}
