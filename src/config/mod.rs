//! Chart configuration values and their canonical text form.
//!
//! A chart is either a [`ChartValue`] tree or text that is already in
//! canonical form. Trees are rendered as compact JavaScript object literals
//! (`{type:'bar',data:{labels:['a','b']}}`), which is what the rendering
//! service evaluates. [`ChartValue::Raw`] carries expressions such as helper
//! calls or tick callbacks that must reach the service unquoted.

use indexmap::IndexMap;
use serde::{
    Serialize, Serializer,
    ser::{SerializeMap, SerializeSeq},
};
use serde_json::{Number, Value};

use crate::{Result, helpers};

mod literal;

pub use literal::stringify;
pub(crate) use literal::format_number;

pub type ChartObject = IndexMap<String, ChartValue>;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ChartValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<ChartValue>),
    /// Keys keep insertion order; the serialized string depends on it.
    Object(ChartObject),
    /// Emitted verbatim.
    Raw(String),
}

impl ChartValue {
    /// A JavaScript expression passed to the service as-is, e.g.
    /// `function(value) { return '$' + value; }`.
    pub fn raw(expression: impl Into<String>) -> Self {
        ChartValue::Raw(expression.into())
    }

    pub fn object<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<ChartValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        ChartValue::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Inserts into an object value, keeping the position of an existing key.
    /// Returns `false` when `self` is not an object.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ChartValue>) -> bool {
        match self {
            ChartValue::Object(map) => {
                map.insert(key.into(), value.into());
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, key: &str) -> Option<&ChartValue> {
        match self {
            ChartValue::Object(map) => map.get(key),
            _ => None,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, ChartValue::Raw(_))
    }
}

impl From<Value> for ChartValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ChartValue::Null,
            Value::Bool(b) => ChartValue::Bool(b),
            Value::Number(n) => ChartValue::Number(n),
            Value::String(s) => match helpers::unwrap_marker(&s) {
                Some(expression) => ChartValue::Raw(expression.to_string()),
                None => ChartValue::String(s),
            },
            Value::Array(items) => ChartValue::Array(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                ChartValue::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<bool> for ChartValue {
    fn from(value: bool) -> Self {
        ChartValue::Bool(value)
    }
}

impl From<&str> for ChartValue {
    fn from(value: &str) -> Self {
        ChartValue::String(value.to_string())
    }
}

impl From<String> for ChartValue {
    fn from(value: String) -> Self {
        ChartValue::String(value)
    }
}

macro_rules! number_from {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for ChartValue {
                fn from(value: $ty) -> Self {
                    ChartValue::Number(Number::from(value))
                }
            }
        )+
    };
}

number_from!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

/// Non-finite floats become `null`, as in `serde_json`.
impl From<f64> for ChartValue {
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(ChartValue::Null, ChartValue::Number)
    }
}

impl From<f32> for ChartValue {
    fn from(value: f32) -> Self {
        ChartValue::from(f64::from(value))
    }
}

impl<T: Into<ChartValue>> From<Vec<T>> for ChartValue {
    fn from(items: Vec<T>) -> Self {
        ChartValue::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ChartValue>> From<Option<T>> for ChartValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ChartValue::Null, Into::into)
    }
}

impl From<ChartObject> for ChartValue {
    fn from(map: ChartObject) -> Self {
        ChartValue::Object(map)
    }
}

impl<T: Into<ChartValue>> FromIterator<T> for ChartValue {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        ChartValue::Array(iter.into_iter().map(Into::into).collect())
    }
}

/// Raw expressions serialize in their marker form so they survive a trip
/// through `serde_json::Value` and come back as [`ChartValue::Raw`].
impl Serialize for ChartValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ChartValue::Null => serializer.serialize_unit(),
            ChartValue::Bool(b) => serializer.serialize_bool(*b),
            ChartValue::Number(n) => n.serialize(serializer),
            ChartValue::String(s) => serializer.serialize_str(s),
            ChartValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ChartValue::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            ChartValue::Raw(expression) => {
                serializer.serialize_str(&helpers::wrap_marker(expression))
            }
        }
    }
}

/// What `set_config` accepts: a value tree or pre-serialized text.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartSpec {
    /// Already canonical; passed through untouched.
    Text(String),
    Value(ChartValue),
}

impl ChartSpec {
    /// Converts any serializable configuration. Fails on values JSON cannot
    /// represent, such as maps with non-string keys.
    pub fn from_serialize<T: Serialize + ?Sized>(config: &T) -> Result<Self> {
        Ok(ChartSpec::Value(serde_json::to_value(config)?.into()))
    }

    /// The canonical string, or `None` when there is nothing to render.
    pub fn serialize(&self) -> Option<String> {
        let out = match self {
            ChartSpec::Text(text) => text.clone(),
            ChartSpec::Value(value) => stringify(value),
        };
        (!out.is_empty()).then_some(out)
    }
}

impl From<&str> for ChartSpec {
    fn from(text: &str) -> Self {
        ChartSpec::Text(text.to_string())
    }
}

impl From<String> for ChartSpec {
    fn from(text: String) -> Self {
        ChartSpec::Text(text)
    }
}

impl From<ChartValue> for ChartSpec {
    fn from(value: ChartValue) -> Self {
        ChartSpec::Value(value)
    }
}

impl From<Value> for ChartSpec {
    fn from(value: Value) -> Self {
        ChartSpec::Value(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::image_fill;
    use serde_json::json;

    #[test]
    fn test_text_passes_through() {
        let text = "{ type: 'bar', data: { labels: [1] } }";
        assert_eq!(ChartSpec::from(text).serialize().as_deref(), Some(text));
        assert_eq!(ChartSpec::from("").serialize(), None);
    }

    #[test]
    fn test_json_keeps_insertion_order() {
        let spec = ChartSpec::from(json!({"zeta": 1, "alpha": 2, "mid": 3}));
        assert_eq!(spec.serialize().unwrap(), "{zeta:1,alpha:2,mid:3}");
    }

    #[test]
    fn test_marker_string_becomes_raw() {
        let value = ChartValue::from(json!({ "backgroundColor": image_fill("https://x.io/a.png") }));
        assert!(value.get("backgroundColor").unwrap().is_raw());

        let plain = ChartValue::from(json!({ "label": "__BEGINFUNCTION__ only prefix" }));
        assert!(!plain.get("label").unwrap().is_raw());
    }

    #[test]
    fn test_raw_survives_serde_round_trip() {
        let callback = ChartValue::raw("function(v) { return v; }");
        let value = ChartValue::from(json!({ "ticks": { "callback": callback } }));
        assert_eq!(
            stringify(&value),
            "{ticks:{callback:function(v) { return v; }}}"
        );
    }

    #[test]
    fn test_from_serialize_rejects_non_string_keys() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(vec![1u8], 1);
        assert!(ChartSpec::from_serialize(&map).is_err());
    }

    #[test]
    fn test_insert_keeps_position() {
        let mut value = ChartValue::object([("a", 1), ("b", 2)]);
        assert!(value.insert("a", 3));
        assert_eq!(stringify(&value), "{a:3,b:2}");
        assert!(!ChartValue::Null.insert("a", 1));
    }

    #[test]
    fn test_non_finite_float_is_null() {
        assert_eq!(ChartValue::from(f64::NAN), ChartValue::Null);
    }
}
