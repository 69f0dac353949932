//! Raw sample decoding.
//!
//! Sensor payloads are heterogeneous: most numeric topics carry a JSON array
//! of floats, but rows that went through the store's JSON column come back
//! as a string that itself encodes the array. Anything that doesn't decode
//! to an ordered numeric sequence is dropped silently — unparsable samples
//! are expected and must never abort the pipeline.

use serde_json::Value;

use crate::protocol::Message;

/// One decoded observation: timestamp plus an ordered vector of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub t: f64,
    pub vals: Vec<f64>,
}

impl Point {
    pub fn new(t: f64, vals: Vec<f64>) -> Self {
        Self { t, vals }
    }
}

/// Decode a raw payload into an ordered numeric sequence, or nothing.
pub fn parse_payload(data: &Value) -> Option<Vec<f64>> {
    match data {
        Value::Array(items) => {
            let mut vals = Vec::with_capacity(items.len());
            for item in items {
                vals.push(item.as_f64()?);
            }
            Some(vals)
        }
        Value::String(text) => {
            let inner: Value = serde_json::from_str(text).ok()?;
            match inner {
                // One level of string wrapping is a known store artifact;
                // deeper nesting is garbage.
                Value::Array(_) => parse_payload(&inner),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Decode one raw sample into a [`Point`], or nothing.
pub fn parse_sample(msg: &Message) -> Option<Point> {
    let data = msg.data.as_ref()?;
    let vals = parse_payload(data)?;
    Some(Point::new(msg.timestamp, vals))
}
