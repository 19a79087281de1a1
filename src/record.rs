//! Stop records as they arrive from the dataset.
//!
//! A record keeps the raw JSON object so that a missing or mistyped key is
//! still visible to the field validator instead of failing deserialization.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The keys a stop record is expected to carry, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    BusId,
    StopId,
    StopName,
    NextStop,
    StopType,
    ATime,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::BusId,
        Field::StopId,
        Field::StopName,
        Field::NextStop,
        Field::StopType,
        Field::ATime,
    ];

    /// JSON key of the field.
    pub fn name(self) -> &'static str {
        match self {
            Field::BusId => "bus_id",
            Field::StopId => "stop_id",
            Field::StopName => "stop_name",
            Field::NextStop => "next_stop",
            Field::StopType => "stop_type",
            Field::ATime => "a_time",
        }
    }
}

/// Route identifier. Wide enough for every JSON integer, signed or not.
pub type BusId = i128;

/// Role of a stop on its route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopType {
    Start,
    Ordinary,
    Finish,
}

impl StopType {
    /// Maps the raw `stop_type` value. The empty string means ordinary.
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw {
            "S" => Some(StopType::Start),
            "O" | "" => Some(StopType::Ordinary),
            "F" => Some(StopType::Finish),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct StopRecord(Map<String, Value>);

impl StopRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Raw value of `field`, if the key is present.
    pub fn get(&self, field: Field) -> Option<&Value> {
        self.0.get(field.name())
    }

    /// Route identifier. Only integer JSON numbers count.
    pub fn bus_id(&self) -> Option<BusId> {
        self.get(Field::BusId).and_then(as_integer)
    }

    pub fn stop_name(&self) -> Option<&str> {
        self.get(Field::StopName).and_then(Value::as_str)
    }

    pub fn stop_type(&self) -> Option<StopType> {
        self.get(Field::StopType)
            .and_then(Value::as_str)
            .and_then(StopType::from_raw)
    }

    pub fn a_time(&self) -> Option<&str> {
        self.get(Field::ATime).and_then(Value::as_str)
    }
}

/// Returns the value when it is an integer number, not a float or a
/// numeric string. Every `i64` and `u64` fits.
pub fn as_integer(value: &Value) -> Option<i128> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from)),
        _ => None,
    }
}
