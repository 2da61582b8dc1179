//! Serde helpers storing non-finite floats as `"nan"`, `"inf"` and `"-inf"`,
//! which JSON cannot hold as numbers.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq)]
struct FloatRepr(f64);

impl Serialize for FloatRepr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let v = self.0;
        if v.is_nan() {
            serializer.serialize_str("nan")
        } else if v.is_infinite() {
            serializer.serialize_str(if v > 0.0 { "inf" } else { "-inf" })
        } else {
            serializer.serialize_f64(v)
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Stored {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for FloatRepr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Stored::deserialize(deserializer)? {
            Stored::Number(v) => Ok(FloatRepr(v)),
            Stored::Text(text) => match text.as_str() {
                "nan" => Ok(FloatRepr(f64::NAN)),
                "inf" => Ok(FloatRepr(f64::INFINITY)),
                "-inf" => Ok(FloatRepr(f64::NEG_INFINITY)),
                other => Err(D::Error::custom(format!("invalid float '{}'", other))),
            },
        }
    }
}

pub(super) fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    FloatRepr(*value).serialize(serializer)
}

pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    FloatRepr::deserialize(deserializer).map(|f| f.0)
}

pub(super) mod vec {
    use super::*;

    pub(in crate::nexus) fn serialize<S: Serializer>(
        values: &[f64],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(|v| FloatRepr(*v)))
    }

    pub(in crate::nexus) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<f64>, D::Error> {
        Ok(Vec::<FloatRepr>::deserialize(deserializer)?
            .into_iter()
            .map(|f| f.0)
            .collect())
    }
}
