//! Decoders turning token files into a single intermediate value

use crate::error::{Result, TokenLoaderError};
use serde::de::Error as _;
use serde_json::{Map, Value};
use serde_pickle::{HashableValue, Value as PickleValue};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub trait TokenDecoder {
    fn decode(&self, path: &Path) -> Result<Value>;
}

/// Data-only pickle decoder.
///
/// Only the plain data opcodes are understood (dicts, lists, tuples, sets,
/// strings, numbers, booleans, None). Globals and class instances cannot be
/// resolved and fail the decode, and mapping keys must be strings. Nothing
/// from the stream is ever executed.
///
/// The stream is read twice: once into the pickle value model to check the
/// top-level shape and reject non-finite floats, once into the ordered record
/// value so dict insertion order survives.
pub struct PickleDecoder;

impl PickleDecoder {
    fn options() -> serde_pickle::DeOptions {
        serde_pickle::DeOptions::new().decode_strings()
    }

    fn check_top_level(value: &PickleValue) -> Result<()> {
        let kind = match value {
            PickleValue::List(_) | PickleValue::Dict(_) => return Ok(()),
            PickleValue::Tuple(_) => "tuple",
            PickleValue::Set(_) => "set",
            PickleValue::FrozenSet(_) => "frozenset",
            PickleValue::None => "None",
            PickleValue::Bool(_) => "bool",
            PickleValue::I64(_) | PickleValue::Int(_) => "int",
            PickleValue::F64(_) => "float",
            PickleValue::Bytes(_) => "bytes",
            PickleValue::String(_) => "str",
        };
        Err(TokenLoaderError::UnsupportedFormat(format!(
            "top-level value is a {}, expected a dict or a list",
            kind
        )))
    }

    fn check_finite(value: &PickleValue) -> Result<()> {
        match value {
            PickleValue::F64(f) if !f.is_finite() => Err(non_finite(*f)),
            PickleValue::List(items) | PickleValue::Tuple(items) => {
                items.iter().try_for_each(Self::check_finite)
            }
            PickleValue::Set(items) | PickleValue::FrozenSet(items) => {
                items.iter().try_for_each(check_finite_key)
            }
            PickleValue::Dict(entries) => entries.iter().try_for_each(|(key, value)| {
                check_finite_key(key)?;
                Self::check_finite(value)
            }),
            _ => Ok(()),
        }
    }
}

fn check_finite_key(key: &HashableValue) -> Result<()> {
    match key {
        HashableValue::F64(f) if !f.is_finite() => Err(non_finite(*f)),
        _ => Ok(()),
    }
}

fn non_finite(f: f64) -> TokenLoaderError {
    TokenLoaderError::Pickle(serde_pickle::Error::custom(format!(
        "non-finite float {} has no record representation",
        f
    )))
}

impl TokenDecoder for PickleDecoder {
    fn decode(&self, path: &Path) -> Result<Value> {
        let bytes = std::fs::read(path)?;

        let shape = serde_pickle::value_from_slice(&bytes, Self::options())?;
        Self::check_top_level(&shape)?;
        Self::check_finite(&shape)?;

        let value = serde_pickle::from_slice(&bytes, Self::options())?;
        Ok(value)
    }
}

pub struct JsonDecoder;

impl TokenDecoder for JsonDecoder {
    fn decode(&self, path: &Path) -> Result<Value> {
        let reader = BufReader::new(File::open(path)?);
        let value = serde_json::from_reader(reader)?;
        Ok(value)
    }
}

/// Header-plus-rows table. Every cell stays text.
pub struct CsvDecoder;

impl TokenDecoder for CsvDecoder {
    fn decode(&self, path: &Path) -> Result<Value> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let row: Map<String, Value> = headers
                .iter()
                .zip(record.iter())
                .map(|(field, cell)| (field.to_string(), Value::String(cell.to_string())))
                .collect();
            rows.push(Value::Object(row));
        }

        Ok(Value::Array(rows))
    }
}
