//! Schema-agnostic column values.
//!
//! The reporter does not know the shape of the table it reads, so every
//! column is decoded into [`Value`] based on the type the server reports.
//! Types without a dedicated variant, and values a decoder rejects (numeric
//! `NaN`, multi-dimensional arrays), are kept as [`Value::Other`] with their
//! raw binary encoding so nothing is lost.

use postgres_types::{FromSql, Kind, Type};
use rust_decimal::Decimal;
use std::error::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Numeric(Decimal),
    Text(String),
    Json(serde_json::Value),
    Uuid(uuid::Uuid),
    Timestamp(time::PrimitiveDateTime),
    TimestampTz(time::OffsetDateTime),
    Date(time::Date),
    Time(time::Time),
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    /// A value with no decoder, as the server sent it in binary format.
    Other { type_name: String, raw: Vec<u8> },
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    fn other(ty: &Type, raw: &[u8]) -> Self {
        Value::Other {
            type_name: ty.name().to_string(),
            raw: raw.to_vec(),
        }
    }
}

impl<'a> FromSql<'a> for Value {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, Box<dyn Error + Sync + Send>> {
        // text, varchar, bpchar, name, unknown and citext-like types
        if <String as FromSql>::accepts(ty) {
            return Ok(Value::Text(String::from_sql(ty, raw)?));
        }

        if let Kind::Array(_) = ty.kind() {
            return Ok(Vec::<Value>::from_sql(ty, raw)
                .map(Value::Array)
                .unwrap_or_else(|_| Value::other(ty, raw)));
        }

        let value = match *ty {
            Type::BOOL => Value::Bool(bool::from_sql(ty, raw)?),
            Type::CHAR => Value::Text(char::from(i8::from_sql(ty, raw)? as u8).to_string()),
            Type::INT2 => Value::Int(i16::from_sql(ty, raw)?.into()),
            Type::INT4 => Value::Int(i32::from_sql(ty, raw)?.into()),
            Type::INT8 => Value::Int(i64::from_sql(ty, raw)?),
            Type::OID => Value::Int(u32::from_sql(ty, raw)?.into()),
            Type::FLOAT4 => Value::Float(f32::from_sql(ty, raw)?.into()),
            Type::FLOAT8 => Value::Float(f64::from_sql(ty, raw)?),
            // NaN, infinities and more than 28 significant digits stay raw
            Type::NUMERIC if is_special_numeric(raw) => Value::other(ty, raw),
            Type::NUMERIC => Decimal::from_sql(ty, raw)
                .map(Value::Numeric)
                .unwrap_or_else(|_| Value::other(ty, raw)),
            Type::JSON | Type::JSONB => Value::Json(serde_json::Value::from_sql(ty, raw)?),
            Type::UUID => Value::Uuid(uuid::Uuid::from_sql(ty, raw)?),
            Type::TIMESTAMP => Value::Timestamp(time::PrimitiveDateTime::from_sql(ty, raw)?),
            Type::TIMESTAMPTZ => Value::TimestampTz(time::OffsetDateTime::from_sql(ty, raw)?),
            Type::DATE => Value::Date(time::Date::from_sql(ty, raw)?),
            Type::TIME => Value::Time(time::Time::from_sql(ty, raw)?),
            Type::BYTEA => Value::Bytes(Vec::<u8>::from_sql(ty, raw)?),
            _ => Value::other(ty, raw),
        };

        Ok(value)
    }

    fn from_sql_null(_ty: &Type) -> Result<Self, Box<dyn Error + Sync + Send>> {
        Ok(Value::Null)
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}

/// The numeric sign word is 0xC000 for NaN, 0xD000/0xF000 for +/-Infinity.
fn is_special_numeric(raw: &[u8]) -> bool {
    matches!(raw.get(4..6), Some([0xC0 | 0xD0 | 0xF0, 0]))
}
