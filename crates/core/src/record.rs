use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RfmError};

pub const CUSTOMER_ID: &str = "customer_id";
pub const ORDER_ID: &str = "order_id";
pub const ORDER_PURCHASE_TIMESTAMP: &str = "order_purchase_timestamp";
pub const PRICE: &str = "price";

/// Naive datetime layouts accepted after RFC 3339 has been tried.
/// `%.f` also matches an absent fractional part.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Typed cell values. Loaders may hand over raw text or already-typed values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
}

impl FieldValue {
    /// Extract as string, returning None for non-text values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Wrap a raw text cell. Blank cells become `Null`.
    pub fn from_cell(raw: &str) -> Self {
        if raw.trim().is_empty() {
            FieldValue::Null
        } else {
            FieldValue::Text(raw.to_owned())
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Boolean(b) => write!(f, "{b}"),
            FieldValue::Null => write!(f, "null"),
        }
    }
}

/// One row of the input row set: a flat column-name → value map.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderRow {
    pub fields: HashMap<String, FieldValue>,
}

impl OrderRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for assembling rows in code.
    pub fn with(mut self, column: &str, value: FieldValue) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: &str, value: FieldValue) {
        self.fields.insert(column.to_owned(), value);
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields.get(column)
    }

    /// Absent and `Null` cells both count as a missing field.
    fn require(&self, column: &'static str, row: usize) -> Result<&FieldValue> {
        match self.fields.get(column) {
            Some(value) if !value.is_null() => Ok(value),
            _ => Err(RfmError::MissingField { field: column, row }),
        }
    }
}

impl FromIterator<(String, FieldValue)> for OrderRow {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// A validated order line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub customer_id: String,
    pub order_id: String,
    pub order_purchase_timestamp: NaiveDateTime,
    pub price: f64,
}

impl OrderRecord {
    pub fn new(
        customer_id: impl Into<String>,
        order_id: impl Into<String>,
        order_purchase_timestamp: NaiveDateTime,
        price: f64,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            order_id: order_id.into(),
            order_purchase_timestamp,
            price,
        }
    }

    /// Convert a raw row into a typed record.
    ///
    /// `index` is the row's position in the row set and is only used for
    /// error reporting. Columns other than the four above are ignored; the
    /// first missing one is reported, in `customer_id`, `order_id`,
    /// `order_purchase_timestamp`, `price` order.
    pub fn from_row(row: &OrderRow, index: usize) -> Result<Self> {
        let customer_id = identifier(row.require(CUSTOMER_ID, index)?, CUSTOMER_ID, index)?;
        let order_id = identifier(row.require(ORDER_ID, index)?, ORDER_ID, index)?;
        let order_purchase_timestamp =
            timestamp(row.require(ORDER_PURCHASE_TIMESTAMP, index)?, index)?;
        let price = price(row.require(PRICE, index)?, index)?;

        Ok(Self {
            customer_id,
            order_id,
            order_purchase_timestamp,
            price,
        })
    }
}

/// Parse an ISO-style date or datetime.
///
/// Offsets are honoured by keeping the wall-clock time of the given offset,
/// so `2023-09-25T23:30:00-03:00` stays on 2023-09-25. A bare date maps to
/// midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn identifier(value: &FieldValue, field: &'static str, row: usize) -> Result<String> {
    match value {
        FieldValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Err(RfmError::MissingField { field, row })
            } else {
                Ok(trimmed.to_owned())
            }
        }
        other => Ok(other.to_string()),
    }
}

fn timestamp(value: &FieldValue, row: usize) -> Result<NaiveDateTime> {
    value
        .as_str()
        .and_then(parse_timestamp)
        .ok_or_else(|| RfmError::MalformedTimestamp {
            value: value.to_string(),
            row,
        })
}

fn price(value: &FieldValue, row: usize) -> Result<f64> {
    let parsed = match value {
        FieldValue::Float(v) => Some(*v),
        FieldValue::Integer(i) => Some(*i as f64),
        FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
        FieldValue::Boolean(_) | FieldValue::Null => None,
    };

    match parsed {
        Some(p) if p.is_finite() && p >= 0.0 => Ok(p),
        _ => Err(RfmError::InvalidPrice {
            value: value.to_string(),
            row,
        }),
    }
}
