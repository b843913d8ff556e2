use serde::{Deserialize, Serialize};
use std::fmt;

use crate::sql::types::parse_data_type;

/// SQL column type an attribute is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DataType {
    Int,
    BigInt,
    SmallInt,
    Serial,
    Varchar,
    Char,
    Text,
    Date,
    Time,
    Timestamp,
    Boolean,
    Decimal,
    Float,
    Double,
}

impl DataType {
    pub const ALL: [DataType; 14] = [
        Self::Int,
        Self::BigInt,
        Self::SmallInt,
        Self::Serial,
        Self::Varchar,
        Self::Char,
        Self::Text,
        Self::Date,
        Self::Time,
        Self::Timestamp,
        Self::Boolean,
        Self::Decimal,
        Self::Float,
        Self::Double,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Int => "INT",
            Self::BigInt => "BIGINT",
            Self::SmallInt => "SMALLINT",
            Self::Serial => "SERIAL",
            Self::Varchar => "VARCHAR",
            Self::Char => "CHAR",
            Self::Text => "TEXT",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Timestamp => "TIMESTAMP",
            Self::Boolean => "BOOLEAN",
            Self::Decimal => "DECIMAL",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
        }
    }

    /// Whether a declared size is rendered as `TYPE(size)`.
    pub fn takes_size(self) -> bool {
        matches!(self, Self::Varchar | Self::Char | Self::Decimal)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<DataType> for String {
    fn from(t: DataType) -> Self {
        t.as_str().to_string()
    }
}

impl TryFrom<String> for DataType {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        parse_data_type(&s).ok_or_else(|| format!("unknown data type '{}'", s))
    }
}

/// A named, typed field of an entity or association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
    #[serde(default)]
    pub size: Option<u32>,
    #[serde(rename = "pk", default)]
    pub is_primary_key: bool,
}

impl Attribute {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            size: None,
            is_primary_key: false,
        }
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    /// Column type declaration, e.g. `VARCHAR(100)` or `INT`.
    pub fn sql_type(&self) -> String {
        match self.size {
            Some(size) if self.data_type.takes_size() => format!("{}({})", self.data_type, size),
            _ => self.data_type.to_string(),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.sql_type())?;
        if self.is_primary_key {
            f.write_str(" [PK]")?;
        }
        Ok(())
    }
}
