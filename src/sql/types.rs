//! SQL type name to [`DataType`] mapping.

use crate::mcd::DataType;

/// Parse a declared type name, ignoring case, surrounding whitespace and
/// any `(size)` suffix. Returns `None` for types the model cannot hold.
pub fn parse_data_type(sql_type: &str) -> Option<DataType> {
    let lower = sql_type.trim().to_lowercase();
    let base = lower.split('(').next().unwrap_or(&lower).trim();
    let base = base.split_whitespace().collect::<Vec<_>>().join(" ");

    let data_type = match base.as_str() {
        // Integer types
        "int" | "integer" | "int4" => DataType::Int,
        "bigint" | "int8" => DataType::BigInt,
        "smallint" | "int2" => DataType::SmallInt,
        "serial" | "serial4" => DataType::Serial,

        // Floating point
        "float" | "real" | "float4" => DataType::Float,
        "double" | "double precision" | "float8" => DataType::Double,
        "decimal" | "numeric" => DataType::Decimal,

        // String types
        "varchar" | "character varying" => DataType::Varchar,
        "char" | "character" => DataType::Char,
        "text" => DataType::Text,

        // Date/time
        "timestamp" | "datetime" => DataType::Timestamp,
        "date" => DataType::Date,
        "time" => DataType::Time,

        // Boolean
        "boolean" | "bool" => DataType::Boolean,

        _ => return None,
    };
    Some(data_type)
}

/// Size given in a declaration such as `VARCHAR(100)`, if any.
///
/// For `DECIMAL(10,2)` only the precision is kept.
pub fn parse_size(sql_type: &str) -> Option<u32> {
    let start = sql_type.find('(')?;
    let end = sql_type[start..].find(')')? + start;
    sql_type[start + 1..end]
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}
