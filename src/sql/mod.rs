//! Logical schema to SQL DDL, and SQL type names to model types.

mod emit;
pub mod types;

pub use emit::{SqlEmitter, SqlOptions};
pub use types::{parse_data_type, parse_size};
