pub mod mcd;
pub mod measure;
pub mod mld;
pub mod project;
pub mod sql;
pub mod stats;
pub mod validate;

use wasm_bindgen::prelude::*;

pub use mcd::{
    Association, Attribute, CardinalityMax, CardinalityMin, ConceptualModel, DataType, ElementId,
    Entity, Link, ModelError,
};
pub use mld::{LogicalColumn, LogicalTable, NameOverrideStore, NameResolver, SourceKind, transform};
pub use project::{Project, ProjectError};
pub use sql::{SqlEmitter, SqlOptions};
pub use validate::{Diagnostic, validate};

/// Derive the DDL script of a model, naming columns through `names`.
pub fn generate_sql(model: &ConceptualModel, names: &dyn NameResolver, options: SqlOptions) -> String {
    SqlEmitter::new(options).emit(&transform(model), names)
}

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Generate SQL DDL from a project file's JSON content
#[wasm_bindgen(js_name = "projectToSql")]
pub fn project_to_sql(json: &str, if_not_exists: Option<bool>) -> Result<String, String> {
    let project = Project::from_json(json).map_err(|e| e.to_string())?;
    Ok(project.to_sql(SqlOptions {
        if_not_exists: if_not_exists.unwrap_or(false),
        ..SqlOptions::default()
    }))
}

/// Validate a project and return its diagnostics, one per line
#[wasm_bindgen(js_name = "validateProject")]
pub fn validate_project(json: &str) -> Result<String, String> {
    let project = Project::from_json(json).map_err(|e| e.to_string())?;
    Ok(project
        .validate()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n"))
}
