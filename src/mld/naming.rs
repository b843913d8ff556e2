//! Identifier naming rules for generated tables and columns.

/// Turn a conceptual name into an SQL identifier: lower-case, spaces and
/// hyphens become underscores, anything else that is not alphanumeric or
/// `_` is dropped.
pub fn sanitize(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}

/// Name of a column referencing `attribute` of `entity`.
///
/// The entity part is sanitized, the attribute part is kept as written.
pub fn foreign_key_column(entity: &str, attribute: &str) -> String {
    format!("fk_{}_{}", sanitize(entity), attribute)
}
