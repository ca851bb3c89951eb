//! Resolves a configured source name to an executable SQL handle.

use std::sync::Arc;

use fsource::{SQLITE_SOURCE_KIND, SourceRegistry, SqlHandle};

use crate::SqlToolError;

/// Source kinds a `sqlite-sql` tool can bind to.
pub const COMPATIBLE_SOURCES: &[&str] = &[SQLITE_SOURCE_KIND];

/// Looks up `source_name` and returns its shared SQL handle.
///
/// The source keeps ownership of the handle; the tool only holds a reference.
pub fn bind_source(
    tool_name: &str,
    source_name: &str,
    sources: &SourceRegistry,
) -> Result<Arc<dyn SqlHandle>, SqlToolError> {
    let source = sources.get(source_name).ok_or_else(|| {
        SqlToolError::source_not_found(format!("no source named {source_name:?} configured"))
    })?;

    let sql_source = source.as_sql_source().ok_or_else(|| {
        SqlToolError::incompatible_source(format!(
            "invalid source for {tool_name:?} tool: source kind must be one of {COMPATIBLE_SOURCES:?}"
        ))
    })?;

    Ok(sql_source.sql_handle())
}
