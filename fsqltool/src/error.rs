//! Stage-tagged errors raised while building or invoking a SQL tool.

use std::error::Error;
use std::fmt::{Display, Formatter};

use fsource::{QueryError, QueryStage};
use ftooling::ToolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlToolErrorKind {
    SourceNotFound,
    IncompatibleSource,
    TemplateResolution,
    ParameterValidation,
    QueryExecution,
    ResultMetadata,
    RowScan,
    ResultClose,
    RowIteration,
}

impl SqlToolErrorKind {
    pub fn is_construction(self) -> bool {
        matches!(
            self,
            SqlToolErrorKind::SourceNotFound | SqlToolErrorKind::IncompatibleSource
        )
    }

    pub fn is_caller_input(self) -> bool {
        matches!(
            self,
            SqlToolErrorKind::TemplateResolution | SqlToolErrorKind::ParameterValidation
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlToolError {
    pub kind: SqlToolErrorKind,
    pub message: String,
}

impl SqlToolError {
    pub fn new(kind: SqlToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn source_not_found(message: impl Into<String>) -> Self {
        Self::new(SqlToolErrorKind::SourceNotFound, message)
    }

    pub fn incompatible_source(message: impl Into<String>) -> Self {
        Self::new(SqlToolErrorKind::IncompatibleSource, message)
    }

    pub fn template_resolution(message: impl Into<String>) -> Self {
        Self::new(SqlToolErrorKind::TemplateResolution, message)
    }

    pub fn parameter_validation(message: impl Into<String>) -> Self {
        Self::new(SqlToolErrorKind::ParameterValidation, message)
    }

    pub fn query_execution(message: impl Into<String>) -> Self {
        Self::new(SqlToolErrorKind::QueryExecution, message)
    }

    pub fn result_metadata(message: impl Into<String>) -> Self {
        Self::new(SqlToolErrorKind::ResultMetadata, message)
    }

    pub fn row_scan(message: impl Into<String>) -> Self {
        Self::new(SqlToolErrorKind::RowScan, message)
    }

    pub fn result_close(message: impl Into<String>) -> Self {
        Self::new(SqlToolErrorKind::ResultClose, message)
    }

    pub fn row_iteration(message: impl Into<String>) -> Self {
        Self::new(SqlToolErrorKind::RowIteration, message)
    }
}

impl Display for SqlToolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for SqlToolError {}

impl From<QueryError> for SqlToolError {
    fn from(error: QueryError) -> Self {
        let kind = match error.stage {
            QueryStage::Execute => SqlToolErrorKind::QueryExecution,
            QueryStage::Columns => SqlToolErrorKind::ResultMetadata,
            QueryStage::Scan => SqlToolErrorKind::RowScan,
            QueryStage::Iterate => SqlToolErrorKind::RowIteration,
            QueryStage::Close => SqlToolErrorKind::ResultClose,
        };
        Self::new(kind, error.to_string())
    }
}

impl From<SqlToolError> for ToolError {
    fn from(error: SqlToolError) -> Self {
        let message = error.to_string();
        if error.kind.is_construction() {
            ToolError::configuration(message)
        } else if error.kind.is_caller_input() {
            ToolError::invalid_arguments(message)
        } else {
            ToolError::execution(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use ftooling::ToolErrorKind;

    use super::*;

    #[test]
    fn query_stages_map_to_error_kinds() {
        let cases = [
            (QueryError::execute("boom"), SqlToolErrorKind::QueryExecution),
            (QueryError::columns("boom"), SqlToolErrorKind::ResultMetadata),
            (QueryError::scan("boom"), SqlToolErrorKind::RowScan),
            (QueryError::iterate("boom"), SqlToolErrorKind::RowIteration),
            (QueryError::close("boom"), SqlToolErrorKind::ResultClose),
        ];
        for (query_error, kind) in cases {
            let error = SqlToolError::from(query_error);
            assert_eq!(error.kind, kind);
            assert!(error.message.contains("boom"));
        }
    }

    #[test]
    fn tool_error_conversion_follows_error_origin() {
        let configuration: ToolError = SqlToolError::source_not_found("no source").into();
        assert_eq!(configuration.kind, ToolErrorKind::Configuration);

        let caller: ToolError = SqlToolError::template_resolution("missing table").into();
        assert_eq!(caller.kind, ToolErrorKind::InvalidArguments);
        assert!(caller.message.starts_with("TemplateResolution:"));

        let backend: ToolError = SqlToolError::row_scan("bad column").into();
        assert_eq!(backend.kind, ToolErrorKind::Execution);
        assert!(!backend.is_retryable());
    }
}
