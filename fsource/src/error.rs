//! Source-layer errors for configuration, connection, and query stages.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    InvalidConfig,
    Connection,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    pub kind: SourceErrorKind,
    pub message: String,
}

impl SourceError {
    pub fn new(kind: SourceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::InvalidConfig, message)
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Connection, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Other, message)
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for SourceError {}

/// Step of a single statement's lifecycle at which a query failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryStage {
    Execute,
    Columns,
    Scan,
    Iterate,
    Close,
}

impl QueryStage {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryStage::Execute => "execute",
            QueryStage::Columns => "columns",
            QueryStage::Scan => "scan",
            QueryStage::Iterate => "iterate",
            QueryStage::Close => "close",
        }
    }
}

impl Display for QueryStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    pub stage: QueryStage,
    pub message: String,
}

impl QueryError {
    pub fn new(stage: QueryStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }

    pub fn execute(message: impl Into<String>) -> Self {
        Self::new(QueryStage::Execute, message)
    }

    pub fn columns(message: impl Into<String>) -> Self {
        Self::new(QueryStage::Columns, message)
    }

    pub fn scan(message: impl Into<String>) -> Self {
        Self::new(QueryStage::Scan, message)
    }

    pub fn iterate(message: impl Into<String>) -> Self {
        Self::new(QueryStage::Iterate, message)
    }

    pub fn close(message: impl Into<String>) -> Self {
        Self::new(QueryStage::Close, message)
    }
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.stage, self.message)
    }
}

impl Error for QueryError {}
