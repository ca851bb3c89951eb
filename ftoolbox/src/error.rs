//! Errors raised while loading configuration and assembling a toolbox.

use std::error::Error;
use std::fmt::{Display, Formatter};

use fsource::SourceError;
use ftooling::ToolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolboxErrorKind {
    InvalidConfig,
    Io,
    Source,
    Tool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolboxError {
    pub kind: ToolboxErrorKind,
    pub message: String,
}

impl ToolboxError {
    pub fn new(kind: ToolboxErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(ToolboxErrorKind::InvalidConfig, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ToolboxErrorKind::Io, message)
    }

    pub fn source(message: impl Into<String>) -> Self {
        Self::new(ToolboxErrorKind::Source, message)
    }

    pub fn tool(message: impl Into<String>) -> Self {
        Self::new(ToolboxErrorKind::Tool, message)
    }
}

impl Display for ToolboxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ToolboxError {}

impl From<SourceError> for ToolboxError {
    fn from(error: SourceError) -> Self {
        Self::source(error.to_string())
    }
}

impl From<ToolError> for ToolboxError {
    fn from(error: ToolError) -> Self {
        Self::tool(error.to_string())
    }
}
