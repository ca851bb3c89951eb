//! Data sources that tools bind to, with a pooled SQLite implementation.

mod config;
mod error;
mod handle;
mod source;
mod sqlite;
mod value;

pub mod prelude {
    pub use crate::{
        QueryError, QueryRequest, QueryStage, RowVisitor, Source, SourceConfig, SourceError,
        SourceErrorKind, SourceRegistry, SqlHandle, SqlSource, SqlValue, SqliteSource,
        SqliteSourceConfig, create_source,
    };
}

pub use config::{SourceConfig, SqliteSourceConfig, create_source};
pub use error::{QueryError, QueryStage, SourceError, SourceErrorKind};
pub use handle::{QueryRequest, RowVisitor, SqlHandle};
pub use source::{Source, SourceRegistry, SqlSource};
pub use sqlite::{SQLITE_SOURCE_KIND, SqlitePool, SqliteSource};
pub use value::SqlValue;
