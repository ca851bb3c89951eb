//! `sqlite-sql` tools: a templated SQL statement run against a SQLite source.
//!
//! Each invocation substitutes template parameters into the statement text,
//! binds standard parameters positionally, and returns the rows as ordered
//! records.
//!
//! ```rust
//! use fsqltool::KIND;
//! use ftooling::ToolKindRegistry;
//!
//! let mut kinds = ToolKindRegistry::new();
//! fsqltool::register(&mut kinds).expect("kind should register");
//! assert!(kinds.contains(KIND));
//! ```

mod binder;
mod config;
mod engine;
mod error;
mod records;
mod tool;

pub mod prelude {
    pub use crate::{
        KIND, ResultRecord, ResultSet, SqlToolError, SqlToolErrorKind, SqliteSqlConfig,
        SqliteSqlTool,
    };
}

pub use binder::{COMPATIBLE_SOURCES, bind_source};
pub use config::{SqliteSqlConfig, new_config};
pub use engine::{PreparedQuery, execute_query, prepare_query, run_query};
pub use error::{SqlToolError, SqlToolErrorKind};
pub use records::{ResultRecord, ResultSet};
pub use tool::SqliteSqlTool;

use ftooling::{ToolError, ToolKindRegistry};

pub const KIND: &str = "sqlite-sql";

/// Registers the `sqlite-sql` kind with `kinds`.
pub fn register(kinds: &mut ToolKindRegistry) -> Result<(), ToolError> {
    kinds.register(KIND, new_config)
}
