use std::ffi::c_int;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use rusqlite::types::{ToSql, ToSqlOutput, Value, ValueRef};
use rusqlite::{Connection, OpenFlags, Rows, Statement, params_from_iter};

use crate::config::{SqliteSourceConfig, default_sqlite_path};
use crate::error::{QueryError, SourceError};
use crate::handle::{QueryRequest, RowVisitor, SqlHandle};
use crate::source::{Source, SqlSource};
use crate::value::SqlValue;

pub const SQLITE_SOURCE_KIND: &str = "sqlite";

/// Virtual machine instructions between interruption checks inside one step.
const INTERRUPT_CHECK_INTERVAL: c_int = 1_000;

static NEXT_MEMORY_DATABASE: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, PartialEq, Eq)]
enum SqliteTarget {
    File(PathBuf),
    Memory(String),
}

/// Small pool of SQLite connections to one database.
///
/// In-memory databases use a shared-cache URI and keep one anchor connection
/// open for the pool's lifetime, so every pooled connection sees the same data.
#[derive(Debug)]
pub struct SqlitePool {
    target: SqliteTarget,
    idle: Mutex<Vec<Connection>>,
    max_idle: usize,
    busy_timeout: Duration,
    anchor: Option<Mutex<Connection>>,
}

impl SqlitePool {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        Self::open_with(SqliteSourceConfig::file(path.as_ref()))
    }

    pub fn open_in_memory() -> Result<Self, SourceError> {
        Self::open_with(SqliteSourceConfig::in_memory())
    }

    pub fn open_with(config: SqliteSourceConfig) -> Result<Self, SourceError> {
        config.validate()?;
        let target = if config.memory {
            let id = NEXT_MEMORY_DATABASE.fetch_add(1, Ordering::Relaxed);
            SqliteTarget::Memory(format!(
                "file:ftoolbox-memdb-{}-{id}?mode=memory&cache=shared",
                std::process::id()
            ))
        } else {
            let path = config.path.clone().unwrap_or_else(default_sqlite_path);
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent).map_err(|error| {
                    SourceError::connection(format!(
                        "failed to create sqlite parent directory: {error}"
                    ))
                })?;
            }
            SqliteTarget::File(path)
        };

        let mut pool = Self {
            target,
            idle: Mutex::new(Vec::new()),
            max_idle: config.max_idle_connections.max(1),
            busy_timeout: Duration::from_millis(config.busy_timeout_ms),
            anchor: None,
        };

        let first = pool.open_connection()?;
        if matches!(pool.target, SqliteTarget::Memory(_)) {
            pool.anchor = Some(Mutex::new(first));
        } else {
            pool.release(first);
        }
        Ok(pool)
    }

    pub fn is_in_memory(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn idle_count(&self) -> usize {
        self.idle.lock().map(|idle| idle.len()).unwrap_or(0)
    }

    pub fn execute_batch(&self, sql: &str) -> Result<(), SourceError> {
        self.with_connection(|connection| connection.execute_batch(sql))?
            .map_err(|error| SourceError::other(format!("failed to execute sqlite batch: {error}")))
    }

    fn open_connection(&self) -> Result<Connection, SourceError> {
        let connection = match &self.target {
            SqliteTarget::File(path) => Connection::open(path),
            SqliteTarget::Memory(uri) => Connection::open_with_flags(
                uri,
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            ),
        }
        .map_err(|error| SourceError::connection(format!("failed to open sqlite database: {error}")))?;

        connection.busy_timeout(self.busy_timeout).map_err(|error| {
            SourceError::connection(format!("failed to configure sqlite busy timeout: {error}"))
        })?;
        Ok(connection)
    }

    fn idle_connections(&self) -> Result<std::sync::MutexGuard<'_, Vec<Connection>>, SourceError> {
        self.idle
            .lock()
            .map_err(|_| SourceError::connection("sqlite pool lock poisoned"))
    }

    /// Runs `f` on a pooled connection and returns the connection to the pool
    /// afterwards, on success and failure alike.
    pub fn with_connection<T, F>(&self, f: F) -> Result<T, SourceError>
    where
        F: FnOnce(&Connection) -> T,
    {
        let reused = self.idle_connections()?.pop();
        let connection = match reused {
            Some(connection) => connection,
            None => self.open_connection()?,
        };
        let output = f(&connection);
        self.release(connection);
        Ok(output)
    }

    fn release(&self, connection: Connection) {
        if let Ok(mut idle) = self.idle.lock()
            && idle.len() < self.max_idle
        {
            idle.push(connection);
        }
    }
}

impl SqlHandle for SqlitePool {
    fn driver(&self) -> &'static str {
        SQLITE_SOURCE_KIND
    }

    fn query(
        &self,
        request: &QueryRequest<'_>,
        visitor: &mut dyn RowVisitor,
    ) -> Result<(), QueryError> {
        request.ensure_active()?;
        self.with_connection(|connection| run_statement(connection, request, visitor))
            .map_err(|error| {
                QueryError::execute(format!("failed to acquire sqlite connection: {error}"))
            })?
    }
}

fn run_statement(
    connection: &Connection,
    request: &QueryRequest<'_>,
    visitor: &mut dyn RowVisitor,
) -> Result<(), QueryError> {
    install_interrupt(connection, request);
    let outcome = prepare_and_read(connection, request, visitor);
    connection.progress_handler(0, None::<fn() -> bool>);
    outcome
}

/// Aborts the running step with `SQLITE_INTERRUPT` once the request is
/// cancelled or its deadline passes. Pooled connections are cleared again by
/// [`run_statement`].
fn install_interrupt(connection: &Connection, request: &QueryRequest<'_>) {
    let cancellation = AssertUnwindSafe(request.cancellation.clone());
    let deadline = request.deadline;
    connection.progress_handler(
        INTERRUPT_CHECK_INTERVAL,
        Some(move || {
            cancellation.is_cancelled()
                || deadline.is_some_and(|deadline| Instant::now() >= deadline)
        }),
    );
}

fn prepare_and_read(
    connection: &Connection,
    request: &QueryRequest<'_>,
    visitor: &mut dyn RowVisitor,
) -> Result<(), QueryError> {
    let mut statement = connection
        .prepare(request.statement)
        .map_err(|error| QueryError::execute(format!("failed to prepare statement: {error}")))?;

    let read = read_rows(&mut statement, request, visitor);
    let closed = statement
        .finalize()
        .map_err(|error| QueryError::close(format!("failed to finalize statement: {error}")));
    read?;
    closed
}

fn read_rows(
    statement: &mut Statement<'_>,
    request: &QueryRequest<'_>,
    visitor: &mut dyn RowVisitor,
) -> Result<(), QueryError> {
    let mut rows = match statement.query(params_from_iter(request.args.iter())) {
        Ok(rows) => rows,
        Err(error) => {
            request.ensure_active()?;
            return Err(QueryError::execute(format!("failed to execute query: {error}")));
        }
    };

    let columns = column_names(&rows)?;
    visitor.columns(&columns)?;

    let mut buffer = vec![SqlValue::Null; columns.len()];
    loop {
        request.ensure_active()?;
        let row = match rows.next() {
            Ok(Some(row)) => row,
            Ok(None) => break,
            Err(error) => {
                // An interrupted step reports the cancellation, not a cursor fault.
                request.ensure_active()?;
                return Err(QueryError::iterate(format!(
                    "failed to advance row cursor: {error}"
                )));
            }
        };
        for (index, slot) in buffer.iter_mut().enumerate() {
            let value = row.get_ref(index).map_err(|error| {
                QueryError::scan(format!("failed to read column {index}: {error}"))
            })?;
            *slot = sql_value_from_ref(value, index)?;
        }
        visitor.row(&buffer)?;
    }
    Ok(())
}

fn column_names(rows: &Rows<'_>) -> Result<Vec<String>, QueryError> {
    let statement = rows
        .as_ref()
        .ok_or_else(|| QueryError::columns("statement metadata unavailable"))?;
    (0..statement.column_count())
        .map(|index| {
            statement
                .column_name(index)
                .map(ToString::to_string)
                .map_err(|error| {
                    QueryError::columns(format!("failed to read column name {index}: {error}"))
                })
        })
        .collect()
}

fn sql_value_from_ref(value: ValueRef<'_>, index: usize) -> Result<SqlValue, QueryError> {
    match value {
        ValueRef::Null => Ok(SqlValue::Null),
        ValueRef::Integer(value) => Ok(SqlValue::Integer(value)),
        ValueRef::Real(value) => Ok(SqlValue::Float(value)),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .map(|text| SqlValue::Text(text.to_string()))
            .map_err(|error| {
                QueryError::scan(format!("column {index} holds invalid UTF-8 text: {error}"))
            }),
        ValueRef::Blob(bytes) => Ok(SqlValue::Blob(bytes.to_vec())),
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlValue::Null => ToSqlOutput::Owned(Value::Null),
            SqlValue::Integer(value) => ToSqlOutput::Owned(Value::Integer(*value)),
            SqlValue::Float(value) => ToSqlOutput::Owned(Value::Real(*value)),
            SqlValue::Text(value) => ToSqlOutput::Borrowed(ValueRef::Text(value.as_bytes())),
            SqlValue::Boolean(value) => ToSqlOutput::Owned(Value::Integer(i64::from(*value))),
            SqlValue::Blob(value) => ToSqlOutput::Borrowed(ValueRef::Blob(value)),
        })
    }
}

/// Source serving a pooled SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteSource {
    name: String,
    pool: Arc<SqlitePool>,
}

impl SqliteSource {
    pub fn new(name: impl Into<String>, config: SqliteSourceConfig) -> Result<Self, SourceError> {
        Ok(Self {
            name: name.into(),
            pool: Arc::new(SqlitePool::open_with(config)?),
        })
    }

    pub fn open(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self, SourceError> {
        Self::new(name, SqliteSourceConfig::file(path.as_ref()))
    }

    pub fn in_memory(name: impl Into<String>) -> Result<Self, SourceError> {
        Self::new(name, SqliteSourceConfig::in_memory())
    }

    pub fn pool(&self) -> Arc<SqlitePool> {
        Arc::clone(&self.pool)
    }

    pub fn execute_batch(&self, sql: &str) -> Result<(), SourceError> {
        self.pool.execute_batch(sql)
    }
}

impl Source for SqliteSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        SQLITE_SOURCE_KIND
    }

    fn as_sql_source(&self) -> Option<&dyn SqlSource> {
        Some(self)
    }
}

impl SqlSource for SqliteSource {
    fn sql_handle(&self) -> Arc<dyn SqlHandle> {
        self.pool.clone()
    }
}
