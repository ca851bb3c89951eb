//! Invocation pipeline: resolve the statement, bind arguments, execute, and
//! collect rows.
//!
//! Template markers are substituted textually first; standard parameters are
//! then bound positionally by the driver. Execution happens on Tokio's
//! blocking pool and the handle releases its cursor before the call returns,
//! whatever the outcome.

use std::sync::Arc;
use std::time::Instant;

use fsource::{QueryError, QueryRequest, RowVisitor, SqlHandle, SqlValue};
use ftooling::{ParamValues, ParameterDefinition, get_params, resolve_template_params};
use tokio_util::sync::CancellationToken;

use crate::{ResultRecord, ResultSet, SqlToolError};

/// A statement ready for submission: markers substituted, arguments in bind order.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedQuery {
    pub statement: String,
    pub args: Vec<SqlValue>,
}

pub fn prepare_query(
    statement: &str,
    template_parameters: &[ParameterDefinition],
    parameters: &[ParameterDefinition],
    values: &ParamValues,
) -> Result<PreparedQuery, SqlToolError> {
    let map = values.as_map();
    let statement = resolve_template_params(template_parameters, statement, &map)
        .map_err(|error| SqlToolError::template_resolution(error.message))?;
    let standard = get_params(parameters, &map)
        .map_err(|error| SqlToolError::parameter_validation(error.message))?;
    let args = standard
        .positional()
        .iter()
        .map(SqlValue::from_json)
        .collect();
    Ok(PreparedQuery { statement, args })
}

/// Runs `query` to completion on the calling thread.
pub fn execute_query(
    handle: &dyn SqlHandle,
    query: &PreparedQuery,
    cancellation: &CancellationToken,
    deadline: Option<Instant>,
) -> Result<ResultSet, SqlToolError> {
    let request =
        QueryRequest::new(&query.statement, &query.args, cancellation).with_deadline(deadline);
    let mut collector = RecordCollector::default();
    handle.query(&request, &mut collector)?;
    Ok(collector.finish())
}

/// Runs `query` on the blocking pool. Dropping the returned future cancels
/// the query and interrupts the statement it is running.
///
/// Must be polled inside a Tokio runtime.
pub async fn run_query(
    handle: Arc<dyn SqlHandle>,
    query: PreparedQuery,
    cancellation: &CancellationToken,
    deadline: Option<Instant>,
) -> Result<ResultSet, SqlToolError> {
    let token = cancellation.child_token();
    let guard = token.clone().drop_guard();
    let joined = tokio::task::spawn_blocking(move || {
        execute_query(handle.as_ref(), &query, &token, deadline)
    })
    .await;
    guard.disarm();

    joined.map_err(|error| SqlToolError::query_execution(format!("query task failed: {error}")))?
}

/// Copies each scanned row into a fresh record. Records only leave the
/// collector once every row was read.
#[derive(Default)]
struct RecordCollector {
    columns: Vec<String>,
    records: ResultSet,
}

impl RecordCollector {
    fn finish(self) -> ResultSet {
        self.records
    }
}

impl RowVisitor for RecordCollector {
    fn columns(&mut self, columns: &[String]) -> Result<(), QueryError> {
        self.columns = columns.to_vec();
        Ok(())
    }

    fn row(&mut self, values: &[SqlValue]) -> Result<(), QueryError> {
        if values.len() != self.columns.len() {
            return Err(QueryError::scan(format!(
                "row has {} values for {} columns",
                values.len(),
                self.columns.len()
            )));
        }
        let mut record = ResultRecord::with_capacity(values.len());
        for (column, value) in self.columns.iter().zip(values) {
            record.push(column.clone(), value.clone());
        }
        self.records.push(record);
        Ok(())
    }
}
