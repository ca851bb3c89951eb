//! Query seam between SQL-capable sources and the code that consumes rows.
//!
//! A [`SqlHandle`] drives one statement from execution to cursor release and
//! pushes rows into a [`RowVisitor`]. The handle owns the cursor for the whole
//! call, so the cursor can never outlive the call that opened it.

use std::time::Instant;

use tokio_util::sync::CancellationToken;

use crate::{QueryError, SqlValue};

/// One statement submission with its positional arguments and interruption limits.
#[derive(Debug, Clone, Copy)]
pub struct QueryRequest<'a> {
    pub statement: &'a str,
    pub args: &'a [SqlValue],
    pub cancellation: &'a CancellationToken,
    pub deadline: Option<Instant>,
}

impl<'a> QueryRequest<'a> {
    pub fn new(
        statement: &'a str,
        args: &'a [SqlValue],
        cancellation: &'a CancellationToken,
    ) -> Self {
        Self {
            statement,
            args,
            cancellation,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Fails with an execute-stage error once the request was cancelled or its
    /// deadline passed.
    pub fn ensure_active(&self) -> Result<(), QueryError> {
        if self.cancellation.is_cancelled() {
            return Err(QueryError::execute("query cancelled"));
        }
        if let Some(deadline) = self.deadline
            && Instant::now() >= deadline
        {
            return Err(QueryError::execute("query deadline exceeded"));
        }
        Ok(())
    }
}

pub trait RowVisitor {
    fn columns(&mut self, columns: &[String]) -> Result<(), QueryError>;

    /// Receives the scan buffer for one row. The buffer is reused for the next
    /// row, so implementations copy what they keep.
    fn row(&mut self, values: &[SqlValue]) -> Result<(), QueryError>;
}

pub trait SqlHandle: Send + Sync {
    fn driver(&self) -> &'static str;

    fn query(
        &self,
        request: &QueryRequest<'_>,
        visitor: &mut dyn RowVisitor,
    ) -> Result<(), QueryError>;
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::QueryStage;

    #[test]
    fn cancelled_request_reports_execute_stage() {
        let token = CancellationToken::new();
        let request = QueryRequest::new("SELECT 1", &[], &token);
        assert!(request.ensure_active().is_ok());

        token.cancel();
        let error = request.ensure_active().expect_err("request should be cancelled");
        assert_eq!(error.stage, QueryStage::Execute);
        assert!(error.message.contains("cancelled"));
    }

    #[test]
    fn expired_deadline_reports_execute_stage() {
        let token = CancellationToken::new();
        let request = QueryRequest::new("SELECT 1", &[], &token)
            .with_deadline(Some(Instant::now() - Duration::from_millis(1)));

        let error = request.ensure_active().expect_err("deadline should be exceeded");
        assert_eq!(error.stage, QueryStage::Execute);
        assert!(error.message.contains("deadline"));
    }
}
