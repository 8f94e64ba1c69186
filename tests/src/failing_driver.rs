use quarry::{
    async_trait,
    driver::{operation::QuerySql, Capability, Connection, Driver, Operation, Response},
    err,
    stmt::{Returning, Statement},
    Result, Schema,
};
use std::{
    borrow::Cow,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

/// Wraps a driver and fails the n-th `COUNT(*)` query issued through any of
/// its connections. Every other operation goes to the wrapped driver.
#[derive(Debug)]
pub struct FailingCountDriver {
    inner: Box<dyn Driver>,
    fail_at: usize,

    /// Counts issued so far, shared by every connection
    counts: Arc<AtomicUsize>,
}

impl FailingCountDriver {
    pub fn new(driver: impl Driver, fail_at: usize) -> Self {
        Self {
            inner: Box::new(driver),
            fail_at,
            counts: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl Driver for FailingCountDriver {
    fn url(&self) -> Cow<'_, str> {
        self.inner.url()
    }

    fn capability(&self) -> &'static Capability {
        self.inner.capability()
    }

    async fn connect(&self) -> Result<Box<dyn Connection>> {
        Ok(Box::new(FailingCountConnection {
            inner: self.inner.connect().await?,
            fail_at: self.fail_at,
            counts: self.counts.clone(),
        }))
    }

    fn max_connections(&self) -> Option<usize> {
        self.inner.max_connections()
    }
}

#[derive(Debug)]
struct FailingCountConnection {
    inner: Box<dyn Connection>,
    fail_at: usize,
    counts: Arc<AtomicUsize>,
}

#[async_trait]
impl Connection for FailingCountConnection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        if let Operation::QuerySql(QuerySql {
            stmt: Statement::Query(select),
        }) = &op
        {
            if matches!(select.returning, Returning::Count) {
                let n = self.counts.fetch_add(1, Ordering::SeqCst) + 1;

                if n == self.fail_at {
                    return Err(err!("count {n} failed"));
                }
            }
        }

        self.inner.exec(op).await
    }

    async fn describe_schema(&mut self) -> Result<Schema> {
        self.inner.describe_schema().await
    }
}
