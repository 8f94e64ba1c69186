use crate::{db::PoolConnection, Result};

use quarry_core::driver::{operation, Connection, Operation, Response};

/// An engine transaction pinned to one pooled connection.
///
/// If dropped without calling [`commit`](Self::commit) or
/// [`rollback`](Self::rollback), the transaction is rolled back on a spawned
/// task before the connection returns to the pool.
#[derive(Debug)]
pub(crate) struct Transaction {
    /// `Option` so that `Drop` can `.take()` and move it into a spawned task.
    connection: Option<PoolConnection>,

    /// Whether commit or rollback has been called.
    finished: bool,
}

impl Transaction {
    pub(crate) async fn begin(mut connection: PoolConnection) -> Result<Transaction> {
        connection
            .exec(operation::Transaction::Start.into())
            .await?;

        Ok(Transaction {
            connection: Some(connection),
            finished: false,
        })
    }

    /// Suspends foreign key enforcement until the transaction ends.
    pub(crate) async fn defer_foreign_keys(&mut self) -> Result<()> {
        self.exec(Operation::DeferForeignKeys).await?;
        Ok(())
    }

    /// Commit the transaction.
    ///
    /// A failed commit (deferred foreign key checks run here) can leave the
    /// engine's transaction open, so it is rolled back before returning.
    pub(crate) async fn commit(mut self) -> Result<()> {
        match self.exec(operation::Transaction::Commit.into()).await {
            Ok(_) => {
                self.finished = true;
                Ok(())
            }
            Err(err) => self.abort(err).await,
        }
    }

    /// Roll back the transaction.
    pub(crate) async fn rollback(mut self) -> Result<()> {
        self.finished = true;
        self.exec(operation::Transaction::Rollback.into()).await?;
        Ok(())
    }

    /// Rolls back and returns `err`. A failing rollback is logged; the
    /// original error is what the caller sees.
    pub(crate) async fn abort<T>(self, err: crate::Error) -> Result<T> {
        if let Err(rollback) = self.rollback().await {
            tracing::error!(error = %rollback, "rollback failed");
        }
        Err(err)
    }

    pub(crate) fn connection(&mut self) -> &mut dyn Connection {
        let connection = self
            .connection
            .as_mut()
            .expect("connection taken after commit/rollback");
        &mut ***connection
    }

    async fn exec(&mut self, op: Operation) -> Result<Response> {
        self.connection().exec(op).await
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if self.finished {
            return;
        }

        let Some(mut connection) = self.connection.take() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    let _ = connection
                        .exec(operation::Transaction::Rollback.into())
                        .await;
                });
            }
            Err(_) => tracing::warn!("transaction dropped outside a runtime; not rolled back"),
        }
    }
}
