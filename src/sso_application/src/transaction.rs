use std::future::Future;

use sso_core::{IdentityStore, IdentityStoreError, IdentityTransaction};

/// Runs multi-step identity writes inside one all-or-nothing scope.
///
/// The unit of work receives the transaction handle by value and hands it
/// back together with its outcome. `Ok` commits, `Err` rolls back. If the
/// work panics the handle is dropped uncommitted, which discards its writes.
/// Scopes do not nest.
#[derive(Clone)]
pub struct TransactionCoordinator<S> {
    store: S,
}

impl<S> TransactionCoordinator<S>
where
    S: IdentityStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store, for reads that need no transaction.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn run<R, E, F, Fut>(&self, work: F) -> Result<R, E>
    where
        F: FnOnce(S::Transaction) -> Fut,
        Fut: Future<Output = (S::Transaction, Result<R, E>)>,
        E: From<IdentityStoreError>,
    {
        let tx = self.store.begin().await?;
        let (tx, outcome) = work(tx).await;

        match outcome {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(error) => {
                if let Err(rollback_error) = tx.rollback().await {
                    tracing::error!(error = %rollback_error, "Failed to roll back transaction");
                }
                Err(error)
            }
        }
    }
}
