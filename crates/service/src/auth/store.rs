use async_trait::async_trait;

use super::errors::AuthError;
use super::repository::AuthRepository;

/// An open all-or-nothing scope over auth persistence.
///
/// Writes made through [`AuthTransaction::repository`] become visible only
/// after [`AuthTransaction::commit`]. Dropping the scope without committing
/// discards them.
#[async_trait]
pub trait AuthTransaction: Send + Sync {
    fn repository(&self) -> &dyn AuthRepository;
    async fn commit(self) -> Result<(), AuthError>;
    async fn rollback(self) -> Result<(), AuthError>;
}

/// Source of auth repositories, with or without a transaction scope.
#[async_trait]
pub trait AuthStore: Send + Sync + 'static {
    type Tx: AuthTransaction + 'static;

    /// Autocommit repository for operations that manage their own consistency.
    fn repository(&self) -> &dyn AuthRepository;
    async fn begin(&self) -> Result<Self::Tx, AuthError>;
}

/// In-memory store built on [`MockAuthRepository`](super::repository::mock::MockAuthRepository).
pub mod mock {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Counts of scope lifecycle events, for assertions.
    #[derive(Debug, Default)]
    pub struct TxLog {
        begun: AtomicUsize,
        committed: AtomicUsize,
        rolled_back: AtomicUsize,
    }

    impl TxLog {
        pub fn begun(&self) -> usize { self.begun.load(Ordering::SeqCst) }
        pub fn committed(&self) -> usize { self.committed.load(Ordering::SeqCst) }
        pub fn rolled_back(&self) -> usize { self.rolled_back.load(Ordering::SeqCst) }
    }

    #[derive(Default)]
    pub struct MockAuthStore {
        shared: Arc<MockAuthRepository>,
        log: Arc<TxLog>,
    }

    impl MockAuthStore {
        pub fn new(repo: MockAuthRepository) -> Self {
            Self { shared: Arc::new(repo), log: Arc::default() }
        }

        pub fn tx_log(&self) -> &TxLog {
            &self.log
        }

        /// Committed contents, with the mock's inspection helpers.
        pub fn contents(&self) -> &MockAuthRepository {
            &self.shared
        }
    }

    /// Works on a private copy; commit publishes the copy wholesale, so
    /// concurrent scopes are last-writer-wins.
    pub struct MockAuthTransaction {
        shared: Arc<MockAuthRepository>,
        staged: MockAuthRepository,
        log: Arc<TxLog>,
    }

    #[async_trait]
    impl AuthTransaction for MockAuthTransaction {
        fn repository(&self) -> &dyn AuthRepository {
            &self.staged
        }

        async fn commit(self) -> Result<(), AuthError> {
            self.shared.replace_with(&self.staged)?;
            self.log.committed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn rollback(self) -> Result<(), AuthError> {
            self.log.rolled_back.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[async_trait]
    impl AuthStore for MockAuthStore {
        type Tx = MockAuthTransaction;

        fn repository(&self) -> &dyn AuthRepository {
            self.shared.as_ref()
        }

        async fn begin(&self) -> Result<Self::Tx, AuthError> {
            let staged = self.shared.snapshot()?;
            self.log.begun.fetch_add(1, Ordering::SeqCst);
            Ok(MockAuthTransaction { shared: Arc::clone(&self.shared), staged, log: Arc::clone(&self.log) })
        }
    }
}
