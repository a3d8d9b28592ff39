//! The shared database handle injected into every repository.

use crate::config::DatasourceConfig;
use sqlx::{Database, Pool};
use std::sync::{Arc, OnceLock};
use tabula_data::DataError;

/// A cloneable handle to a database pool that may be initialized after the
/// repositories holding it were constructed.
///
/// Initialization happens at most once; every clone observes it. Using a
/// repository before the handle is initialized fails with
/// [`DataError::NoDatabase`].
///
/// # Example
///
/// ```ignore
/// let datasource = Datasource::<Sqlite>::new();
/// let users = SqlxRepository::new(datasource.clone(), Dialect::Sqlite, user_mapper)?;
/// datasource.init(SqlitePool::connect("sqlite::memory:").await?)?;
/// let all = users.get_all().await?;
/// ```
pub struct Datasource<DB: Database> {
    pool: Arc<OnceLock<Pool<DB>>>,
}

impl<DB: Database> Datasource<DB> {
    /// An uninitialized handle.
    pub fn new() -> Self {
        Self {
            pool: Arc::new(OnceLock::new()),
        }
    }

    /// A handle that is already initialized with `pool`.
    pub fn from_pool(pool: Pool<DB>) -> Self {
        let datasource = Self::new();
        let _ = datasource.pool.set(pool);
        datasource
    }

    /// Initialize the handle with `pool`.
    ///
    /// Fails if the handle was already initialized; the existing pool is kept.
    pub fn init(&self, pool: Pool<DB>) -> Result<(), DataError> {
        match self.pool.set(pool) {
            Ok(()) => {
                tracing::info!(driver = DB::NAME, "Datasource initialized");
                Ok(())
            }
            Err(_rejected) => {
                tracing::warn!(driver = DB::NAME, "Datasource already initialized, ignoring new pool");
                Err(DataError::Other("datasource is already initialized".into()))
            }
        }
    }

    /// Initialize the handle with a lazily connecting pool built from `config`.
    ///
    /// No connection is opened until the first statement runs.
    pub fn init_lazy(&self, config: &DatasourceConfig) -> Result<(), DataError> {
        let url = config
            .connection_url()
            .map_err(|e| DataError::Other(e.to_string()))?;
        let pool = Pool::<DB>::connect_lazy(&url).map_err(DataError::database)?;
        self.init(pool)
    }

    pub fn is_initialized(&self) -> bool {
        self.pool.get().is_some()
    }

    /// The underlying pool, or [`DataError::NoDatabase`] if not initialized.
    pub fn pool(&self) -> Result<&Pool<DB>, DataError> {
        self.pool.get().ok_or(DataError::NoDatabase)
    }

    /// Close the pool if one was initialized.
    pub async fn close(&self) {
        if let Some(pool) = self.pool.get() {
            pool.close().await;
            tracing::info!(driver = DB::NAME, "Datasource closed");
        }
    }
}

impl<DB: Database> Default for Datasource<DB> {
    fn default() -> Self {
        Self::new()
    }
}

impl<DB: Database> Clone for Datasource<DB> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
        }
    }
}

impl<DB: Database> std::fmt::Debug for Datasource<DB> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Datasource")
            .field("driver", &DB::NAME)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
