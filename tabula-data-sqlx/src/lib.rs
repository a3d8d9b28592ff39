//! # tabula-data-sqlx: SQLx backend for the Tabula data layer
//!
//! This crate provides the [SQLx](https://github.com/launchbadge/sqlx)-specific
//! implementations for Tabula's data access layer. It depends on [`tabula-data`]
//! for the entity descriptors, query plans and the [`Repository`] contract, and
//! adds the CRUD engine, the shared datasource handle, and error bridging
//! needed to talk to a real database.
//!
//! # What's in this crate
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SqlxRepository`] | Generic CRUD engine implementing [`Repository`] for any [`Entity`] |
//! | [`RowMapper`] | Caller-supplied row decoder, reads columns positionally |
//! | [`Datasource`] | Injected, initialize-once handle around an `sqlx::Pool<DB>` |
//! | [`DatasourceConfig`] | Deserializable connection settings, validated into a URL and a [`Dialect`] |
//! | [`Backend`] | Binds [`Value`](tabula_data::Value) arguments for each enabled driver |
//! | [`SqlxErrorExt`] | Extension trait to convert `sqlx::Error` → `DataError` (`.into_data_error()`) |
//!
//! # Feature flags
//!
//! | Feature    | Driver |
//! |------------|--------|
//! | `sqlite`   | SQLite via `sqlx/sqlite` (default) |
//! | `postgres` | PostgreSQL via `sqlx/postgres` |
//! | `mysql`    | MySQL via `sqlx/mysql` |
//!
//! # Quick start
//!
//! ```ignore
//! use tabula_data_sqlx::prelude::*;
//! use sqlx::Sqlite;
//!
//! let datasource = Datasource::<Sqlite>::new();
//! let repo = SqlxRepository::<User, Sqlite>::new(datasource.clone(), Dialect::Sqlite, user_mapper)?;
//!
//! datasource.init(SqlitePool::connect("sqlite::memory:").await?)?;
//!
//! let created = repo.insert(Some(&User::new("kam"))).await?;
//! let page = repo.get_all_pageable(&Pageable::new(1, 10, vec!["username".into()])?).await?;
//! ```
//!
//! # Dialects and `RETURNING`
//!
//! Inserts, updates and deletes read their result back through `RETURNING`.
//! With [`Dialect::MySql`] the clause is not emitted, so these statements
//! yield no rows and the repository reports an error instead of a value.

pub mod backend;
pub mod config;
pub mod datasource;
pub mod error;
pub mod repository;

pub use backend::Backend;
pub use config::{ConfigError, DatasourceConfig};
pub use datasource::Datasource;
pub use error::{SqlxErrorExt, SqlxResult};
pub use repository::{RowMapper, SqlxRepository};
pub use tabula_data::{Dialect, Entity, Repository};

/// Re-exports of the most commonly used types from both `tabula-data` and this crate.
pub mod prelude {
    pub use crate::{Datasource, DatasourceConfig, RowMapper, SqlxErrorExt, SqlxRepository};
    pub use tabula_data::prelude::*;
}
