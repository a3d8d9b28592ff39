//! Driver bindings for [`Value`] arguments.
//!
//! Each enabled driver feature implements [`Backend`] for its `sqlx` database
//! type, so the repository can bind heterogeneous argument lists without
//! carrying `Encode`/`Type` bounds for every value type.

use futures_util::stream::BoxStream;
use sqlx::{Database, Pool};
use tabula_data::{BuiltQuery, Value};

/// A `sqlx` database that can execute a [`BuiltQuery`].
pub trait Backend: Database {
    /// Bind `query`'s arguments in order and stream the resulting rows.
    fn fetch<'e>(
        pool: &'e Pool<Self>,
        query: &'e BuiltQuery,
    ) -> BoxStream<'e, Result<<Self as Database>::Row, sqlx::Error>>;
}

macro_rules! impl_backend {
    ($db:ty) => {
        impl Backend for $db {
            fn fetch<'e>(
                pool: &'e Pool<Self>,
                query: &'e BuiltQuery,
            ) -> BoxStream<'e, Result<<Self as Database>::Row, sqlx::Error>> {
                let mut q = sqlx::query::<$db>(query.sql());
                for value in query.args() {
                    q = match value.clone() {
                        Value::Bool(v) => q.bind(v),
                        Value::Int(v) => q.bind(v),
                        Value::BigInt(v) => q.bind(v),
                        Value::Double(v) => q.bind(v),
                        Value::Text(v) => q.bind(v),
                        Value::Uuid(v) => q.bind(v),
                        Value::Timestamp(v) => q.bind(v),
                    };
                }
                q.fetch(pool)
            }
        }
    };
}

#[cfg(feature = "sqlite")]
impl_backend!(sqlx::Sqlite);

#[cfg(feature = "postgres")]
impl_backend!(sqlx::Postgres);

#[cfg(feature = "mysql")]
impl_backend!(sqlx::MySql);
