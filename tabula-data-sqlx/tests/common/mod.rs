#![allow(dead_code)]

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{FromRow, Row, Sqlite};
use tabula_data::{DataError, Dialect, Entity, EntityDescriptor};
use tabula_data_sqlx::{Datasource, SqlxRepository};

const SCHEMA: &[&str] = &[
    "CREATE TABLE users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        last_name TEXT,
        first_name TEXT,
        username TEXT,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT
    )",
    "CREATE TABLE file_system (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id INTEGER NOT NULL REFERENCES users (id),
        parent_id INTEGER REFERENCES file_system (id),
        rights TEXT NOT NULL DEFAULT 'rw------',
        is_file BOOLEAN NOT NULL,
        name TEXT NOT NULL,
        path TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT,
        deleted BOOLEAN NOT NULL DEFAULT FALSE
    )",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
    pub id: Option<i64>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub username: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn named(last_name: &str, first_name: &str, username: &str) -> Self {
        Self {
            last_name: Some(last_name.into()),
            first_name: Some(first_name.into()),
            username: Some(username.into()),
            ..Default::default()
        }
    }
}

impl Entity for User {
    type Id = i64;

    fn table_name() -> &'static str {
        "users"
    }

    fn descriptor() -> Result<EntityDescriptor<Self>, DataError> {
        EntityDescriptor::builder()
            .identity("id", |u: &User| u.id.into())
            .column("last_name", |u: &User| u.last_name.clone().into())
            .column("first_name", |u: &User| u.first_name.clone().into())
            .column("username", |u: &User| u.username.clone().into())
            .column("created_at", |u: &User| u.created_at.into())
            .column("updated_at", |u: &User| u.updated_at.into())
            .on_update(|| Utc::now().into())
            .build()
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}

pub fn user_mapper(row: &SqliteRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get(0)?,
        last_name: row.try_get(1)?,
        first_name: row.try_get(2)?,
        username: row.try_get(3)?,
        created_at: row.try_get(4)?,
        updated_at: row.try_get(5)?,
    })
}

impl<'r> FromRow<'r, SqliteRow> for User {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        user_mapper(row)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileSystem {
    pub id: Option<i64>,
    pub owner_id: Option<i64>,
    pub parent_id: Option<i64>,
    pub rights: Option<String>,
    pub is_file: Option<bool>,
    pub name: Option<String>,
    pub path: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted: Option<bool>,
}

impl Entity for FileSystem {
    type Id = i64;

    fn table_name() -> &'static str {
        "file_system"
    }

    fn descriptor() -> Result<EntityDescriptor<Self>, DataError> {
        EntityDescriptor::builder()
            .identity("id", |f: &FileSystem| f.id.into())
            .column("owner_id", |f: &FileSystem| f.owner_id.into())
            .column("parent_id", |f: &FileSystem| f.parent_id.into())
            .column("rights", |f: &FileSystem| f.rights.clone().into())
            .column("is_file", |f: &FileSystem| f.is_file.into())
            .column("name", |f: &FileSystem| f.name.clone().into())
            .column("path", |f: &FileSystem| f.path.clone().into())
            .column("created_at", |f: &FileSystem| f.created_at.into())
            .column("updated_at", |f: &FileSystem| f.updated_at.into())
            .on_update(|| Utc::now().into())
            .column("deleted", |f: &FileSystem| f.deleted.into())
            .build()
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}

pub fn file_system_mapper(row: &SqliteRow) -> Result<FileSystem, sqlx::Error> {
    Ok(FileSystem {
        id: row.try_get(0)?,
        owner_id: row.try_get(1)?,
        parent_id: row.try_get(2)?,
        rights: row.try_get(3)?,
        is_file: row.try_get(4)?,
        name: row.try_get(5)?,
        path: row.try_get(6)?,
        created_at: row.try_get(7)?,
        updated_at: row.try_get(8)?,
        deleted: row.try_get(9)?,
    })
}

/// An initialized datasource over a fresh in-memory database with the test schema.
pub async fn setup() -> Datasource<Sqlite> {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("tabula_data_sqlx=debug")
        .try_init();

    // A single, never-recycled connection keeps the in-memory database alive.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    for statement in SCHEMA {
        sqlx::query(statement).execute(&pool).await.unwrap();
    }
    Datasource::from_pool(pool)
}

pub fn user_repository(datasource: &Datasource<Sqlite>) -> SqlxRepository<User, Sqlite> {
    SqlxRepository::new(datasource.clone(), Dialect::Sqlite, user_mapper).unwrap()
}

pub fn file_system_repository(datasource: &Datasource<Sqlite>) -> SqlxRepository<FileSystem, Sqlite> {
    SqlxRepository::new(datasource.clone(), Dialect::Sqlite, file_system_mapper).unwrap()
}
