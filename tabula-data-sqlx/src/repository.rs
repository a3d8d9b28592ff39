use crate::backend::Backend;
use crate::datasource::Datasource;
use crate::error::{SqlxErrorExt, SqlxResult};
use futures_util::TryStreamExt;
use sqlx::{ColumnIndex, Database, Decode, FromRow, Row, Type};
use std::sync::Arc;
use tabula_data::{
    BuiltQuery, DataError, Dialect, Entity, EntityDescriptor, Pageable, QueryPlan, Repository,
};

/// Decodes one fetched row into an entity.
///
/// Columns arrive in the entity descriptor's declared order; decoders should
/// read them positionally.
pub type RowMapper<E, DB> = fn(&<DB as Database>::Row) -> Result<E, sqlx::Error>;

/// A generic SQL repository driven by an [`EntityDescriptor`].
///
/// The descriptor is built once on construction; every operation then builds
/// a [`QueryPlan`] for the configured [`Dialect`], runs it on the
/// [`Datasource`] pool and decodes the rows with the caller's [`RowMapper`].
///
/// # Example
///
/// ```ignore
/// let repo = SqlxRepository::<User, Sqlite>::new(datasource, Dialect::Sqlite, user_mapper)?
///     .with_table_name("users");
/// let user = repo.insert(Some(&new_user)).await?;
/// ```
pub struct SqlxRepository<E: Entity, DB: Database> {
    datasource: Datasource<DB>,
    dialect: Dialect,
    table_name: String,
    descriptor: Arc<EntityDescriptor<E>>,
    mapper: RowMapper<E, DB>,
}

impl<E: Entity, DB: Database> SqlxRepository<E, DB> {
    pub fn new(
        datasource: Datasource<DB>,
        dialect: Dialect,
        mapper: RowMapper<E, DB>,
    ) -> Result<Self, DataError> {
        Ok(Self {
            datasource,
            dialect,
            table_name: E::table_name().to_string(),
            descriptor: Arc::new(E::descriptor()?),
            mapper,
        })
    }

    /// Like [`new`](Self::new), decoding rows with the entity's `sqlx::FromRow` impl.
    pub fn from_row(datasource: Datasource<DB>, dialect: Dialect) -> Result<Self, DataError>
    where
        E: for<'r> FromRow<'r, DB::Row>,
    {
        Self::new(datasource, dialect, decode_from_row::<E, DB>)
    }

    /// Target `table_name` instead of `Entity::table_name()`.
    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    pub fn datasource(&self) -> &Datasource<DB> {
        &self.datasource
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn descriptor(&self) -> &EntityDescriptor<E> {
        &self.descriptor
    }

    fn select_all(&self) -> QueryPlan {
        QueryPlan::select(&self.table_name, &self.descriptor.column_names())
    }

    fn decode(&self, row: &DB::Row) -> SqlxResult<E> {
        (self.mapper)(row).map_err(DataError::decode)
    }

    fn log_statement(&self, operation: &'static str, query: &BuiltQuery) {
        tracing::debug!(
            table = %self.table_name,
            operation,
            sql = query.sql(),
            args = query.args().len(),
            "Executing statement"
        );
    }
}

impl<E: Entity, DB: Backend> SqlxRepository<E, DB> {
    /// Decode every row in cursor order.
    async fn fetch_all(&self, operation: &'static str, query: &BuiltQuery) -> SqlxResult<Vec<E>> {
        let pool = self.datasource.pool()?;
        self.log_statement(operation, query);
        let mut rows = DB::fetch(pool, query);
        let mut entities = Vec::new();
        while let Some(row) = rows.try_next().await.map_err(SqlxErrorExt::into_data_error)? {
            entities.push(self.decode(&row)?);
        }
        Ok(entities)
    }

    /// Decode the first row, if any, then drain the cursor.
    async fn fetch_first<T, F>(
        &self,
        operation: &'static str,
        query: &BuiltQuery,
        decode: F,
    ) -> SqlxResult<Option<T>>
    where
        F: Fn(&DB::Row) -> Result<T, DataError>,
    {
        let pool = self.datasource.pool()?;
        self.log_statement(operation, query);
        let mut rows = DB::fetch(pool, query);
        let first = match rows.try_next().await.map_err(SqlxErrorExt::into_data_error)? {
            Some(row) => decode(&row)?,
            None => return Ok(None),
        };
        let mut extra = 0usize;
        while rows.try_next().await.map_err(SqlxErrorExt::into_data_error)?.is_some() {
            extra += 1;
        }
        if extra > 0 {
            tracing::debug!(
                table = %self.table_name,
                operation,
                extra,
                "Statement returned more than one row, keeping the first"
            );
        }
        Ok(Some(first))
    }
}

impl<E, DB> Repository<E> for SqlxRepository<E, DB>
where
    E: Entity,
    DB: Backend,
    E::Id: for<'r> Decode<'r, DB> + Type<DB>,
    usize: ColumnIndex<DB::Row>,
{
    async fn get_all(&self) -> Result<Vec<E>, DataError> {
        let query = self.select_all().build(self.dialect);
        self.fetch_all("get_all", &query).await
    }

    async fn get_all_pageable(&self, pageable: &Pageable) -> Result<Vec<E>, DataError> {
        let query = self
            .select_all()
            .order_by(pageable.order_by())
            .limit(pageable.limit())
            .offset(pageable.offset())
            .build(self.dialect);
        self.fetch_all("get_all_pageable", &query).await
    }

    async fn get_by_id(&self, id: Option<&E::Id>) -> Result<E, DataError> {
        let id = id.ok_or_else(|| DataError::InvalidArgument("id is absent".into()))?;
        let query = self
            .select_all()
            .filter_eq(self.descriptor.identity_column(), id.clone().into())
            .build(self.dialect);
        self.fetch_first("get_by_id", &query, |row| self.decode(row))
            .await?
            .ok_or_else(|| {
                DataError::NotFound(format!(
                    "not found entity by id: #{id} in table: {}",
                    self.table_name
                ))
            })
    }

    async fn insert(&self, entity: Option<&E>) -> Result<E, DataError> {
        let entity = entity.ok_or_else(|| DataError::InvalidArgument("entity is absent".into()))?;
        let (columns, values): (Vec<_>, Vec<_>) = self
            .descriptor
            .extract(entity)
            .into_iter()
            .filter(|field| !field.identity && !field.value.is_null())
            .map(|field| (field.column, field.value))
            .unzip();
        let query = QueryPlan::insert(&self.table_name, columns, values)
            .returning(&self.descriptor.column_names())
            .build(self.dialect);
        self.fetch_first("insert", &query, |row| self.decode(row))
            .await?
            .ok_or_else(|| {
                DataError::Execution(format!("error insert into table {}", self.table_name))
            })
    }

    async fn update(&self, entity: Option<&E>) -> Result<E, DataError> {
        let entity = entity.ok_or_else(|| DataError::InvalidArgument("entity is absent".into()))?;
        let fields = self.descriptor.extract_for_update(entity);
        let id = fields[self.descriptor.identity_index()].value.clone();
        let assignments = fields
            .into_iter()
            .filter(|field| !field.identity)
            .map(|field| (field.column, field.value))
            .collect();
        let query = QueryPlan::update(&self.table_name, assignments)
            .filter_eq(self.descriptor.identity_column(), id.clone())
            .returning(&self.descriptor.column_names())
            .build(self.dialect);
        self.fetch_first("update", &query, |row| self.decode(row))
            .await?
            .ok_or_else(|| {
                DataError::NotFound(format!(
                    "error update in table {} by id: {id}",
                    self.table_name
                ))
            })
    }

    async fn delete(&self, entity: Option<&E>) -> Result<E::Id, DataError> {
        let entity = entity.ok_or_else(|| DataError::InvalidArgument("entity is absent".into()))?;
        let id = entity.id().ok_or_else(|| {
            DataError::InvalidArgument(format!(
                "value of field '{}' must not be absent",
                self.descriptor.identity_column()
            ))
        })?;
        self.delete_by_id(Some(&id)).await
    }

    async fn delete_by_id(&self, id: Option<&E::Id>) -> Result<E::Id, DataError> {
        let id = id.ok_or_else(|| DataError::InvalidArgument("id is absent".into()))?;
        let identity = self.descriptor.identity_column();
        let query = QueryPlan::delete(&self.table_name)
            .filter_eq(identity, id.clone().into())
            .returning(&[identity])
            .build(self.dialect);
        self.fetch_first("delete_by_id", &query, |row| {
            row.try_get::<E::Id, _>(0usize).map_err(DataError::decode)
        })
        .await?
        .ok_or_else(|| {
            DataError::NotFound(format!(
                "not found entity by id: #{id} in table: {}",
                self.table_name
            ))
        })
    }
}

impl<E: Entity, DB: Database> Clone for SqlxRepository<E, DB> {
    fn clone(&self) -> Self {
        Self {
            datasource: self.datasource.clone(),
            dialect: self.dialect,
            table_name: self.table_name.clone(),
            descriptor: Arc::clone(&self.descriptor),
            mapper: self.mapper,
        }
    }
}

fn decode_from_row<E, DB>(row: &DB::Row) -> Result<E, sqlx::Error>
where
    DB: Database,
    E: for<'r> FromRow<'r, DB::Row>,
{
    E::from_row(row)
}
