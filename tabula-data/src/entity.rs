use crate::error::DataError;
use crate::value::Value;

/// Trait representing a persisted entity: a default table name, a column
/// descriptor and access to its identity value.
///
/// The descriptor is built once per repository and drives every statement the
/// repository issues. Its column order is the order in which the row decoder
/// must read values.
///
/// # Example
///
/// ```ignore
/// impl Entity for User {
///     type Id = i64;
///     fn table_name() -> &'static str { "users" }
///     fn descriptor() -> Result<EntityDescriptor<Self>, DataError> {
///         EntityDescriptor::builder()
///             .identity("id", |u: &User| u.id.into())
///             .column("username", |u: &User| u.username.clone().into())
///             .column("updated_at", |u: &User| u.updated_at.into())
///             .on_update(|| Utc::now().into())
///             .build()
///     }
///     fn id(&self) -> Option<i64> { self.id }
/// }
/// ```
pub trait Entity: Sized + Send + Sync + Unpin + 'static {
    type Id: Clone + std::fmt::Display + Into<Value> + Send + Sync + 'static;

    fn table_name() -> &'static str;
    fn descriptor() -> Result<EntityDescriptor<Self>, DataError>;
    /// The identity value, or `None` when it has not been assigned yet.
    fn id(&self) -> Option<Self::Id>;
}

/// Reads one field of an entity as a bind value.
pub type FieldAccessor<E> = fn(&E) -> Value;

/// Produces the value written to a column on every update (e.g. `updated_at`).
pub type UpdateMarker = fn() -> Value;

pub struct ColumnDescriptor<E> {
    name: &'static str,
    identity: bool,
    accessor: FieldAccessor<E>,
    on_update: Option<UpdateMarker>,
}

impl<E> ColumnDescriptor<E> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_identity(&self) -> bool {
        self.identity
    }

    pub fn has_update_marker(&self) -> bool {
        self.on_update.is_some()
    }
}

impl<E> Clone for ColumnDescriptor<E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            identity: self.identity,
            accessor: self.accessor,
            on_update: self.on_update,
        }
    }
}

impl<E> std::fmt::Debug for ColumnDescriptor<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("name", &self.name)
            .field("identity", &self.identity)
            .field("on_update", &self.on_update.is_some())
            .finish()
    }
}

/// One field read off an entity instance, in declared order.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedField {
    pub column: &'static str,
    pub identity: bool,
    pub value: Value,
}

/// Ordered column metadata for an entity type.
///
/// Invariant: exactly one column is the identity, and column names are unique.
pub struct EntityDescriptor<E> {
    columns: Vec<ColumnDescriptor<E>>,
    identity_index: usize,
}

impl<E> EntityDescriptor<E> {
    pub fn builder() -> EntityDescriptorBuilder<E> {
        EntityDescriptorBuilder {
            columns: Vec::new(),
            error: None,
        }
    }

    pub fn columns(&self) -> &[ColumnDescriptor<E>] {
        &self.columns
    }

    /// All column names in declared order.
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    pub fn identity_index(&self) -> usize {
        self.identity_index
    }

    pub fn identity_column(&self) -> &'static str {
        self.columns[self.identity_index].name
    }

    /// Read every field of `entity`, walking the columns once.
    pub fn extract(&self, entity: &E) -> Vec<ExtractedField> {
        self.columns
            .iter()
            .map(|c| ExtractedField {
                column: c.name,
                identity: c.identity,
                value: (c.accessor)(entity),
            })
            .collect()
    }

    /// Like [`extract`](Self::extract), but columns with an update marker take
    /// the marker's value instead of the entity's.
    pub fn extract_for_update(&self, entity: &E) -> Vec<ExtractedField> {
        self.columns
            .iter()
            .map(|c| ExtractedField {
                column: c.name,
                identity: c.identity,
                value: match c.on_update {
                    Some(marker) => marker(),
                    None => (c.accessor)(entity),
                },
            })
            .collect()
    }
}

impl<E> Clone for EntityDescriptor<E> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
            identity_index: self.identity_index,
        }
    }
}

impl<E> std::fmt::Debug for EntityDescriptor<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityDescriptor")
            .field("columns", &self.columns)
            .field("identity_index", &self.identity_index)
            .finish()
    }
}

/// Declarative registration of an entity's columns.
pub struct EntityDescriptorBuilder<E> {
    columns: Vec<ColumnDescriptor<E>>,
    error: Option<String>,
}

impl<E> EntityDescriptorBuilder<E> {
    /// Register the identity column.
    pub fn identity(self, name: &'static str, accessor: FieldAccessor<E>) -> Self {
        self.push(name, true, accessor)
    }

    pub fn column(self, name: &'static str, accessor: FieldAccessor<E>) -> Self {
        self.push(name, false, accessor)
    }

    /// Attach an update marker to the most recently registered column.
    pub fn on_update(mut self, marker: UpdateMarker) -> Self {
        match self.columns.last_mut() {
            Some(column) if column.identity => {
                self.error
                    .get_or_insert_with(|| format!("identity column '{}' cannot carry an update marker", column.name));
            }
            Some(column) => column.on_update = Some(marker),
            None => {
                self.error
                    .get_or_insert_with(|| "update marker registered before any column".to_string());
            }
        }
        self
    }

    pub fn build(self) -> Result<EntityDescriptor<E>, DataError> {
        if let Some(msg) = self.error {
            return Err(DataError::InvalidDescriptor(msg));
        }
        let identities: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.identity)
            .map(|(i, _)| i)
            .collect();
        match identities.as_slice() {
            // UPDATE needs at least one assignable column.
            [_] if self.columns.len() == 1 => Err(DataError::InvalidDescriptor(
                "at least one non-identity column is required".to_string(),
            )),
            [index] => Ok(EntityDescriptor {
                identity_index: *index,
                columns: self.columns,
            }),
            [] => Err(DataError::InvalidDescriptor(
                "no identity column registered".to_string(),
            )),
            many => Err(DataError::InvalidDescriptor(format!(
                "expected exactly one identity column, found {}",
                many.len()
            ))),
        }
    }

    fn push(mut self, name: &'static str, identity: bool, accessor: FieldAccessor<E>) -> Self {
        if self.columns.iter().any(|c| c.name == name) {
            self.error
                .get_or_insert_with(|| format!("column '{name}' registered twice"));
        }
        self.columns.push(ColumnDescriptor {
            name,
            identity,
            accessor,
            on_update: None,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Note {
        id: Option<i64>,
        title: Option<String>,
        pinned: bool,
    }

    fn descriptor() -> EntityDescriptorBuilder<Note> {
        EntityDescriptor::builder()
            .column("title", |n: &Note| n.title.clone().into())
            .identity("id", |n: &Note| n.id.into())
            .column("pinned", |n: &Note| n.pinned.into())
    }

    #[test]
    fn test_columns_keep_declared_order() {
        let desc = descriptor().build().unwrap();
        assert_eq!(desc.column_names(), vec!["title", "id", "pinned"]);
        assert_eq!(desc.identity_index(), 1);
        assert_eq!(desc.identity_column(), "id");
    }

    #[test]
    fn test_extract_reads_values_positionally() {
        let desc = descriptor().build().unwrap();
        let note = Note {
            id: None,
            title: Some("groceries".into()),
            pinned: false,
        };
        let fields = desc.extract(&note);
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].value, Value::Text(Some("groceries".into())));
        assert!(fields[1].identity);
        assert!(fields[1].value.is_null());
        assert_eq!(fields[2].value, Value::Bool(Some(false)));
    }

    #[test]
    fn test_missing_identity_is_rejected() {
        let err = EntityDescriptor::<Note>::builder()
            .column("title", |n: &Note| n.title.clone().into())
            .build()
            .unwrap_err();
        assert!(matches!(err, DataError::InvalidDescriptor(_)));
    }

    #[test]
    fn test_second_identity_is_rejected() {
        let err = descriptor()
            .identity("title_key", |n: &Note| n.title.clone().into())
            .build()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid entity descriptor: expected exactly one identity column, found 2"
        );
    }

    #[test]
    fn test_duplicate_column_is_rejected() {
        let err = descriptor()
            .column("pinned", |n: &Note| n.pinned.into())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("'pinned' registered twice"));
    }

    #[test]
    fn test_update_marker_overrides_entity_value() {
        let desc = descriptor()
            .on_update(|| Value::from(true))
            .build()
            .unwrap();
        let note = Note {
            id: Some(7),
            title: None,
            pinned: false,
        };
        assert_eq!(desc.extract(&note)[2].value, Value::Bool(Some(false)));
        assert_eq!(desc.extract_for_update(&note)[2].value, Value::Bool(Some(true)));
        assert!(desc.columns()[2].has_update_marker());
    }

    #[test]
    fn test_identity_only_descriptor_is_rejected() {
        let err = EntityDescriptor::<Note>::builder()
            .identity("id", |n: &Note| n.id.into())
            .build()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid entity descriptor: at least one non-identity column is required"
        );
    }

    #[test]
    fn test_update_marker_on_identity_is_rejected() {
        let err = EntityDescriptor::<Note>::builder()
            .identity("id", |n: &Note| n.id.into())
            .on_update(|| Value::from(1i64))
            .build()
            .unwrap_err();
        assert!(matches!(err, DataError::InvalidDescriptor(_)));
    }
}
