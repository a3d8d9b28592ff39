/// Errors that can occur in the data layer.
#[derive(Debug)]
pub enum DataError {
    /// A `Pageable` was constructed with an out-of-range field.
    Validation { field: &'static str, value: i64 },
    /// An operation received an absent entity or identity.
    InvalidArgument(String),
    NotFound(String),
    /// The statement ran but did not produce the expected rows.
    Execution(String),
    Database(Box<dyn std::error::Error + Send + Sync>),
    /// The row decoder rejected a fetched row.
    Decode(Box<dyn std::error::Error + Send + Sync>),
    /// The datasource has not been initialized yet.
    NoDatabase,
    InvalidDescriptor(String),
    Other(String),
}

impl DataError {
    /// Construct a `Database` variant from any error type.
    ///
    /// Used by backend crates (e.g. `tabula-data-sqlx`) to wrap
    /// driver-specific errors.
    pub fn database(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        DataError::Database(Box::new(err))
    }

    /// Construct a `Decode` variant from a row decoder failure.
    pub fn decode(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        DataError::Decode(Box::new(err))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DataError::NotFound(_))
    }
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::Validation { field, value } => {
                write!(f, "field '{field}' must be greater than 0, but was: {value}")
            }
            DataError::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            DataError::NotFound(msg) => write!(f, "Not found: {msg}"),
            DataError::Execution(msg) => write!(f, "Execution error: {msg}"),
            DataError::Database(err) => write!(f, "Database error: {err}"),
            DataError::Decode(err) => write!(f, "Decode error: {err}"),
            DataError::NoDatabase => write!(f, "No database: datasource is not initialized"),
            DataError::InvalidDescriptor(msg) => write!(f, "Invalid entity descriptor: {msg}"),
            DataError::Other(msg) => write!(f, "Data error: {msg}"),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Database(err) | DataError::Decode(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_validation_message_names_field_and_value() {
        let err = DataError::Validation { field: "page", value: 0 };
        assert_eq!(err.to_string(), "field 'page' must be greater than 0, but was: 0");
    }

    #[test]
    fn test_database_error_exposes_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "socket closed");
        let err = DataError::database(io);
        assert_eq!(err.to_string(), "Database error: socket closed");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_not_found_predicate() {
        assert!(DataError::NotFound("users".into()).is_not_found());
        assert!(!DataError::NoDatabase.is_not_found());
    }
}
