pub mod entity;
pub mod error;
pub mod page;
pub mod query;
pub mod repository;
pub mod value;

pub use entity::{Entity, EntityDescriptor, ExtractedField};
pub use error::DataError;
pub use page::Pageable;
pub use query::{BuiltQuery, Dialect, QueryPlan};
pub use repository::Repository;
pub use value::Value;

pub mod prelude {
    //! Re-exports of the most commonly used data types.
    pub use crate::{DataError, Dialect, Entity, EntityDescriptor, Pageable, Repository, Value};
}
