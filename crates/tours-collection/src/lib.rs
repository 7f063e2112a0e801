mod collection;
mod error;
mod memory;
mod request;
mod service;

pub use collection::Queryable;
pub use error::{BoxError, ServiceError};
pub use memory::{MemoryCollection, MemoryError};
pub use request::QueryResponse;
pub use service::ToursService;
