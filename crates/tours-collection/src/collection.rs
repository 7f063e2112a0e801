use std::future::Future;

use bson::Document;
use tours_query::{Predicate, QueryDescriptor};

/// A document collection the shaped query runs against.
///
/// `find` applies the whole descriptor: filter, sort, projection, then the
/// skip/limit window. Dropping either future abandons the call.
pub trait Queryable: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn count_documents(
        &self,
        filter: &Predicate,
    ) -> impl Future<Output = Result<u64, Self::Error>> + Send;

    fn find(
        &self,
        query: &QueryDescriptor,
    ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send;
}
