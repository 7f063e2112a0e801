use tours_query::{ParameterMap, QueryShaper, ShapeError, TOP_TOURS};
use tracing::{debug, error, warn};

use crate::collection::Queryable;
use crate::error::ServiceError;
use crate::request::QueryResponse;

/// The listing endpoints for one collection, sharing a single shaper.
pub struct ToursService<C> {
    collection: C,
    shaper: QueryShaper,
}

impl<C: Queryable> ToursService<C> {
    pub fn new(collection: C, shaper: QueryShaper) -> Self {
        Self { collection, shaper }
    }

    pub fn collection(&self) -> &C {
        &self.collection
    }

    pub fn shaper(&self) -> &QueryShaper {
        &self.shaper
    }

    /// Decode `query` and list the matching page.
    pub async fn list_from_query_string(&self, query: &str) -> Result<QueryResponse, ServiceError> {
        let params = ParameterMap::from_query_string(query)?;
        self.list(&params).await
    }

    /// Shape `params`, check the page bound when a page was requested, then
    /// fetch. The count and the fetch run one after the other.
    pub async fn list(&self, params: &ParameterMap) -> Result<QueryResponse, ServiceError> {
        let shaped = self.shaper.shape(params);

        let descriptor = match shaped.try_into_descriptor() {
            Ok(descriptor) => descriptor,
            Err(shaped) => {
                let total = self
                    .collection
                    .count_documents(shaped.predicate())
                    .await
                    .map_err(|e| {
                        error!(error = %e, "count failed");
                        ServiceError::upstream(e)
                    })?;

                shaped.paginate(total).inspect_err(|e| match e {
                    ShapeError::InvalidPage { page, total, .. } => {
                        warn!(page, total, "requested page exceeds available results");
                    }
                })?
            }
        };

        let tours = self.collection.find(&descriptor).await.map_err(|e| {
            error!(error = %e, "find failed");
            ServiceError::upstream(e)
        })?;

        debug!(
            results = tours.len(),
            page = descriptor.window.page,
            skip = descriptor.window.skip,
            "listed tours"
        );

        Ok(QueryResponse {
            tours,
            window: descriptor.window,
        })
    }

    /// The `top-5-cheap` listing: caller filters plus the preset controls.
    pub async fn top_tours(&self, params: ParameterMap) -> Result<QueryResponse, ServiceError> {
        self.list(&TOP_TOURS.apply(params)).await
    }
}
