use tours_query::{ParamsError, ShapeError};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Params(#[from] ParamsError),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// The collection failed. The original error is kept as the source.
    #[error("upstream failure: {0}")]
    Upstream(#[source] BoxError),
}

impl ServiceError {
    pub fn upstream(e: impl std::error::Error + Send + Sync + 'static) -> Self {
        ServiceError::Upstream(Box::new(e))
    }

    pub fn status_code(&self) -> http::StatusCode {
        match self {
            ServiceError::Params(_) => http::StatusCode::BAD_REQUEST,
            ServiceError::Shape(ShapeError::InvalidPage { .. }) => http::StatusCode::NOT_FOUND,
            ServiceError::Upstream(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// `{ "status": "failed", "message": ... }`
    pub fn to_body(&self) -> serde_json::Value {
        serde_json::json!({ "status": "failed", "message": self.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_page_is_a_client_error() {
        let err = ServiceError::from(ShapeError::InvalidPage {
            page: 9,
            skip: 800,
            total: 3,
        });
        assert_eq!(err.status_code(), http::StatusCode::NOT_FOUND);
        assert_eq!(err.to_body()["status"], "failed");
    }

    #[test]
    fn upstream_keeps_its_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err = ServiceError::upstream(io);
        assert_eq!(err.status_code(), http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_body()["status"], "failed");
        assert_eq!(err.to_body()["message"], "upstream failure: reset");

        let source = std::error::Error::source(&err).unwrap();
        let io = source.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io.kind(), std::io::ErrorKind::ConnectionReset);
    }
}
