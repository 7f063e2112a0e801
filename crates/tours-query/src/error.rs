#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    /// An explicitly requested page starts past the last matching document.
    #[error("this page does not exist: page {page} skips {skip} of {total} matching documents")]
    InvalidPage { page: u64, skip: u64, total: u64 },
}

#[derive(Debug, thiserror::Error)]
#[error("malformed query string: {0}")]
pub struct ParamsError(#[from] serde_urlencoded::de::Error);
