use thiserror::Error;

/// Everything that can go wrong between issuing the neighborhoods request and
/// holding a feature collection.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not build HTTP client: {0}")]
    Client(reqwest::Error),
    #[error("request to {0} failed: {1}")]
    Network(String, reqwest::Error),
    #[error("{0} responded with status {1}")]
    Status(String, reqwest::StatusCode),
    #[error("malformed response body: {0}")]
    MalformedBody(#[from] serde_json::Error),
    #[error("record {index} has an invalid geometry: {source}")]
    InvalidGeometry {
        index: usize,
        source: serde_json::Error,
    },
    #[error("load worker exited without a result")]
    WorkerExited,
}
