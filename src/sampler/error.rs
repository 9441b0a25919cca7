use thiserror::Error;

use crate::source::FetchError;

#[derive(Debug, Error)]
pub enum SamplerError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Could not write {path}: {source}")]
    Persist {
        path: String,
        #[source]
        source: csv::Error,
    },
}
