mod error;
mod http;
mod types;

pub use error::FetchError;
pub use http::HttpSource;
pub use types::ApiPosition;

/// Something that can report the tracked object's current position.
pub trait PositionSource {
    async fn fetch(&self) -> Result<ApiPosition, FetchError>;
}
