mod error;
mod reading;
mod reading_log;
mod report;
mod sampler;

pub use report::{banner, summary};
pub use sampler::{Sampler, POLL_INTERVAL};
