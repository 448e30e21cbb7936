mod error;

pub mod body;
pub mod client;
pub mod config;
pub mod output;

#[doc(hidden)]
pub mod test_support;

pub use body::{BodyCollector, BodyLimit, BodyOutcome, collect_body};
pub use client::{FetchedPage, PageClient, build_http_client};
pub use config::FetchConfig;
pub use error::{FetchError, Result};
