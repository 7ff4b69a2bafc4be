//! Subtitle search against the web source.
//!
//! [`PageFetcher`] is the HTTP seam: [`HttpFetcher`] talks to the site with
//! a request throttle, and tests substitute a mock. [`SubtitleSearcher`]
//! drives listing pagination and detail-page parsing on top of it.

mod http;
mod site;
mod throttle;
mod types;

pub use http::{filename_from_disposition, HttpFetcher};
pub use site::{build_query, filter_by_episode, SubtitleSearcher};
pub use throttle::MinIntervalThrottle;
pub use types::*;
