//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `UrlState`: which frontier set a URL belongs to (pending, in-flight, completed, failed)
//! - `Frontier`: the partitioned URL universe with its dispatch queue

mod frontier;
mod url_state;

// Re-export main types
pub use frontier::{Frontier, FrontierStats};
pub use url_state::UrlState;
