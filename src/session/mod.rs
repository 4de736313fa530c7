//! Explicit per-session state: the data source, the dataset cache and the
//! configuration, threaded through every pipeline call.

mod cache;
mod session;

pub use cache::{CachePolicy, DatasetCache};
pub use session::Session;
