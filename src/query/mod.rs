//! Server-side path: a parameterized SQL statement that counts a topic's
//! features inside each boundary of a level.

mod builder;
mod ident;

pub use builder::{build_query, SpatialCountQuery};
pub use ident::{Ident, QueryError, TableRef};
