//! Client-side aggregation of the enriched dataset and the left outer join
//! that attaches totals to a level's boundaries.

mod aggregate;
mod join;

pub use aggregate::{aggregate, Aggregate, AggregateError};
pub use join::{join_boundaries, retain_within, JoinedRow};
