#![doc = "geotally public API"]
mod boundary;
mod config;
pub mod io;
mod query;
mod registry;
mod session;
mod source;
mod tally;

pub mod cli;
pub mod commands;

#[doc(inline)]
pub use registry::{resolve_level, resolve_topic, Level, RegistryError, Topic};

#[doc(inline)]
pub use tally::{aggregate, join_boundaries, retain_within, Aggregate, AggregateError, JoinedRow};

#[doc(inline)]
pub use boundary::{BoundaryRecord, BoundarySet};

#[doc(inline)]
pub use query::{build_query, Ident, QueryError, SpatialCountQuery, TableRef};

#[doc(inline)]
pub use session::{CachePolicy, DatasetCache, Session};

#[doc(inline)]
pub use source::{DataSource, DiskSource, MemSource};

#[cfg(feature = "download")]
#[doc(inline)]
pub use source::HttpSource;

#[doc(inline)]
pub use config::{CacheConfig, Config, EnrichedDataset, SourceConfig, WarehouseConfig};
