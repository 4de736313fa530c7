//! IO module for format-specific reading and writing operations.
//!
//! - `csv` - CSV format for fetched tabular datasets and summary output
//! - `wkt` - Well-Known Text parsing for boundary geometry
//! - `geojson` - GeoJSON export of joined results for map widgets
//! - `fs` - atomic output files

pub(crate) mod csv;
pub(crate) mod fs;
pub mod geojson;
pub mod wkt;
