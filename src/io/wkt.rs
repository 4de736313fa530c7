//! WKT reading for boundary polygons.
//!
//! Only the shapes boundary tables actually carry are accepted: `POLYGON`,
//! `MULTIPOLYGON` and their `EMPTY` forms, optionally prefixed by an EWKT
//! `SRID=...;` tag. Z/M ordinates are dropped by the decoder.

use geo::{Geometry, MultiPolygon};
use geozero::{wkt::Wkt, ToGeo};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WktError {
    #[error("unsupported WKT geometry type {0:?} (expected POLYGON or MULTIPOLYGON)")]
    Unsupported(String),
    #[error("invalid WKT: {0}")]
    Parse(String),
    #[error("WKT ring needs at least 4 positions once closed, got {0}")]
    ShortRing(usize),
}

/// `SRID=4326;POLYGON(...)` -> `POLYGON(...)`
fn strip_srid(text: &str) -> &str {
    match text.split_once(';') {
        Some((tag, rest)) if tag.trim_start().get(..5).is_some_and(|t| t.eq_ignore_ascii_case("SRID=")) => rest.trim(),
        _ => text,
    }
}

fn type_name(geom: &Geometry<f64>) -> &'static str {
    match geom {
        Geometry::Point(_) => "POINT",
        Geometry::Line(_) | Geometry::LineString(_) => "LINESTRING",
        Geometry::Polygon(_) => "POLYGON",
        Geometry::MultiPoint(_) => "MULTIPOINT",
        Geometry::MultiLineString(_) => "MULTILINESTRING",
        Geometry::MultiPolygon(_) => "MULTIPOLYGON",
        Geometry::GeometryCollection(_) => "GEOMETRYCOLLECTION",
        Geometry::Rect(_) => "RECT",
        Geometry::Triangle(_) => "TRIANGLE",
    }
}

/// Parse a WKT `POLYGON` or `MULTIPOLYGON` into a MultiPolygon.
pub fn parse_wkt(input: &str) -> Result<MultiPolygon<f64>, WktError> {
    let text = strip_srid(input.trim());

    // `EMPTY` forms carry no rings for the decoder to build a polygon from.
    if text.split_whitespace().last().is_some_and(|w| w.eq_ignore_ascii_case("EMPTY")) {
        let tag = text.split(|c: char| !c.is_ascii_alphabetic()).next().unwrap_or_default().to_ascii_uppercase();
        return match tag.as_str() {
            "POLYGON" | "MULTIPOLYGON" => Ok(MultiPolygon(Vec::new())),
            _ => Err(WktError::Unsupported(tag)),
        };
    }

    let geom: Geometry<f64> = Wkt(text).to_geo().map_err(|e| WktError::Parse(e.to_string()))?;
    let mp = match geom {
        Geometry::Polygon(polygon) => MultiPolygon(vec![polygon]),
        Geometry::MultiPolygon(mp) => mp,
        other => return Err(WktError::Unsupported(type_name(&other).into())),
    };

    // Rings come back closed, so a triangle has 4 positions.
    let rings = mp.0.iter().flat_map(|p| std::iter::once(p.exterior()).chain(p.interiors()));
    for ring in rings {
        if ring.0.len() < 4 {
            return Err(WktError::ShortRing(ring.0.len()));
        }
    }
    Ok(mp)
}
