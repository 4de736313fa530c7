use anyhow::{Context, Result};
use geo::{LineString, MultiPolygon};
use serde_json::{json, Value};

use crate::tally::JoinedRow;

fn ring_coords(ring: &LineString<f64>) -> Vec<[f64; 2]> {
    ring.coords().map(|c| [c.x, c.y]).collect()
}

fn multipolygon_json(mp: &MultiPolygon<f64>) -> Value {
    let polygons = mp.0.iter()
        .map(|polygon| {
            std::iter::once(polygon.exterior())
                .chain(polygon.interiors())
                .map(ring_coords)
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    json!({ "type": "MultiPolygon", "coordinates": polygons })
}

/// Export joined rows as a GeoJSON FeatureCollection with `code`, `name`
/// and `total` properties, the form a map widget consumes.
pub fn to_geojson(rows: &[JoinedRow]) -> Value {
    let features = rows.iter()
        .map(|row| json!({
            "type": "Feature",
            "geometry": multipolygon_json(&row.geometry),
            "properties": {
                "code": row.code.as_ref(),
                "name": row.name.as_ref(),
                "total": row.total,
            },
        }))
        .collect::<Vec<_>>();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

/// Serialize joined rows to GeoJSON bytes.
pub fn write_geojson_bytes(rows: &[JoinedRow]) -> Result<Vec<u8>> {
    serde_json::to_vec(&to_geojson(rows)).context("Failed to serialize GeoJSON to bytes")
}
