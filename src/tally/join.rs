use std::{collections::HashSet, sync::Arc};

use geo::{coord, BoundingRect, Intersects, MultiPolygon, Rect};
use log::warn;

use crate::boundary::BoundaryRecord;

use super::Aggregate;

/// Number of orphaned codes quoted in the data-quality warning.
const ORPHAN_SAMPLE: usize = 5;

/// A boundary with its total for the selected topic.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRow {
    pub code: Arc<str>,
    pub name: Arc<str>,
    pub geometry: MultiPolygon<f64>,
    pub total: i64,
}

/// Left outer join of `aggregate` onto `boundaries`, keyed on the code.
///
/// Every boundary appears exactly once, in boundary order, with a total of 0
/// when the aggregate has no entry for it. Aggregate codes that match no
/// boundary are dropped and reported as a warning.
pub fn join_boundaries(boundaries: &[BoundaryRecord], aggregate: &Aggregate) -> Vec<JoinedRow> {
    let joined = boundaries.iter()
        .map(|b| JoinedRow {
            code: b.code.clone(),
            name: b.name.clone(),
            geometry: b.geometry.clone(),
            total: aggregate.get(&b.code).unwrap_or(0),
        })
        .collect::<Vec<_>>();

    let matched = joined.iter().filter(|row| aggregate.contains(&row.code)).count();
    if matched < aggregate.len() {
        let known = boundaries.iter().map(|b| b.code.as_ref()).collect::<HashSet<_>>();
        let orphans = aggregate.iter()
            .map(|(code, _)| code)
            .filter(|code| !known.contains(code))
            .collect::<Vec<_>>();
        warn!(
            "[join] {} aggregate code(s) have no boundary and were dropped, e.g. {:?}",
            orphans.len(),
            &orphans[..orphans.len().min(ORPHAN_SAMPLE)],
        );
    }

    joined
}

/// Keep only rows whose envelope intersects `[min_lon, min_lat, max_lon, max_lat]`.
/// Rows with empty geometry have no envelope and are dropped.
pub fn retain_within(rows: &mut Vec<JoinedRow>, bounds: [f64; 4]) {
    let [min_lon, min_lat, max_lon, max_lat] = bounds;
    let window = Rect::new(coord! { x: min_lon, y: min_lat }, coord! { x: max_lon, y: max_lat });
    rows.retain(|row| row.geometry.bounding_rect().is_some_and(|envelope| window.intersects(&envelope)));
}
