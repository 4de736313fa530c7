use std::{collections::HashMap, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use geo::MultiPolygon;
use log::debug;
use polars::{frame::DataFrame, prelude::DataType};

use crate::{io::wkt::parse_wkt, registry::Level};

/// A single boundary polygon of a level.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryRecord {
    pub code: Arc<str>,
    pub name: Arc<str>,
    pub geometry: MultiPolygon<f64>,
}

/// All boundaries of one level, in source order.
#[derive(Debug, Clone)]
pub struct BoundarySet {
    level: Level,
    records: Vec<BoundaryRecord>,
    index: HashMap<Arc<str>, u32>, // Map between codes and positions in `records`.
}

impl BoundarySet {
    /// Build a set from records, rejecting duplicate codes.
    pub fn new(level: Level, records: Vec<BoundaryRecord>) -> Result<Self> {
        let mut index = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            if index.insert(record.code.clone(), i as u32).is_some() {
                bail!("duplicate {} boundary code {:?}", level, record.code);
            }
        }
        Ok(Self { level, records, index })
    }

    /// Read a boundary frame as returned by the warehouse.
    ///
    /// Columns are looked up as `code`/`name`/`geometry` first (the aliased
    /// form the dashboards select), then as the level's own key and name
    /// columns. Geometry is WKT text; a null geometry becomes an empty
    /// MultiPolygon so the boundary still gets a row.
    pub fn from_frame(df: &DataFrame, level: Level) -> Result<Self> {
        let code_col = pick_column(df, &["code", level.group_key()])?;
        let name_col = pick_column(df, &["name", level.name_column()])?;
        let geom_col = pick_column(df, &["geometry", "geom", "wkt"])?;

        let codes = df.column(code_col)?.cast(&DataType::String)?;
        let names = df.column(name_col)?.cast(&DataType::String)?;
        let geoms = df.column(geom_col)?.str()
            .with_context(|| format!("{level} boundary column {geom_col:?} is not WKT text"))?;

        let mut records = Vec::with_capacity(df.height());
        for (row, ((code, name), wkt)) in codes.str()?.into_iter()
            .zip(names.str()?.into_iter())
            .zip(geoms.into_iter())
            .enumerate()
        {
            let code = code.ok_or_else(|| anyhow!("{level} boundary row {row} has no code"))?;
            let geometry = match wkt {
                Some(text) => parse_wkt(text)
                    .with_context(|| format!("{level} boundary {code:?} has invalid geometry"))?,
                None => {
                    debug!("[boundary] {level} {code:?} has no geometry");
                    MultiPolygon(Vec::new())
                }
            };
            records.push(BoundaryRecord {
                code: Arc::from(code),
                name: Arc::from(name.unwrap_or_default()),
                geometry,
            });
        }

        Self::new(level, records)
    }

    #[inline] pub fn level(&self) -> Level { self.level }

    #[inline] pub fn len(&self) -> usize { self.records.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.records.is_empty() }

    #[inline] pub fn records(&self) -> &[BoundaryRecord] { &self.records }

    pub fn get(&self, code: &str) -> Option<&BoundaryRecord> {
        self.index.get(code).map(|&i| &self.records[i as usize])
    }

    #[inline] pub fn contains(&self, code: &str) -> bool { self.index.contains_key(code) }
}

/// First of `candidates` present in `df`.
fn pick_column<'a>(df: &DataFrame, candidates: &[&'a str]) -> Result<&'a str> {
    let names = df.get_column_names();
    candidates.iter()
        .find(|&&c| names.iter().any(|n| n.as_str() == c))
        .copied()
        .ok_or_else(|| anyhow!(
            "boundary frame has none of the columns {:?} (available: {:?})",
            candidates, names.iter().map(|n| n.as_str()).collect::<Vec<_>>()
        ))
}

#[cfg(test)]
mod tests {
    use polars::df;

    use super::*;

    const SQUARE: &str = "POLYGON((0 0, 1 0, 1 1, 0 1, 0 0))";

    #[test]
    fn reads_aliased_columns() {
        let df = df![
            "code" => ["T1", "T3"],
            "name" => ["A", "B"],
            "geometry" => [SQUARE, "MULTIPOLYGON(((2 2, 3 2, 3 3, 2 2)))"],
        ].unwrap();

        let set = BoundarySet::from_frame(&df, Level::Subdistrict).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.level(), Level::Subdistrict);
        assert_eq!(&*set.get("T3").unwrap().name, "B");
        assert_eq!(set.records()[0].geometry.0.len(), 1);
    }

    #[test]
    fn falls_back_to_level_columns() {
        let df = df![
            "state_code" => ["09"],
            "state_name" => ["Uttar Pradesh"],
            "geometry" => [SQUARE],
        ].unwrap();

        let set = BoundarySet::from_frame(&df, Level::State).unwrap();
        assert!(set.contains("09"));
        assert!(BoundarySet::from_frame(&df, Level::District).is_err());
    }

    #[test]
    fn null_geometry_keeps_row() {
        let df = df![
            "code" => ["D1", "D2"],
            "name" => [Some("North"), None],
            "geometry" => [Some(SQUARE), None],
        ].unwrap();

        let set = BoundarySet::from_frame(&df, Level::District).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.get("D2").unwrap().geometry.0.is_empty());
        assert_eq!(&*set.get("D2").unwrap().name, "");
    }

    #[test]
    fn rejects_duplicates_and_bad_wkt() {
        let dup = df!["code" => ["X", "X"], "name" => ["a", "b"], "geometry" => [SQUARE, SQUARE]].unwrap();
        assert!(BoundarySet::from_frame(&dup, Level::Country).is_err());

        let bad = df!["code" => ["X"], "name" => ["a"], "geometry" => ["POINT(1 1)"]].unwrap();
        let err = BoundarySet::from_frame(&bad, Level::Country).unwrap_err();
        assert!(format!("{err:#}").contains("\"X\""));
    }
}
