use std::{collections::HashMap, fs, path::Path};

use geotally::{
    aggregate, build_query, join_boundaries, Aggregate, BoundaryRecord, BoundarySet, Config, DiskSource, Ident,
    Level, MemSource, Session, TableRef, Topic,
};
use polars::df;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn square(x: f64) -> String {
    format!("\"POLYGON(({x} 0, {} 0, {} 1, {x} 1, {x} 0))\"", x + 1.0, x + 1.0)
}

/// A small dataset directory: three states, their districts and an
/// enriched table where one district has no rows at all.
fn write_fixture(dir: &Path) {
    fs::write(dir.join("enriched_subdistricts.csv"), "\
taluk_code,district_code,state_code,country_code,roadcnt,habcnt,faccnt,propcnt,bldgcnt,poicnt
0001,001,01,IN,5,1,0,0,10,2
0002,001,01,IN,3,1,1,0,20,
0003,002,01,IN,0,0,0,1,5,1
0004,003,02,IN,12,4,2,0,n/a,0
").unwrap();

    fs::write(dir.join("states.csv"), format!("\
state_code,state_name,geometry
01,Alpha,{}
02,Beta,{}
03,Gamma,{}
", square(0.0), square(2.0), square(4.0))).unwrap();

    fs::write(dir.join("districts.csv"), format!("\
code,name,geometry
001,North,{}
002,South,{}
003,East,{}
004,West,{}
", square(0.0), square(1.0), square(2.0), square(3.0))).unwrap();

    fs::write(dir.join("country.csv"), format!("code,name,geometry\nIN,India,{}\n", square(0.0))).unwrap();
}

fn totals(rows: &[geotally::JoinedRow]) -> Vec<(String, i64)> {
    rows.iter().map(|r| (r.code.to_string(), r.total)).collect()
}

#[test]
fn states_keep_leading_zeros_and_zero_fill() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    let mut session = Session::new(DiskSource::new(dir.path()), Config::default());
    let rows = session.resolve(Level::State, Topic::Roads).unwrap();

    assert_eq!(totals(&rows), [("01".into(), 8), ("02".into(), 12), ("03".into(), 0)]);
    assert_eq!(&*rows[0].name, "Alpha");
}

#[test]
fn every_boundary_once_for_every_topic() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let mut session = Session::new(DiskSource::new(dir.path()), Config::default());

    for topic in Topic::ALL {
        let rows = session.resolve(Level::District, topic).unwrap();
        assert_eq!(rows.len(), 4, "{topic}");
        assert_eq!(&*rows[3].code, "004");
        assert_eq!(rows[3].total, 0, "{topic}");
    }

    let buildings = session.resolve(Level::District, Topic::Buildings).unwrap();
    assert_eq!(totals(&buildings)[..3], [("001".into(), 30), ("002".into(), 5), ("003".into(), 0)]);
}

#[test]
fn country_level_sums_everything() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let mut session = Session::new(DiskSource::new(dir.path()), Config::default());

    let rows = session.resolve(Level::Country, Topic::Habitations).unwrap();
    assert_eq!(totals(&rows), [("IN".into(), 6)]);
}

#[test]
fn unknown_selection_is_surfaced() {
    assert!("Villages".parse::<Level>().is_err());
    assert!("Rivers".parse::<Topic>().is_err());
}

#[test]
fn fetch_failures_propagate() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::new(DiskSource::new(dir.path()), Config::default());
    let err = session.resolve(Level::State, Topic::Roads).unwrap_err();
    assert!(format!("{err:#}").contains("enriched_subdistricts"));
}

#[test]
fn worked_examples() {
    let records = df![
        "taluk_code" => ["T1", "T1", "T2"],
        "roadcnt" => [5i64, 3, 0],
    ].unwrap();
    let agg = aggregate(&records, "taluk_code", "roadcnt").unwrap();
    assert_eq!(agg, [("T1", 8), ("T2", 0)].into_iter().collect::<Aggregate>());

    let g1 = geotally::io::wkt::parse_wkt("POLYGON((0 0, 1 0, 1 1, 0 0))").unwrap();
    let g2 = geotally::io::wkt::parse_wkt("POLYGON((5 5, 6 5, 6 6, 5 5))").unwrap();
    let boundaries = BoundarySet::new(Level::Subdistrict, vec![
        BoundaryRecord { code: "T1".into(), name: "A".into(), geometry: g1.clone() },
        BoundaryRecord { code: "T3".into(), name: "B".into(), geometry: g2.clone() },
    ]).unwrap();
    let joined = join_boundaries(boundaries.records(), &[("T1", 8)].into_iter().collect());

    let expected = [("T1", "A", &g1, 8), ("T3", "B", &g2, 0)];
    assert_eq!(joined.len(), expected.len());
    for (row, (code, name, geometry, total)) in joined.iter().zip(expected) {
        assert_eq!((&*row.code, &*row.name, &row.geometry, row.total), (code, name, geometry, total));
    }
}

#[test]
fn aggregation_conserves_totals() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let n = rng.random_range(1..200);
        let keys = (0..n).map(|_| format!("S{}", rng.random_range(0..12))).collect::<Vec<_>>();
        let counts = (0..n).map(|_| rng.random_range(0..1000i64)).collect::<Vec<_>>();
        let expected = counts.iter().sum::<i64>();

        let records = df!["state_code" => keys.clone(), "roadcnt" => counts.clone()].unwrap();
        let agg = aggregate(&records, "state_code", "roadcnt").unwrap();
        assert_eq!(agg.total(), expected);

        let mut by_key: HashMap<&str, i64> = HashMap::new();
        for (k, c) in keys.iter().zip(&counts) {
            *by_key.entry(k).or_default() += c;
        }
        assert_eq!(agg.len(), by_key.len());
        for (k, c) in by_key {
            assert_eq!(agg.get(k), Some(c));
        }

        // Join cardinality equals boundary cardinality.
        let boundaries = (0..15)
            .map(|i| BoundaryRecord {
                code: format!("S{i}").into(),
                name: format!("State {i}").into(),
                geometry: geo::MultiPolygon(Vec::new()),
            })
            .collect::<Vec<_>>();
        let joined = join_boundaries(&boundaries, &agg);
        assert_eq!(joined.len(), boundaries.len());
        assert!(joined.iter().filter(|r| !agg.contains(&r.code)).all(|r| r.total == 0));
    }
}

#[test]
fn query_structure_from_free_function() {
    let sql = build_query(
        &TableRef::new("dev-ind-geo-01", "geoprocessed", "habitation").unwrap(),
        &TableRef::new("dev-ind-geo-01", "geoprocessed", "states").unwrap(),
        &Ident::new("state_code").unwrap(),
        &Ident::new("state_name").unwrap(),
    );
    assert!(sql.contains("ST_CONTAINS("));
    assert!(sql.contains("GROUP BY t.state_code, t.state_name"));
    assert!(sql.contains("RIGHT OUTER JOIN"));
}

#[test]
fn mem_source_session() {
    let source = MemSource::default()
        .with("enriched_subdistricts", "taluk_code,poicnt\nT1,4\nT1,x\n")
        .with("subdistricts", "taluk_code,taluk_name,geometry\nT1,A,POLYGON EMPTY\nT2,B,POLYGON EMPTY\n");
    let mut session = Session::new(source, Config::default());

    let rows = session.resolve(Level::Subdistrict, Topic::OsmPois).unwrap();
    assert_eq!(totals(&rows), [("T1".into(), 4), ("T2".into(), 0)]);
}
