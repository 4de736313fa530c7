use anyhow::{bail, Result};
use log::info;
use polars::prelude::{Column, DataFrame};

use crate::cli::{AggregateArgs, Cli, OutputFormat, QueryArgs};
use crate::io::{csv::write_csv_bytes, fs::{assert_not_stdout, write_atomic}, geojson::write_geojson_bytes};
use crate::{retain_within, Config, DataSource, DiskSource, JoinedRow, Level, Session, Topic};

/// Configuration from `--config`, or the defaults.
fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::load(path),
        None => Ok(Config::default()),
    }
}

pub fn levels(_cli: &Cli) -> Result<()> {
    println!("{:<30} {:<15} {}", "level", "group key", "boundary dataset");
    for level in Level::ALL {
        println!("{:<30} {:<15} {}", level.label(), level.group_key(), level.boundary_dataset());
    }
    Ok(())
}

pub fn topics(_cli: &Cli) -> Result<()> {
    println!("{:<20} {:<10} {}", "topic", "column", "feature table");
    for topic in Topic::ALL {
        let (dataset, table) = topic.feature_table();
        println!("{:<20} {:<10} {dataset}.{table}", topic.label(), topic.count_column());
    }
    Ok(())
}

pub fn query(cli: &Cli, args: &QueryArgs) -> Result<()> {
    let config = load_config(cli)?;
    let (level, topic) = (args.selection.level, args.selection.topic);

    let mut query = crate::SpatialCountQuery::for_selection(&config.warehouse, level, topic)?;
    if let Some(rows) = args.limit {
        query = query.limit(rows);
    }

    info!("[query] {topic} by {level}");
    println!("{}", query.build());
    Ok(())
}

/// Pick the data source: command-line flags first, then the config file,
/// then `./data`.
fn open_source(config: &Config, args: &AggregateArgs) -> Result<Box<dyn DataSource>> {
    if let Some(dir) = &args.data {
        return Ok(Box::new(DiskSource::new(dir)));
    }
    if let Some(url) = &args.url {
        return open_http(url);
    }
    if let Some(dir) = &config.source.data_dir {
        return Ok(Box::new(DiskSource::new(dir)));
    }
    if let Some(url) = &config.source.base_url {
        return open_http(url);
    }
    Ok(Box::new(DiskSource::new("data")))
}

#[cfg(feature = "download")]
fn open_http(url: &str) -> Result<Box<dyn DataSource>> {
    Ok(Box::new(crate::HttpSource::new(url)?))
}

#[cfg(not(feature = "download"))]
fn open_http(url: &str) -> Result<Box<dyn DataSource>> {
    bail!("cannot fetch {url}: built without the `download` feature")
}

fn rows_to_frame(rows: &[JoinedRow]) -> Result<DataFrame> {
    Ok(DataFrame::new(vec![
        Column::new("code".into(), rows.iter().map(|r| r.code.as_ref()).collect::<Vec<_>>()),
        Column::new("name".into(), rows.iter().map(|r| r.name.as_ref()).collect::<Vec<_>>()),
        Column::new("total".into(), rows.iter().map(|r| r.total).collect::<Vec<_>>()),
    ])?)
}

pub fn aggregate(cli: &Cli, args: &AggregateArgs) -> Result<()> {
    let config = load_config(cli)?;
    let (level, topic) = (args.selection.level, args.selection.topic);

    let bounds = match args.bbox.as_deref() {
        None => None,
        Some(&[min_lon, min_lat, max_lon, max_lat]) => Some([min_lon, min_lat, max_lon, max_lat]),
        Some(other) => bail!("--bbox needs 4 values (MIN_LON,MIN_LAT,MAX_LON,MAX_LAT), got {}", other.len()),
    };

    let source = open_source(&config, args)?;
    info!("[aggregate] {topic} by {level} from {}", source.describe());

    let mut session = Session::new(source, config);
    let mut rows = session.resolve(level, topic)?;
    if let Some(bounds) = bounds {
        retain_within(&mut rows, bounds);
        info!("[aggregate] {} {level} rows intersect {bounds:?}", rows.len());
    }

    let Some(out) = &args.out else {
        println!("{:<15} {:<40} {}", "code", "name", "total");
        for row in &rows {
            println!("{:<15} {:<40} {}", row.code, row.name, row.total);
        }
        return Ok(());
    };

    assert_not_stdout(out)?;
    let bytes = match args.format {
        OutputFormat::Geojson => write_geojson_bytes(&rows)?,
        OutputFormat::Csv => write_csv_bytes(&rows_to_frame(&rows)?)?,
    };
    write_atomic(out, &bytes, args.force)?;

    println!("Wrote {} {} rows -> {}", rows.len(), level, out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use clap::Parser;

    use super::*;
    use crate::cli::Commands;

    fn row(code: &str, total: i64) -> JoinedRow {
        JoinedRow { code: code.into(), name: "n".into(), geometry: geo::MultiPolygon(Vec::new()), total }
    }

    /// "Near" sits at the origin, "Far" around (50, 50).
    fn write_states(dir: &Path) {
        fs::write(dir.join("enriched_subdistricts.csv"), "state_code,roadcnt\n01,3\n02,7\n").unwrap();
        fs::write(dir.join("states.csv"), "\
code,name,geometry
01,Near,\"POLYGON((0 0, 1 0, 1 1, 0 0))\"
02,Far,\"POLYGON((50 50, 51 50, 51 51, 50 50))\"
").unwrap();
    }

    fn run_aggregate(args: &[&str]) -> Result<()> {
        let cli = Cli::try_parse_from(["geotally", "aggregate"].iter().chain(args).copied())?;
        let Commands::Aggregate(args) = &cli.command else { panic!("expected aggregate") };
        aggregate(&cli, args)
    }

    #[test]
    fn summary_frame_has_one_row_per_boundary() {
        let df = rows_to_frame(&[row("T1", 8), row("T3", 0)]).unwrap();
        assert_eq!(df.shape(), (2, 3));
        let csv = String::from_utf8(write_csv_bytes(&df).unwrap()).unwrap();
        assert_eq!(csv, "code,name,total\nT1,n,8\nT3,n,0\n");
    }

    #[test]
    fn bbox_filters_csv_output() {
        let dir = tempfile::tempdir().unwrap();
        write_states(dir.path());
        let out = dir.path().join("states.csv.out");
        let (data, out_arg) = (dir.path().to_str().unwrap(), out.to_str().unwrap());

        run_aggregate(&["-l", "States", "-t", "Roads", "--data", data, "--out", out_arg, "--format", "csv", "--bbox", "-1,-1,2,2"]).unwrap();

        assert_eq!(fs::read_to_string(&out).unwrap(), "code,name,total\n01,Near,3\n");
    }

    #[test]
    fn bbox_filters_geojson_output() {
        let dir = tempfile::tempdir().unwrap();
        write_states(dir.path());
        let out = dir.path().join("states.geojson");
        let (data, out_arg) = (dir.path().to_str().unwrap(), out.to_str().unwrap());

        run_aggregate(&["-l", "States", "-t", "Roads", "--data", data, "--out", out_arg, "--bbox", "49,49,52,52"]).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
        let features = value["features"].as_array().unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0]["properties"]["name"], "Far");
        assert_eq!(features[0]["properties"]["total"], serde_json::json!(7));
    }

    #[test]
    fn bbox_needs_four_values() {
        let dir = tempfile::tempdir().unwrap();
        write_states(dir.path());
        let data = dir.path().to_str().unwrap();

        let err = run_aggregate(&["-l", "States", "-t", "Roads", "--data", data, "--bbox", "1,2,3"]).unwrap_err();
        assert!(err.to_string().contains("--bbox needs 4 values"));
    }
}
