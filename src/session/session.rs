use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, info};
use polars::frame::DataFrame;

use crate::{
    boundary::BoundarySet,
    config::Config,
    query::SpatialCountQuery,
    registry::{resolve_level, resolve_topic, Level, Topic},
    source::DataSource,
    tally::{aggregate, join_boundaries, Aggregate, JoinedRow},
};

use super::{CachePolicy, DatasetCache};

/// One dashboard session: everything a selection change needs, passed
/// explicitly instead of living in framework globals.
///
/// All calls run synchronously on the caller's thread. Fetched datasets are
/// cached by id under the configured policy; results are recomputed on every
/// call and never stored.
pub struct Session {
    source: Box<dyn DataSource>,
    config: Config,
    frames: DatasetCache<DataFrame>,
    boundaries: DatasetCache<BoundarySet>,
}

impl Session {
    pub fn new(source: impl DataSource + 'static, config: Config) -> Self {
        let policy = config.cache.policy();
        Self {
            source: Box::new(source),
            config,
            frames: DatasetCache::new(policy),
            boundaries: DatasetCache::new(policy),
        }
    }

    #[inline] pub fn config(&self) -> &Config { &self.config }

    #[inline] pub fn cache_policy(&self) -> CachePolicy { self.frames.policy() }

    /// The per-subdistrict enriched dataset.
    pub fn enriched(&mut self) -> Result<Arc<DataFrame>> {
        let dataset = self.config.enriched_dataset.0.clone();
        let source = &self.source;
        self.frames.get_or_fetch(&dataset, || {
            debug!("[session] fetching {dataset} from {}", source.describe());
            source.fetch(&dataset)
        })
    }

    /// Parsed boundaries of `level`.
    pub fn boundaries(&mut self, level: Level) -> Result<Arc<BoundarySet>> {
        let (_, dataset) = resolve_level(level);
        let source = &self.source;
        self.boundaries.get_or_fetch(dataset, || {
            debug!("[session] fetching {dataset} from {}", source.describe());
            let df = source.fetch(dataset)?;
            BoundarySet::from_frame(&df, level)
                .with_context(|| format!("Failed to read {level} boundaries from {dataset:?}"))
        })
    }

    /// Totals of `topic` per `level` group over the enriched dataset.
    pub fn aggregate(&mut self, level: Level, topic: Topic) -> Result<Aggregate> {
        let records = self.enriched()?;
        let (group_key, _) = resolve_level(level);
        let count_column = resolve_topic(topic);
        aggregate(&records, group_key, count_column)
            .with_context(|| format!("Failed to aggregate {topic} by {level}"))
    }

    /// Full client-side pipeline: registry, aggregation, boundary join.
    /// Every boundary of `level` appears once, with 0 where no data exists.
    pub fn resolve(&mut self, level: Level, topic: Topic) -> Result<Vec<JoinedRow>> {
        let totals = self.aggregate(level, topic)?;
        let boundaries = self.boundaries(level)?;
        let rows = join_boundaries(boundaries.records(), &totals);

        info!(
            "[session] {topic} by {level}: {} boundaries, {} with data, total {}",
            rows.len(),
            rows.iter().filter(|r| totals.contains(&r.code)).count(),
            totals.total(),
        );
        Ok(rows)
    }

    /// Server-side path: the SQL statement for this selection.
    pub fn query(&self, level: Level, topic: Topic) -> Result<SpatialCountQuery> {
        SpatialCountQuery::for_selection(&self.config.warehouse, level, topic)
            .with_context(|| format!("Invalid warehouse configuration for {topic} by {level}"))
    }

    /// Drop one cached dataset so the next call refetches it.
    pub fn invalidate(&mut self, dataset: &str) -> bool {
        let frame = self.frames.invalidate(dataset);
        let boundary = self.boundaries.invalidate(dataset);
        frame || boundary
    }

    /// Drop every cached dataset.
    pub fn refresh(&mut self) {
        self.frames.clear();
        self.boundaries.clear();
    }
}
