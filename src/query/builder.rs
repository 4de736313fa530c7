use crate::{config::WarehouseConfig, registry::{Level, Topic}};

use super::{Ident, QueryError, TableRef};

/// Counts a topic's features per boundary of a level, keeping boundaries
/// with no features (count 0).
///
/// Every name in the statement is a validated [`Ident`] or [`TableRef`],
/// so the containment predicate, the grouping and the outer join are fixed
/// by the template rather than by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpatialCountQuery {
    topic_table: TableRef,
    level_table: TableRef,
    group_key: Ident,
    name_column: Ident,
    geometry_column: Ident,
    limit: Option<u64>,
}

impl SpatialCountQuery {
    pub fn new(topic_table: TableRef, level_table: TableRef, group_key: Ident, name_column: Ident) -> Self {
        Self {
            topic_table,
            level_table,
            group_key,
            name_column,
            geometry_column: Ident("geometry".into()),
            limit: None,
        }
    }

    /// Query for a dashboard selection, with every identifier taken from
    /// the registry and the warehouse configuration.
    pub fn for_selection(warehouse: &WarehouseConfig, level: Level, topic: Topic) -> Result<Self, QueryError> {
        let (topic_dataset, topic_table) = topic.feature_table();
        Ok(Self::new(
            TableRef::new(&warehouse.project, topic_dataset, topic_table)?,
            TableRef::new(&warehouse.project, &warehouse.boundary_dataset, level.boundary_dataset())?,
            Ident::new(level.group_key())?,
            Ident::new(level.name_column())?,
        ))
    }

    /// Cap the number of returned rows (dashboard previews use 100).
    pub fn limit(mut self, rows: u64) -> Self {
        self.limit = Some(rows);
        self
    }

    pub fn geometry_column(mut self, column: Ident) -> Self {
        self.geometry_column = column;
        self
    }

    pub fn build(&self) -> String {
        let Self { topic_table, level_table, group_key: key, name_column: name, geometry_column: geom, limit } = self;

        let mut sql = format!(
            "SELECT b.{key} AS code, b.{name} AS name, COALESCE(a.cnt, 0) AS cnt, b.{geom} AS geometry\n\
             FROM (\n\
             \x20 SELECT t.{key} AS code, t.{name} AS name, COUNT(f.{geom}) AS cnt\n\
             \x20 FROM {topic_table} AS f\n\
             \x20 JOIN {level_table} AS t\n\
             \x20   ON ST_CONTAINS(t.{geom}, f.{geom})\n\
             \x20 GROUP BY t.{key}, t.{name}\n\
             ) AS a\n\
             RIGHT OUTER JOIN {level_table} AS b\n\
             \x20 ON a.code = b.{key}"
        );
        if let Some(rows) = limit {
            sql.push_str(&format!("\nLIMIT {rows}"));
        }
        sql
    }
}

/// Build the spatial count statement for a topic table against a level
/// table grouped by `group_key` and `name_column`.
pub fn build_query(topic_table: &TableRef, level_table: &TableRef, group_key: &Ident, name_column: &Ident) -> String {
    SpatialCountQuery::new(topic_table.clone(), level_table.clone(), group_key.clone(), name_column.clone()).build()
}
