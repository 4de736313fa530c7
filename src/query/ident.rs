use std::{fmt, sync::LazyLock};

use regex::Regex;
use thiserror::Error;

static NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,127}$").expect("identifier pattern is valid")
});

// Cloud project ids also allow dashes, e.g. `dev-ind-geo-01`.
static PROJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z][a-z0-9-]{0,61}[a-z0-9]$").expect("project pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("invalid SQL identifier {0:?}")]
    InvalidIdentifier(String),
    #[error("invalid project id {0:?}")]
    InvalidProject(String),
}

/// A validated column or table name. Never needs escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident(pub(super) String);

impl Ident {
    pub fn new(name: &str) -> Result<Self, QueryError> {
        if NAME.is_match(name) {
            Ok(Self(name.to_string()))
        } else {
            Err(QueryError::InvalidIdentifier(name.to_string()))
        }
    }

    #[inline] pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fully qualified `project.dataset.table`, rendered backtick-quoted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableRef {
    project: String,
    dataset: Ident,
    table: Ident,
}

impl TableRef {
    pub fn new(project: &str, dataset: &str, table: &str) -> Result<Self, QueryError> {
        if !PROJECT.is_match(project) {
            return Err(QueryError::InvalidProject(project.to_string()));
        }
        Ok(Self {
            project: project.to_string(),
            dataset: Ident::new(dataset)?,
            table: Ident::new(table)?,
        })
    }

    #[inline] pub fn table(&self) -> &Ident { &self.table }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}.{}.{}`", self.project, self.dataset, self.table)
    }
}
