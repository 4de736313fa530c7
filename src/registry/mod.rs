//! Closed registry of administrative levels and feature topics.
//!
//! Every table and column name used anywhere else in the crate comes from
//! here, so a selection can never reach the aggregation or query layers
//! without a known grouping key.

mod level;
mod topic;

pub use level::Level;
pub use topic::Topic;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A user-facing selection that does not name a registered level or topic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("unknown level {0:?} (expected one of: {levels})", levels = Level::labels())]
    UnknownLevel(String),
    #[error("unknown topic {0:?} (expected one of: {topics})", topics = Topic::labels())]
    UnknownTopic(String),
}

/// Grouping-key column and boundary dataset id for `level`.
#[inline]
pub fn resolve_level(level: Level) -> (&'static str, &'static str) {
    (level.group_key(), level.boundary_dataset())
}

/// Count column for `topic` in the enriched dataset.
#[inline]
pub fn resolve_topic(topic: Topic) -> &'static str {
    topic.count_column()
}

/// Lowercase and drop everything but ASCII letters and digits, so that
/// "Parlamentary Constituencies", "parlamentary_constituencies" and
/// "ParlamentaryConstituencies" all compare equal.
pub(crate) fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

// Both enums travel as their labels ("Subdistricts", "Roads") and accept
// any alias `FromStr` does.
macro_rules! serde_by_label {
    ($($ty:ty),*) => {$(
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = String::deserialize(deserializer)?;
                text.parse().map_err(de::Error::custom)
            }
        }
    )*};
}

serde_by_label!(Level, Topic);
