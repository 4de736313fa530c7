use std::{fmt, str::FromStr};

use super::{normalize, RegistryError};

/// Feature category being counted per boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Roads,
    Habitations,
    Facilities,
    Proposals,
    Buildings,
    OsmPois,
}

impl Topic {
    pub const ALL: [Topic; 6] = [
        Topic::Roads,
        Topic::Habitations,
        Topic::Facilities,
        Topic::Proposals,
        Topic::Buildings,
        Topic::OsmPois,
    ];

    /// Per-subdistrict count column in the enriched dataset.
    pub fn count_column(&self) -> &'static str {
        match self {
            Topic::Roads => "roadcnt",
            Topic::Habitations => "habcnt",
            Topic::Facilities => "faccnt",
            Topic::Proposals => "propcnt",
            Topic::Buildings => "bldgcnt",
            Topic::OsmPois => "poicnt",
        }
    }

    /// Warehouse `(dataset, table)` holding the topic's point/line features.
    pub fn feature_table(&self) -> (&'static str, &'static str) {
        match self {
            Topic::Roads => ("geoprocessed", "road"),
            Topic::Habitations => ("geoprocessed", "habitation"),
            Topic::Facilities => ("geoprocessed", "facilities"),
            Topic::Proposals => ("geoprocessed", "proposal"),
            Topic::Buildings => ("buildings", "india"),
            Topic::OsmPois => ("geoprocessed", "india_osm_pois"),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Topic::Roads => "Roads",
            Topic::Habitations => "Habitations",
            Topic::Facilities => "Facilities",
            Topic::Proposals => "Proposals",
            Topic::Buildings => "Buildings",
            Topic::OsmPois => "OpenStreetMap PoIs",
        }
    }

    pub(super) fn labels() -> String {
        Topic::ALL.iter().map(|t| t.label()).collect::<Vec<_>>().join(", ")
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Topic::Roads => &["road", "roads"],
            Topic::Habitations => &["habitation", "habitations"],
            Topic::Facilities => &["facility", "facilities"],
            Topic::Proposals => &["proposal", "proposals"],
            Topic::Buildings => &["building", "buildings"],
            Topic::OsmPois => &["openstreetmappois", "osmpois", "osmpoi", "pois", "poi"],
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Topic {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s);
        Topic::ALL.into_iter()
            .find(|topic| topic.aliases().contains(&key.as_str()))
            .ok_or_else(|| RegistryError::UnknownTopic(s.to_string()))
    }
}
