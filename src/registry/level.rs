use std::{fmt, str::FromStr};

use super::{normalize, RegistryError};

/// Administrative granularity of an aggregation, ordered coarse to fine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    Country,
    State,
    District,
    Subdistrict,               // Taluk / tehsil
    ParliamentaryConstituency, // Lok Sabha seat
    AssemblyConstituency,      // Vidhan Sabha seat
}

impl Level {
    /// All levels in selection-slider order.
    pub const ALL: [Level; 6] = [
        Level::Country,
        Level::State,
        Level::District,
        Level::Subdistrict,
        Level::ParliamentaryConstituency,
        Level::AssemblyConstituency,
    ];

    /// Column holding this level's code, both in the enriched dataset and
    /// in the level's boundary table.
    pub fn group_key(&self) -> &'static str {
        match self {
            Level::Country => "country_code",
            Level::State => "state_code",
            Level::District => "district_code",
            Level::Subdistrict => "taluk_code",
            Level::ParliamentaryConstituency => "pc_code",
            Level::AssemblyConstituency => "ac_code",
        }
    }

    /// Column holding the human-readable name in the boundary table.
    pub fn name_column(&self) -> &'static str {
        match self {
            Level::Country => "country_name",
            Level::State => "state_name",
            Level::District => "district_name",
            Level::Subdistrict => "taluk_name",
            Level::ParliamentaryConstituency => "pc_name",
            Level::AssemblyConstituency => "ac_name",
        }
    }

    /// Identifier of the polygon boundary dataset for this level.
    pub fn boundary_dataset(&self) -> &'static str {
        match self {
            Level::Country => "country",
            Level::State => "states",
            Level::District => "districts",
            Level::Subdistrict => "subdistricts",
            Level::ParliamentaryConstituency => "parliamentary_constituencies",
            Level::AssemblyConstituency => "assembly_constituencies",
        }
    }

    /// Dashboard label.
    pub fn label(&self) -> &'static str {
        match self {
            Level::Country => "Country",
            Level::State => "States",
            Level::District => "Districts",
            Level::Subdistrict => "Subdistricts",
            Level::ParliamentaryConstituency => "Parliamentary Constituencies",
            Level::AssemblyConstituency => "Assembly Constituencies",
        }
    }

    pub(super) fn labels() -> String {
        Level::ALL.iter().map(|l| l.label()).collect::<Vec<_>>().join(", ")
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Level::Country => &["country", "countries"],
            Level::State => &["state", "states"],
            Level::District => &["district", "districts"],
            Level::Subdistrict => &["subdistrict", "subdistricts", "taluk", "taluks"],
            Level::ParliamentaryConstituency => &[
                "parliamentaryconstituency",
                "parliamentaryconstituencies",
                "parlamentaryconstituencies", // spelling used by the original dashboard
                "pc",
            ],
            Level::AssemblyConstituency => &[
                "assemblyconstituency",
                "assemblyconstituencies",
                "assemblyconsituencies",
                "ac",
            ],
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Level {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s);
        Level::ALL.into_iter()
            .find(|level| level.aliases().contains(&key.as_str()))
            .ok_or_else(|| RegistryError::UnknownLevel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dashboard_labels() {
        assert_eq!("Country".parse::<Level>(), Ok(Level::Country));
        assert_eq!("States".parse::<Level>(), Ok(Level::State));
        assert_eq!("Districts".parse::<Level>(), Ok(Level::District));
        assert_eq!("Subdistricts".parse::<Level>(), Ok(Level::Subdistrict));
        assert_eq!("Parlamentary Constituencies".parse::<Level>(), Ok(Level::ParliamentaryConstituency));
        assert_eq!("Assembly Consituencies".parse::<Level>(), Ok(Level::AssemblyConstituency));
    }

    #[test]
    fn label_round_trips() {
        for level in Level::ALL {
            assert_eq!(level.to_string().parse::<Level>(), Ok(level));
        }
    }

    #[test]
    fn rejects_unknown_and_empty() {
        assert!(matches!("".parse::<Level>(), Err(RegistryError::UnknownLevel(_))));
        assert!(matches!("Blocks".parse::<Level>(), Err(RegistryError::UnknownLevel(s)) if s == "Blocks"));
    }

    #[test]
    fn ordered_coarse_to_fine() {
        assert!(Level::Country < Level::State);
        assert!(Level::District < Level::Subdistrict);
    }
}
