//! Domain entities: core data structures

use std::fmt;

use serde::Deserialize;

/// Conversion year after which a vampire counts as a millennial.
pub const MILLENNIAL_YEAR: i32 = 1980;

/// Data payload of a lineage node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vampire {
    /// Identifier, treated as unique by name lookups
    pub name: String,
    /// Year the vampire was turned
    pub year_converted: i32,
}

impl Vampire {
    pub fn new(name: impl Into<String>, year_converted: i32) -> Self {
        Self {
            name: name.into(),
            year_converted,
        }
    }
}

impl fmt::Display for Vampire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.year_converted)
    }
}

/// One `[[vampire]]` table of a lineage file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct VampireRecord {
    pub name: String,
    pub year_converted: i32,
    /// Name of the vampire that turned this one; `None` for the original
    #[serde(default)]
    pub sire: Option<String>,
}

/// Serialized description of a whole lineage.
///
/// ```toml
/// [[vampire]]
/// name = "original"
/// year_converted = 1200
///
/// [[vampire]]
/// name = "ansel"
/// year_converted = 1750
/// sire = "original"
/// ```
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct LineageFile {
    #[serde(default)]
    pub vampire: Vec<VampireRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_vampire_when_displaying_then_shows_name_and_year() {
        assert_eq!(Vampire::new("ansel", 1750).to_string(), "ansel (1750)");
    }

    #[test]
    fn given_record_without_sire_when_parsing_then_sire_is_none() {
        let file: LineageFile = toml::from_str(
            r#"
[[vampire]]
name = "original"
year_converted = 1200
"#,
        )
        .unwrap();
        assert_eq!(file.vampire.len(), 1);
        assert_eq!(file.vampire[0].sire, None);
    }
}
