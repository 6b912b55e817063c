use serde::{Deserialize, Serialize};

/// Sales region shown on the map.
///
/// Each concrete region owns one prefix letter in the area identifier space.
/// `AllInside` is a roster-level label only and has no prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "East")]
    East,
    #[serde(rename = "Central")]
    Central,
    #[serde(rename = "West")]
    West,
    #[serde(rename = "All (Inside)")]
    AllInside,
}

impl Region {
    /// Prefix letter used by area identifiers of this region.
    pub fn prefix(&self) -> Option<char> {
        match self {
            Region::East => Some('A'),
            Region::Central => Some('B'),
            Region::West => Some('C'),
            Region::AllInside => None,
        }
    }

    /// Reverse of [`Region::prefix`], case-insensitive.
    pub fn from_prefix(prefix: char) -> Option<Self> {
        match prefix.to_ascii_uppercase() {
            'A' => Some(Region::East),
            'B' => Some(Region::Central),
            'C' => Some(Region::West),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::East => "East",
            Region::Central => "Central",
            Region::West => "West",
            Region::AllInside => "All (Inside)",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "east" | "a" => Ok(Region::East),
            "central" | "b" => Ok(Region::Central),
            "west" | "c" => Ok(Region::West),
            "all (inside)" | "all inside" | "allinside" => Ok(Region::AllInside),
            _ => Err(format!("Unknown region: {}", s)),
        }
    }
}

/// Coverage filter requested by a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageType {
    #[default]
    All,
    Primary,
    Secondary,
}

impl CoverageType {
    /// Lenient parse for form input; anything unrecognized is `All`.
    pub fn from_string(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CoverageType::All => "all",
            CoverageType::Primary => "primary",
            CoverageType::Secondary => "secondary",
        }
    }
}

impl std::fmt::Display for CoverageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CoverageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(CoverageType::All),
            "primary" => Ok(CoverageType::Primary),
            "secondary" => Ok(CoverageType::Secondary),
            _ => Err(format!("Unknown coverage type: {}", s)),
        }
    }
}

/// Which list of a record satisfied a query.
///
/// Declaration order is the result sort order: primary first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchedCoverage {
    Primary,
    Secondary,
}

impl MatchedCoverage {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchedCoverage::Primary => "primary",
            MatchedCoverage::Secondary => "secondary",
        }
    }
}

impl std::fmt::Display for MatchedCoverage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parsed view of an area identifier such as `"A06_GulfCoast"`.
///
/// Borrowed from the source string; parsing never allocates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AreaId<'a> {
    /// Prefix letter plus area number, e.g. `"A06"`
    pub code: &'a str,
    /// Area name without spaces, e.g. `"GulfCoast"`
    pub name: &'a str,
}

impl<'a> AreaId<'a> {
    /// Split on the first `_`. Returns `None` for malformed identifiers:
    /// no separator, empty code part, or empty name part.
    pub fn parse(raw: &'a str) -> Option<Self> {
        let (code, name) = raw.trim().split_once('_')?;
        let code = code.trim();
        let name = name.trim();
        if code.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self { code, name })
    }

    /// First letter of the code part.
    pub fn prefix(&self) -> Option<char> {
        self.code.chars().next()
    }

    /// Region owning this identifier, if the prefix is known.
    pub fn region(&self) -> Option<Region> {
        self.prefix().and_then(Region::from_prefix)
    }

    /// Case-insensitive prefix test. `None` accepts every identifier.
    pub fn has_prefix(&self, prefix: Option<char>) -> bool {
        match prefix {
            None => true,
            Some(p) => self.prefix().is_some_and(|c| c.eq_ignore_ascii_case(&p)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_prefix_mapping() {
        assert_eq!(Region::East.prefix(), Some('A'));
        assert_eq!(Region::Central.prefix(), Some('B'));
        assert_eq!(Region::West.prefix(), Some('C'));
        assert_eq!(Region::AllInside.prefix(), None);

        for region in [Region::East, Region::Central, Region::West] {
            let prefix = region.prefix().unwrap();
            assert_eq!(Region::from_prefix(prefix), Some(region));
            assert_eq!(Region::from_prefix(prefix.to_ascii_lowercase()), Some(region));
        }
        assert_eq!(Region::from_prefix('D'), None);
    }

    #[test]
    fn test_region_from_str() {
        assert_eq!("East".parse::<Region>(), Ok(Region::East));
        assert_eq!("  central ".parse::<Region>(), Ok(Region::Central));
        assert_eq!("All (Inside)".parse::<Region>(), Ok(Region::AllInside));
        assert!("Northeast".parse::<Region>().is_err());
        assert!("".parse::<Region>().is_err());
    }

    #[test]
    fn test_region_serde_names() {
        let json = serde_json::to_string(&Region::AllInside).unwrap();
        assert_eq!(json, "\"All (Inside)\"");
        let region: Region = serde_json::from_str("\"West\"").unwrap();
        assert_eq!(region, Region::West);
    }

    #[test]
    fn test_coverage_type_lenient_parse() {
        assert_eq!(CoverageType::from_string("Primary"), CoverageType::Primary);
        assert_eq!(CoverageType::from_string("secondary"), CoverageType::Secondary);
        assert_eq!(CoverageType::from_string("whatever"), CoverageType::All);
        assert_eq!(CoverageType::from_string(""), CoverageType::All);
    }

    #[test]
    fn test_matched_coverage_order() {
        assert!(MatchedCoverage::Primary < MatchedCoverage::Secondary);
    }

    #[test]
    fn test_area_id_parse() {
        let id = AreaId::parse("A06_GulfCoast").unwrap();
        assert_eq!(id.code, "A06");
        assert_eq!(id.name, "GulfCoast");
        assert_eq!(id.region(), Some(Region::East));

        // Only the first underscore splits
        let id = AreaId::parse("B02_Twin_Cities").unwrap();
        assert_eq!(id.code, "B02");
        assert_eq!(id.name, "Twin_Cities");

        // Legacy lists carry a space after the separator
        let id = AreaId::parse("A01_ BaltimoreCoast").unwrap();
        assert_eq!(id.name, "BaltimoreCoast");
    }

    #[test]
    fn test_area_id_malformed() {
        assert!(AreaId::parse("garbage").is_none());
        assert!(AreaId::parse("A06_").is_none());
        assert!(AreaId::parse("_GulfCoast").is_none());
        assert!(AreaId::parse("").is_none());
    }

    #[test]
    fn test_area_id_prefix_case_insensitive() {
        let id = AreaId::parse("a06_gulfcoast").unwrap();
        assert!(id.has_prefix(Some('A')));
        assert!(!id.has_prefix(Some('B')));
        assert!(id.has_prefix(None));
    }
}
