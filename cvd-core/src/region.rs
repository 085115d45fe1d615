//! WHO region naming.
//!
//! The daily and latest tables spell regions out ("South-East Asia") while
//! the demographic snapshot concatenates multi-word names
//! ("South-EastAsia"). The two spellings are kept apart; nothing here
//! rewrites one into the other.

/// The six WHO regions, spelled as in the daily and latest tables.
pub const WHO_REGIONS: [&str; 6] = [
    "Africa",
    "Americas",
    "Eastern Mediterranean",
    "Europe",
    "South-East Asia",
    "Western Pacific",
];

/// Region a histogram of per-country distributions focuses on.
pub const EUROPE: &str = "Europe";

pub fn is_canonical_region(name: &str) -> bool {
    WHO_REGIONS.contains(&name)
}

/// The concatenated spelling used by the demographic snapshot.
pub fn compact_region_name(name: &str) -> String {
    name.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_spelling() {
        assert_eq!(compact_region_name("South-East Asia"), "South-EastAsia");
        assert_eq!(compact_region_name("Western Pacific"), "WesternPacific");
        assert_eq!(compact_region_name("Europe"), "Europe");
    }

    #[test]
    fn compact_spelling_is_not_canonical() {
        assert!(is_canonical_region("Eastern Mediterranean"));
        assert!(!is_canonical_region("EasternMediterranean"));
    }
}
