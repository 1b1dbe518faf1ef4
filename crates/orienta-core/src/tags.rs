//! The closed profile tag set and the score tally built over it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One of the four fixed interest categories of the instrument.
///
/// Declaration order doubles as the documented tie-break order: when two tags
/// share the maximum tally count, the earlier variant wins. The set is closed
/// at build time; there is no runtime extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileTag {
    Realistic,
    Investigative,
    Artistic,
    Social,
}

/// Per-submission count of tag occurrences. Only tags that scored at least
/// one point are present; zero-count tags are absent, not zero-valued.
pub type ScoreTally = BTreeMap<ProfileTag, u32>;

impl ProfileTag {
    pub const ALL: [ProfileTag; 4] = [
        ProfileTag::Realistic,
        ProfileTag::Investigative,
        ProfileTag::Artistic,
        ProfileTag::Social,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProfileTag::Realistic => "realistic",
            ProfileTag::Investigative => "investigative",
            ProfileTag::Artistic => "artistic",
            ProfileTag::Social => "social",
        }
    }

    /// Parse the lowercase storage form back into a tag.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "realistic" => Some(ProfileTag::Realistic),
            "investigative" => Some(ProfileTag::Investigative),
            "artistic" => Some(ProfileTag::Artistic),
            "social" => Some(ProfileTag::Social),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProfileTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
