use std::fmt::Display;
use std::fmt::Error;
use std::fmt::Formatter;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// HeapSpace names one of the engine's allocation spaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeapSpace {
    ReadOnlySpace,
    NewSpace,
    OldSpace,
    CodeSpace,
    MapSpace,
    LargeObjectSpace,
    CodeLargeObjectSpace,
    NewLargeObjectSpace,
}

impl HeapSpace {
    pub const ALL: [HeapSpace; 8] = [
        HeapSpace::ReadOnlySpace,
        HeapSpace::NewSpace,
        HeapSpace::OldSpace,
        HeapSpace::CodeSpace,
        HeapSpace::MapSpace,
        HeapSpace::LargeObjectSpace,
        HeapSpace::CodeLargeObjectSpace,
        HeapSpace::NewLargeObjectSpace,
    ];

    /// The name the generator writes for this space
    pub fn name(self) -> &'static str {
        match self {
            HeapSpace::ReadOnlySpace => "read_only_space",
            HeapSpace::NewSpace => "new_space",
            HeapSpace::OldSpace => "old_space",
            HeapSpace::CodeSpace => "code_space",
            HeapSpace::MapSpace => "map_space",
            HeapSpace::LargeObjectSpace => "large_object_space",
            HeapSpace::CodeLargeObjectSpace => "code_large_object_space",
            HeapSpace::NewLargeObjectSpace => "new_large_object_space",
        }
    }
}

impl FromStr for HeapSpace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HeapSpace::ALL
            .iter()
            .copied()
            .find(|space| space.name() == s)
            .ok_or_else(|| s.to_string())
    }
}

impl Display for HeapSpace {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::HeapSpace;
    use test_log::test;

    #[test]
    fn names_parse_back() {
        for space in HeapSpace::ALL {
            assert_eq!(space.name().parse::<HeapSpace>(), Ok(space));
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert_eq!(
            "shared_space".parse::<HeapSpace>(),
            Err("shared_space".to_string())
        );
        // names are case sensitive
        assert!("Old_Space".parse::<HeapSpace>().is_err());
    }

    #[test]
    fn display_matches_name() {
        assert_eq!(HeapSpace::MapSpace.to_string(), "map_space");
        assert_eq!(
            HeapSpace::CodeLargeObjectSpace.to_string(),
            "code_large_object_space"
        );
    }
}
