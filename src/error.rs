// Lookup and load errors

use std::fmt;

use crate::space::HeapSpace;

/// A key missing from one of the tables. Tables generated for another engine
/// build are expected to miss keys, so callers should print the raw value
/// instead of giving up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    UnknownInstanceType(u16),
    UnknownSpace(String),
    UnknownMap(HeapSpace, u32),    // space, offset
    UnknownObject(HeapSpace, u32), // space, offset
    UnknownPage(u32),              // masked address
    FrameMarkerOutOfRange { index: usize, len: usize },
}

impl LookupError {
    /// True for a missing key, false for an index past the frame marker list
    pub fn is_not_found(&self) -> bool {
        !matches!(self, LookupError::FrameMarkerOutOfRange { .. })
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LookupError::UnknownInstanceType(tag) => {
                write!(f, "Unknown instance type {}", tag)
            }
            LookupError::UnknownSpace(name) => {
                write!(f, "Unknown heap space '{}'", name)
            }
            LookupError::UnknownMap(space, offset) => {
                write!(f, "No known map at {}+{:#07x}", space, offset)
            }
            LookupError::UnknownObject(space, offset) => {
                write!(f, "No known object at {}+{:#07x}", space, offset)
            }
            LookupError::UnknownPage(address) => {
                write!(f, "Address {:#010x} is not a known first page", address)
            }
            LookupError::FrameMarkerOutOfRange { index, len } => {
                write!(
                    f,
                    "Frame marker {} out of range (table has {} markers)",
                    index, len
                )
            }
        }
    }
}

impl std::error::Error for LookupError {}

/// Failure to build a table. Nothing is returned on failure, a table is
/// either complete or absent.
#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Parse(String),
    Serialize(String),
    UnknownSpace(String),
    DuplicateInstanceType(u16),
    DuplicateMap(HeapSpace, u32),
    DuplicateObject(HeapSpace, u32),
    DuplicatePage(u32),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "IO error: {}", e),
            LoadError::Parse(msg) => write!(f, "Table parse error: {}", msg),
            LoadError::Serialize(msg) => write!(f, "Table serialize error: {}", msg),
            LoadError::UnknownSpace(name) => {
                write!(f, "Table names unknown heap space '{}'", name)
            }
            LoadError::DuplicateInstanceType(tag) => {
                write!(f, "Instance type {} listed more than once", tag)
            }
            LoadError::DuplicateMap(space, offset) => {
                write!(f, "Map at {}+{:#07x} listed more than once", space, offset)
            }
            LoadError::DuplicateObject(space, offset) => {
                write!(
                    f,
                    "Object at {}+{:#07x} listed more than once",
                    space, offset
                )
            }
            LoadError::DuplicatePage(address) => {
                write!(f, "First page {:#010x} listed more than once", address)
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        LoadError::Io(e)
    }
}

impl From<toml::de::Error> for LoadError {
    fn from(e: toml::de::Error) -> Self {
        LoadError::Parse(e.to_string())
    }
}

impl From<toml::ser::Error> for LoadError {
    fn from(e: toml::ser::Error) -> Self {
        LoadError::Serialize(e.to_string())
    }
}
