//! TOML form of a constant table
//!
//! Each table is written as an array of tables in generator order, the frame
//! markers as a plain array. Offsets and addresses may be written in hex.

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::space::HeapSpace;
use crate::store::ConstantTableStore;

#[derive(Debug, Serialize, Deserialize)]
struct TableFile {
    // plain values have to come before the arrays of tables
    #[serde(default)]
    frame_markers: Vec<String>,
    #[serde(default)]
    instance_types: Vec<InstanceTypeRecord>,
    #[serde(default)]
    known_maps: Vec<KnownMapRecord>,
    #[serde(default)]
    known_objects: Vec<KnownObjectRecord>,
    #[serde(default)]
    heap_first_pages: Vec<FirstPageRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct InstanceTypeRecord {
    tag: u16,
    name: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct KnownMapRecord {
    space: String,
    offset: u32,
    instance_type: u16,
    name: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct KnownObjectRecord {
    space: String,
    offset: u32,
    name: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct FirstPageRecord {
    address: u32,
    space: String,
}

fn space_from(name: &str) -> Result<HeapSpace, LoadError> {
    name.parse::<HeapSpace>().map_err(LoadError::UnknownSpace)
}

impl ConstantTableStore {
    /// Build a store from a TOML table
    pub fn from_toml(text: &str) -> Result<ConstantTableStore, LoadError> {
        let file: TableFile = toml::from_str(text)?;

        let mut builder = ConstantTableStore::builder();
        for r in &file.instance_types {
            builder = builder.instance_type(r.tag, &r.name)?;
        }
        for r in &file.known_maps {
            builder = builder.known_map(space_from(&r.space)?, r.offset, r.instance_type, &r.name)?;
        }
        for r in &file.known_objects {
            builder = builder.known_object(space_from(&r.space)?, r.offset, &r.name)?;
        }
        for r in &file.heap_first_pages {
            builder = builder.heap_first_page(r.address, space_from(&r.space)?)?;
        }
        for name in &file.frame_markers {
            builder = builder.frame_marker(name);
        }

        Ok(builder.build())
    }

    /// Read and build a store from a TOML table on disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<ConstantTableStore, LoadError> {
        let path = path.as_ref();
        debug!("loading heap constant table from {}", path.display());
        let text = fs::read_to_string(path)?;
        ConstantTableStore::from_toml(&text)
    }

    /// Write the store in the form `from_toml` reads
    pub fn to_toml(&self) -> Result<String, LoadError> {
        let file = TableFile {
            frame_markers: self.frame_markers().to_vec(),
            instance_types: self
                .instance_types()
                .map(|(tag, name)| InstanceTypeRecord {
                    tag,
                    name: name.to_string(),
                })
                .collect(),
            known_maps: self
                .known_maps()
                .map(|(space, offset, map)| KnownMapRecord {
                    space: space.name().to_string(),
                    offset,
                    instance_type: map.instance_type,
                    name: map.name.clone(),
                })
                .collect(),
            known_objects: self
                .known_objects()
                .map(|(space, offset, name)| KnownObjectRecord {
                    space: space.name().to_string(),
                    offset,
                    name: name.to_string(),
                })
                .collect(),
            heap_first_pages: self
                .heap_first_pages()
                .map(|(address, space)| FirstPageRecord {
                    address,
                    space: space.name().to_string(),
                })
                .collect(),
        };
        Ok(toml::to_string(&file)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;
    use test_log::test;

    const SMALL: &str = r#"
frame_markers = ["ENTRY", "CONSTRUCT_ENTRY", "EXIT"]

[[instance_types]]
tag = 130
name = "HEAP_NUMBER_TYPE"

[[instance_types]]
tag = 2114
name = "JS_MESSAGE_OBJECT_TYPE"

[[known_maps]]
space = "read_only_space"
offset = 0x02119
instance_type = 243
name = "MetaMap"

[[known_maps]]
space = "map_space"
offset = 0x02141
instance_type = 2114
name = "JSMessageObjectMap"

[[known_objects]]
space = "old_space"
offset = 0x059b5
name = "ProxyRevokeSharedFun"

[[heap_first_pages]]
address = 0x08100000
space = "map_space"
"#;

    #[test]
    fn reads_hex_literals() {
        let store = ConstantTableStore::from_toml(SMALL).unwrap();
        assert_eq!(store.instance_type(2114), Ok("JS_MESSAGE_OBJECT_TYPE"));
        assert_eq!(
            store.known_map("map_space", 0x2141).map(|m| m.instance_type),
            Ok(2114)
        );
        assert_eq!(
            store.known_object("old_space", 0x59b5),
            Ok("ProxyRevokeSharedFun")
        );
        assert_eq!(store.classify_space(0x0810_0000), Ok(HeapSpace::MapSpace));
        assert_eq!(store.frame_marker(2), Ok("EXIT"));
    }

    #[test]
    fn written_table_reads_back_identically() {
        let store = ConstantTableStore::from_toml(SMALL).unwrap();
        let text = store.to_toml().unwrap();
        let reloaded = ConstantTableStore::from_toml(&text).unwrap();
        assert_eq!(store, reloaded);
    }

    #[test]
    fn missing_sections_give_empty_tables() {
        let store = ConstantTableStore::from_toml("frame_markers = []\n").unwrap();
        assert_eq!(store.instance_type_count(), 0);
        assert_eq!(
            store.frame_marker(0),
            Err(LookupError::FrameMarkerOutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn unknown_space_fails_the_load() {
        let text = r#"
[[known_objects]]
space = "shared_space"
offset = 0x100
name = "Thing"
"#;
        let err = ConstantTableStore::from_toml(text).unwrap_err();
        assert!(matches!(err, LoadError::UnknownSpace(ref s) if s == "shared_space"));
    }

    #[test]
    fn duplicate_page_fails_the_load() {
        let text = r#"
[[heap_first_pages]]
address = 0x08000000
space = "read_only_space"

[[heap_first_pages]]
address = 0x08000000
space = "old_space"
"#;
        let err = ConstantTableStore::from_toml(text).unwrap_err();
        assert!(matches!(err, LoadError::DuplicatePage(0x0800_0000)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = ConstantTableStore::from_toml("[[instance_types]]\ntag = \"x\"\n").unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));

        // tags are 16 bit
        let err = ConstantTableStore::from_toml("[[instance_types]]\ntag = 70000\nname = \"X\"\n")
            .unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ConstantTableStore::load("/nonexistent/v8heapconst.toml").unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
