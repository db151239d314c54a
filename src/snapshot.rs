//! The table generated from the shipping build, compiled into the crate.

use crate::store::ConstantTableStore;

/// Location of the embedded table, relative to the crate root
pub const SNAPSHOT_TOML_PATH: &str = "data/v8heapconst.toml";

/// TOML source of the embedded table
pub const SNAPSHOT_TOML: &str = include_str!("../data/v8heapconst.toml");

lazy_static! {
    static ref SNAPSHOT: ConstantTableStore = match ConstantTableStore::from_toml(SNAPSHOT_TOML) {
        Ok(store) => store,
        Err(e) => panic!("embedded heap constant table is corrupt: {}", e),
    };
}

/// The embedded table, built on first use and shared for the life of the process
pub fn builtin() -> &'static ConstantTableStore {
    &SNAPSHOT
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn snapshot_sizes() {
        let store = builtin();
        assert_eq!(store.instance_type_count(), 247);
        assert_eq!(store.known_map_count(), 166);
        assert_eq!(store.known_object_count(), 101);
        assert_eq!(store.heap_first_pages().count(), 3);
        assert_eq!(store.frame_markers().len(), 23);
    }

    #[test]
    fn builtin_is_built_once() {
        assert!(std::ptr::eq(builtin(), builtin()));
    }
}
