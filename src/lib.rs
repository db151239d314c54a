#[macro_use]
extern crate lazy_static;

pub mod error;
pub mod listing;
pub mod snapshot;
pub mod space;
pub mod store;
pub mod symbolizer;
pub mod table_file;

pub use crate::error::{LoadError, LookupError};
pub use crate::snapshot::{builtin, SNAPSHOT_TOML_PATH};
pub use crate::space::HeapSpace;
pub use crate::store::{ConstantTableStore, KnownMap, SpaceMatch, StoreBuilder, DEFAULT_PAGE_SIZE};
pub use crate::symbolizer::Symbolizer;

#[cfg(test)]
mod tests {
    use crate::snapshot::builtin;
    use crate::symbolizer::Symbolizer;

    use test_log::test;

    #[test]
    fn dump_snapshot() {
        // dump the embedded table structure
        let store = builtin();
        log::info!("{}", store);

        let sym = Symbolizer::new(store);
        log::info!("first frame marker: {}", sym.format_frame_marker(0));
    }
}

/*
First pages of the shipping build (lower 32 bits)
read_only_space 08000000  maps, oddballs, empty collections
old_space       080c0000  accessors, protectors, caches, shared functions
map_space       08100000  ExternalMap, JSMessageObjectMap
*/
