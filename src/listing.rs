use std::fmt::Display;
use std::fmt::Error;
use std::fmt::Formatter;

use crate::store::ConstantTableStore;

/// Renders the store as the generator's listing: tags in decimal, offsets as
/// five hex digits, first page addresses as eight.
impl Display for ConstantTableStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        writeln!(f, "# This file is automatically generated and should not")?;
        writeln!(f, "# be modified manually.")?;
        writeln!(f)?;

        writeln!(f, "# Instance types by tag.")?;
        writeln!(f, "INSTANCE_TYPES = {{")?;
        for (tag, name) in self.instance_types() {
            writeln!(f, "  {}: \"{}\",", tag, name)?;
        }
        writeln!(f, "}}")?;
        writeln!(f)?;

        writeln!(f, "# Known maps by (space, offset).")?;
        writeln!(f, "KNOWN_MAPS = {{")?;
        for (space, offset, map) in self.known_maps() {
            writeln!(
                f,
                "  (\"{}\", {:#07x}): ({}, \"{}\"),",
                space, offset, map.instance_type, map.name
            )?;
        }
        writeln!(f, "}}")?;
        writeln!(f)?;

        writeln!(f, "# Known objects by (space, offset).")?;
        writeln!(f, "KNOWN_OBJECTS = {{")?;
        for (space, offset, name) in self.known_objects() {
            writeln!(f, "  (\"{}\", {:#07x}): \"{}\",", space, offset, name)?;
        }
        writeln!(f, "}}")?;
        writeln!(f)?;

        writeln!(f, "# Lower 32 bits of the first page of each heap space.")?;
        writeln!(f, "HEAP_FIRST_PAGES = {{")?;
        for (address, space) in self.heap_first_pages() {
            writeln!(f, "  {:#010x}: \"{}\",", address, space)?;
        }
        writeln!(f, "}}")?;
        writeln!(f)?;

        writeln!(f, "# Frame marker names by marker code.")?;
        writeln!(f, "FRAME_MARKERS = (")?;
        for name in self.frame_markers() {
            writeln!(f, "  \"{}\",", name)?;
        }
        writeln!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use crate::space::HeapSpace;
    use crate::store::{ConstantTableStore, StoreBuilder};
    use test_log::test;

    #[test]
    fn listing_uses_generator_literals() {
        let store = ConstantTableStore::builder()
            .instance_type(0, "INTERNALIZED_STRING_TYPE")
            .and_then(|b| b.known_map(HeapSpace::ReadOnlySpace, 0x02119, 243, "MetaMap"))
            .and_then(|b| b.known_object(HeapSpace::OldSpace, 0x04aad, "StringSplitCache"))
            .and_then(|b| b.heap_first_page(0x08000000, HeapSpace::ReadOnlySpace))
            .map(|b| b.frame_marker("ENTRY").build())
            .unwrap();
        let listing = store.to_string();

        assert!(listing.contains("  0: \"INTERNALIZED_STRING_TYPE\",\n"));
        assert!(listing.contains("  (\"read_only_space\", 0x02119): (243, \"MetaMap\"),\n"));
        assert!(listing.contains("  (\"old_space\", 0x04aad): \"StringSplitCache\",\n"));
        assert!(listing.contains("  0x08000000: \"read_only_space\",\n"));
        assert!(listing.ends_with("FRAME_MARKERS = (\n  \"ENTRY\",\n)\n"));
    }

    #[test]
    fn empty_store_still_lists_every_table() {
        let listing = StoreBuilder::default().build().to_string();
        for table in [
            "INSTANCE_TYPES = {\n}",
            "KNOWN_MAPS = {\n}",
            "KNOWN_OBJECTS = {\n}",
            "HEAP_FIRST_PAGES = {\n}",
            "FRAME_MARKERS = (\n)",
        ] {
            assert!(listing.contains(table), "missing {}", table);
        }
    }
}
