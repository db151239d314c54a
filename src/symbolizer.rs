//! Human-readable names for raw heap values
//!
//! Every formatter falls back to the raw number with an "unknown" note, so
//! dumps from other engine builds still print.

use std::num::NonZeroU32;

use crate::store::{mask_address, ConstantTableStore, DEFAULT_PAGE_SIZE};

pub struct Symbolizer<'a> {
    store: &'a ConstantTableStore,
    page_size: NonZeroU32,
}

impl<'a> Symbolizer<'a> {
    pub fn new(store: &'a ConstantTableStore) -> Self {
        let page_size = NonZeroU32::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroU32::MIN);
        Symbolizer { store, page_size }
    }

    pub fn with_page_size(store: &'a ConstantTableStore, page_size: NonZeroU32) -> Self {
        Symbolizer { store, page_size }
    }

    pub fn format_instance_type(&self, tag: u16) -> String {
        match self.store.instance_type(tag) {
            Ok(name) => name.to_string(),
            Err(_) => format!("UNKNOWN_TYPE ({})", tag),
        }
    }

    pub fn format_map(&self, space: &str, offset: u32) -> String {
        match self.store.known_map(space, offset) {
            Ok(map) => format!(
                "{} ({})",
                map.name,
                self.format_instance_type(map.instance_type)
            ),
            Err(_) => format!("{}+{:#07x} (unknown map)", space, offset),
        }
    }

    pub fn format_object(&self, space: &str, offset: u32) -> String {
        match self.store.known_object(space, offset) {
            Ok(name) => name.to_string(),
            Err(_) => format!("{}+{:#07x} (unknown object)", space, offset),
        }
    }

    /// Name an arbitrary heap address: known map, then known object, then
    /// space and offset, then the bare masked address
    pub fn format_address(&self, address: u64) -> String {
        let (space, offset) = match self.store.resolve_address(address, self.page_size) {
            Ok(found) => found,
            Err(_) => return format!("{:#010x} (unknown space)", mask_address(address)),
        };

        if let Ok(map) = self.store.known_map_in(space, offset) {
            format!("{} ({})", map.name, self.format_instance_type(map.instance_type))
        } else if let Ok(name) = self.store.known_object_in(space, offset) {
            name.to_string()
        } else {
            format!("{}+{:#07x}", space, offset)
        }
    }

    pub fn format_frame_marker(&self, code: usize) -> String {
        match self.store.frame_marker(code) {
            Ok(name) => name.to_string(),
            Err(_) => format!("UNKNOWN_FRAME ({})", code),
        }
    }
}
