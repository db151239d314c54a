//! The constant table store
//!
//! A `ConstantTableStore` holds one generated snapshot of the engine's heap
//! layout constants:
//! - instance type tags and their names
//! - known maps and known objects, keyed by (space, offset)
//! - the lower 32 bits of each space's first page
//! - frame marker names, indexed by marker code
//!
//! A store is built once and never changes. Every lookup answers with a typed
//! `LookupError` when the key is absent.

use std::num::NonZeroU32;

use indexmap::IndexMap;
use log::{debug, trace};

use crate::error::{LoadError, LookupError};
use crate::space::HeapSpace;

/// Distance between consecutive first pages in the shipping build
pub const DEFAULT_PAGE_SIZE: u32 = 0x40000;

/// A known map: the instance type it describes and its root name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownMap {
    pub instance_type: u16,
    pub name: String,
}

/// SpaceMatch decides how an address is matched against first page addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceMatch {
    /// The masked address must be a recorded first page
    Exact,
    /// The masked address is rounded down to a page of this size first
    Page(NonZeroU32),
}

impl Default for SpaceMatch {
    fn default() -> Self {
        match NonZeroU32::new(DEFAULT_PAGE_SIZE) {
            Some(size) => SpaceMatch::Page(size),
            None => SpaceMatch::Exact,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConstantTableStore {
    instance_types: IndexMap<u16, String>,
    known_maps: IndexMap<(HeapSpace, u32), KnownMap>,
    known_objects: IndexMap<(HeapSpace, u32), String>,
    heap_first_pages: IndexMap<u32, HeapSpace>,
    frame_markers: Vec<String>,
}

/// Lower 32 bits of a (possibly compressed) heap pointer
pub fn mask_address(address: u64) -> u32 {
    (address & 0xffff_ffff) as u32
}

fn page_base(address: u32, page_size: NonZeroU32) -> u32 {
    address - address % page_size.get()
}

fn parse_space(space: &str) -> Result<HeapSpace, LookupError> {
    space.parse::<HeapSpace>().map_err(|name| {
        trace!("lookup in unknown space '{}'", name);
        LookupError::UnknownSpace(name)
    })
}

impl ConstantTableStore {
    pub fn builder() -> StoreBuilder {
        StoreBuilder::default()
    }

    /// Name of an instance type tag
    pub fn instance_type(&self, tag: u16) -> Result<&str, LookupError> {
        match self.instance_types.get(&tag) {
            Some(name) => Ok(name),
            None => {
                trace!("unknown instance type {}", tag);
                Err(LookupError::UnknownInstanceType(tag))
            }
        }
    }

    /// Tag carrying the given instance type name
    pub fn instance_type_tag(&self, name: &str) -> Option<u16> {
        self.instance_types
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(&tag, _)| tag)
    }

    pub fn known_map(&self, space: &str, offset: u32) -> Result<&KnownMap, LookupError> {
        self.known_map_in(parse_space(space)?, offset)
    }

    pub fn known_map_in(&self, space: HeapSpace, offset: u32) -> Result<&KnownMap, LookupError> {
        self.known_maps.get(&(space, offset)).ok_or_else(|| {
            trace!("no known map at {}+{:#07x}", space, offset);
            LookupError::UnknownMap(space, offset)
        })
    }

    pub fn known_object(&self, space: &str, offset: u32) -> Result<&str, LookupError> {
        self.known_object_in(parse_space(space)?, offset)
    }

    pub fn known_object_in(&self, space: HeapSpace, offset: u32) -> Result<&str, LookupError> {
        match self.known_objects.get(&(space, offset)) {
            Some(name) => Ok(name),
            None => {
                trace!("no known object at {}+{:#07x}", space, offset);
                Err(LookupError::UnknownObject(space, offset))
            }
        }
    }

    /// Space whose first page is exactly at the lower 32 bits of `address`
    pub fn classify_space(&self, address: u64) -> Result<HeapSpace, LookupError> {
        self.classify_space_with(address, SpaceMatch::Exact)
    }

    pub fn classify_space_with(
        &self,
        address: u64,
        policy: SpaceMatch,
    ) -> Result<HeapSpace, LookupError> {
        let masked = mask_address(address);
        let key = match policy {
            SpaceMatch::Exact => masked,
            SpaceMatch::Page(size) => page_base(masked, size),
        };
        self.heap_first_pages.get(&key).copied().ok_or_else(|| {
            trace!("{:#010x} is not on a known first page", masked);
            LookupError::UnknownPage(key)
        })
    }

    /// Split an address into its space and the offset from that space's first page
    pub fn resolve_address(
        &self,
        address: u64,
        page_size: NonZeroU32,
    ) -> Result<(HeapSpace, u32), LookupError> {
        let masked = mask_address(address);
        let base = page_base(masked, page_size);
        let space = self.classify_space_with(u64::from(base), SpaceMatch::Exact)?;
        Ok((space, masked - base))
    }

    pub fn map_at_address(
        &self,
        address: u64,
        page_size: NonZeroU32,
    ) -> Result<&KnownMap, LookupError> {
        let (space, offset) = self.resolve_address(address, page_size)?;
        self.known_map_in(space, offset)
    }

    pub fn object_at_address(
        &self,
        address: u64,
        page_size: NonZeroU32,
    ) -> Result<&str, LookupError> {
        let (space, offset) = self.resolve_address(address, page_size)?;
        self.known_object_in(space, offset)
    }

    /// Name of frame marker `index`
    pub fn frame_marker(&self, index: usize) -> Result<&str, LookupError> {
        self.frame_markers
            .get(index)
            .map(String::as_str)
            .ok_or(LookupError::FrameMarkerOutOfRange {
                index,
                len: self.frame_markers.len(),
            })
    }

    pub fn instance_types(&self) -> impl Iterator<Item = (u16, &str)> {
        self.instance_types
            .iter()
            .map(|(&tag, name)| (tag, name.as_str()))
    }

    pub fn known_maps(&self) -> impl Iterator<Item = (HeapSpace, u32, &KnownMap)> {
        self.known_maps
            .iter()
            .map(|(&(space, offset), map)| (space, offset, map))
    }

    pub fn known_objects(&self) -> impl Iterator<Item = (HeapSpace, u32, &str)> {
        self.known_objects
            .iter()
            .map(|(&(space, offset), name)| (space, offset, name.as_str()))
    }

    pub fn heap_first_pages(&self) -> impl Iterator<Item = (u32, HeapSpace)> + '_ {
        self.heap_first_pages
            .iter()
            .map(|(&address, &space)| (address, space))
    }

    pub fn frame_markers(&self) -> &[String] {
        &self.frame_markers
    }

    pub fn instance_type_count(&self) -> usize {
        self.instance_types.len()
    }

    pub fn known_map_count(&self) -> usize {
        self.known_maps.len()
    }

    pub fn known_object_count(&self) -> usize {
        self.known_objects.len()
    }
}

/// StoreBuilder collects entries in generator order and rejects repeated keys
#[derive(Debug, Default)]
pub struct StoreBuilder {
    store: ConstantTableStore,
}

impl StoreBuilder {
    pub fn instance_type(mut self, tag: u16, name: &str) -> Result<Self, LoadError> {
        if self
            .store
            .instance_types
            .insert(tag, name.to_string())
            .is_some()
        {
            return Err(LoadError::DuplicateInstanceType(tag));
        }
        Ok(self)
    }

    pub fn known_map(
        mut self,
        space: HeapSpace,
        offset: u32,
        instance_type: u16,
        name: &str,
    ) -> Result<Self, LoadError> {
        let map = KnownMap {
            instance_type,
            name: name.to_string(),
        };
        if self.store.known_maps.insert((space, offset), map).is_some() {
            return Err(LoadError::DuplicateMap(space, offset));
        }
        Ok(self)
    }

    pub fn known_object(
        mut self,
        space: HeapSpace,
        offset: u32,
        name: &str,
    ) -> Result<Self, LoadError> {
        if self
            .store
            .known_objects
            .insert((space, offset), name.to_string())
            .is_some()
        {
            return Err(LoadError::DuplicateObject(space, offset));
        }
        Ok(self)
    }

    pub fn heap_first_page(mut self, address: u32, space: HeapSpace) -> Result<Self, LoadError> {
        if self.store.heap_first_pages.insert(address, space).is_some() {
            return Err(LoadError::DuplicatePage(address));
        }
        Ok(self)
    }

    pub fn frame_marker(mut self, name: &str) -> Self {
        self.store.frame_markers.push(name.to_string());
        self
    }

    pub fn build(self) -> ConstantTableStore {
        let store = self.store;
        debug!(
            "built heap constant table: {} instance types, {} maps, {} objects, {} first pages, {} frame markers",
            store.instance_types.len(),
            store.known_maps.len(),
            store.known_objects.len(),
            store.heap_first_pages.len(),
            store.frame_markers.len()
        );
        store
    }
}
