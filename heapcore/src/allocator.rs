//! The public operations (`initialize`, `allocate`, `free`, `reallocate`)
//! that orchestrate the block layout, free list, coalescer and placement
//! engine over a caller-supplied [`HeapRegion`].

use crate::block;
use crate::coalesce::coalesce;
use crate::config::HeapConfig;
use crate::error::AllocError;
use crate::free_list::FreeList;
use crate::placement::{find_fit, place};
use crate::region::HeapRegion;

/// Sentinels written at region start: alignment pad, prologue header, prologue
/// footer, epilogue header. Exactly enough to keep the heap walk gap-free
/// from the first real block to the epilogue (see the crate's DESIGN notes
/// for why this departs from the distilled source's `8*WSIZE` request).
const INITIAL_REGION_BYTES: usize = 4 * block::WORD;

/// An explicit free-list dynamic storage allocator over a single, owned
/// [`HeapRegion`]. Single-threaded, non-reentrant: callers needing
/// concurrent access must synchronize around a single `Allocator` value
/// themselves.
pub struct Allocator<R: HeapRegion> {
    region: R,
    free_list: FreeList,
    config: HeapConfig,
    first_block: Option<usize>,
}

impl<R: HeapRegion> Allocator<R> {
    /// Creates an allocator over `region` with the default configuration.
    /// The region is not usable until [`Allocator::initialize`] succeeds.
    pub fn new(region: R) -> Self {
        Self::with_config(region, HeapConfig::default())
    }

    /// Creates an allocator over `region` with an explicit configuration.
    pub fn with_config(region: R, config: HeapConfig) -> Self {
        Self {
            region,
            free_list: FreeList::new(),
            config,
            first_block: None,
        }
    }

    /// Writes the sentinel blocks and extends the region by one chunk,
    /// producing the first real free block. Must be called exactly once
    /// before any other operation.
    pub fn initialize(&mut self) -> Result<(), AllocError> {
        let base = self
            .region
            .extend(INITIAL_REGION_BYTES)
            .ok_or(AllocError::RegionExhausted)?;
        {
            let region = self.region.bytes_mut();
            block::write_word(region, base, 0);
            block::write_word(region, base + block::WORD, block::pack(block::PROLOGUE_SIZE, true));
            block::write_word(
                region,
                base + 2 * block::WORD,
                block::pack(block::PROLOGUE_SIZE, true),
            );
            block::write_word(region, base + 3 * block::WORD, block::pack(0, true));
        }
        self.free_list = FreeList::new();
        self.first_block = Some(base + INITIAL_REGION_BYTES);
        log::debug!("initialize: sentinels written at region offset {base}");

        self.extend_region(self.config.chunk_size)?;
        Ok(())
    }

    /// Requests at least `size` payload bytes, returning the payload offset
    /// on success. Returns `None` for `size == 0` or on region exhaustion.
    #[must_use]
    pub fn allocate(&mut self, size: usize) -> Option<usize> {
        self.try_allocate(size).ok()
    }

    /// Typed variant of [`Allocator::allocate`].
    pub fn try_allocate(&mut self, size: usize) -> Result<usize, AllocError> {
        if size == 0 {
            return Err(AllocError::InvalidSize);
        }
        let asize = block::adjust_size(size);

        if let Some(found) = find_fit(self.region.bytes(), &self.free_list, asize) {
            place(self.region.bytes_mut(), &mut self.free_list, found, asize);
            return Ok(found);
        }

        log::warn!("allocate: find_fit missed for {asize} bytes, extending region");
        let extend_size = core::cmp::max(asize, self.config.chunk_size);
        let found = self.extend_region(extend_size)?;
        place(self.region.bytes_mut(), &mut self.free_list, found, asize);
        Ok(found)
    }

    /// Releases a previously-allocated block. A `None` payload is a no-op.
    pub fn free(&mut self, payload: Option<usize>) {
        let Some(payload) = payload else {
            return;
        };
        let size = block::block_size(self.region.bytes(), payload);
        block::set_header_footer(self.region.bytes_mut(), payload, size, false);
        coalesce(self.region.bytes_mut(), &mut self.free_list, payload);
    }

    /// Resizes a previously-allocated block, possibly moving it. Returns
    /// `None` if `new_size == 0` (equivalent to `free`) or on exhaustion.
    #[must_use]
    pub fn reallocate(&mut self, payload: usize, new_size: isize) -> Option<usize> {
        self.try_reallocate(payload, new_size).unwrap_or(None)
    }

    /// Typed variant of [`Allocator::reallocate`].
    pub fn try_reallocate(&mut self, payload: usize, new_size: isize) -> Result<Option<usize>, AllocError> {
        if new_size < 0 {
            return Err(AllocError::InvalidSize);
        }
        if new_size == 0 {
            self.free(Some(payload));
            return Ok(None);
        }
        let new_size = new_size as usize;
        let oldsize = block::block_size(self.region.bytes(), payload);
        let needed = new_size + block::DWORD;

        if needed <= oldsize {
            return Ok(Some(payload));
        }

        let next = block::next_physical(self.region.bytes(), payload);
        if !block::is_allocated(self.region.bytes(), next) {
            let combined = oldsize + block::block_size(self.region.bytes(), next);
            if combined >= needed {
                self.free_list.remove(self.region.bytes_mut(), next);
                block::set_header_footer(self.region.bytes_mut(), payload, combined, true);
                log::debug!("reallocate: grew block@{payload} in place to {combined}");
                return Ok(Some(payload));
            }
        }

        let new_payload = self.try_allocate(new_size)?;
        let old_payload_len = oldsize - block::DWORD;
        let copy_len = core::cmp::min(old_payload_len, new_size);
        self.region.bytes_mut().copy_within(payload..payload + copy_len, new_payload);
        self.free(Some(payload));
        log::debug!("reallocate: moved block@{payload} -> @{new_payload}");
        Ok(Some(new_payload))
    }

    fn extend_region(&mut self, bytes: usize) -> Result<usize, AllocError> {
        let words = bytes.div_ceil(block::WORD);
        let words = if words % 2 == 1 { words + 1 } else { words };
        let size = core::cmp::max(words * block::WORD, block::MIN_BLOCK);

        let payload = self.region.extend(size).ok_or(AllocError::RegionExhausted)?;
        {
            let region = self.region.bytes_mut();
            block::set_header_footer(region, payload, size, false);
            block::write_word(region, payload + size - block::WORD, block::pack(0, true));
        }
        log::debug!("extend_region: +{size} bytes at block@{payload}");

        Ok(coalesce(self.region.bytes_mut(), &mut self.free_list, payload))
    }

    /// Exposes the region's raw bytes for the `checked` consistency checker.
    #[cfg(feature = "checked")]
    pub(crate) fn region_bytes(&self) -> &[u8] {
        self.region.bytes()
    }

    #[cfg(feature = "checked")]
    pub(crate) fn high_water(&self) -> usize {
        self.region.high_water()
    }

    #[cfg(feature = "checked")]
    pub(crate) fn free_list_head(&self) -> Option<usize> {
        self.free_list.head()
    }

    #[cfg(feature = "checked")]
    pub(crate) fn first_block_offset(&self) -> Option<usize> {
        self.first_block
    }
}
