//! The external collaborator that owns the raw growable bytes the allocator
//! writes into. The allocator is generic over [`HeapRegion`]; a `no_std`
//! embedder supplies their own (a static array, an OS `sbrk`-equivalent),
//! while [`GrowableRegion`] is a hosted reference implementation suitable for
//! tests and `std` embedding.

/// A linearly-growable byte region. The region only grows: there is no
/// operation to shrink or reclaim previously-extended bytes.
pub trait HeapRegion {
    /// Current size of the region in bytes.
    fn high_water(&self) -> usize;

    /// Appends `bytes` to the region, returning the offset of the first new
    /// byte, or `None` if the request cannot be satisfied.
    fn extend(&mut self, bytes: usize) -> Option<usize>;

    /// Borrows the region's bytes for reading.
    fn bytes(&self) -> &[u8];

    /// Borrows the region's bytes for writing.
    fn bytes_mut(&mut self) -> &mut [u8];
}

/// A [`HeapRegion`] backed by a heap-allocated byte buffer, growing via
/// `Vec::resize`. An optional cap lets tests exercise the out-of-region
/// failure path deterministically.
#[cfg(feature = "std")]
pub struct GrowableRegion {
    data: std::vec::Vec<u8>,
    cap: Option<usize>,
}

#[cfg(feature = "std")]
impl GrowableRegion {
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: std::vec::Vec::new(),
            cap: None,
        }
    }

    /// Creates a region that refuses to grow past `cap` bytes.
    #[must_use]
    pub fn with_capacity_limit(cap: usize) -> Self {
        Self {
            data: std::vec::Vec::new(),
            cap: Some(cap),
        }
    }
}

#[cfg(feature = "std")]
impl Default for GrowableRegion {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl HeapRegion for GrowableRegion {
    fn high_water(&self) -> usize {
        self.data.len()
    }

    fn extend(&mut self, bytes: usize) -> Option<usize> {
        let old = self.data.len();
        let new_len = old.checked_add(bytes)?;
        if let Some(cap) = self.cap {
            if new_len > cap {
                log::warn!("region: extend to {new_len} exceeds cap {cap}");
                return None;
            }
        }
        self.data.resize(new_len, 0);
        Some(old)
    }

    fn bytes(&self) -> &[u8] {
        &self.data
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn extend_returns_old_high_water() {
        let mut region = GrowableRegion::new();
        assert_eq!(region.extend(16), Some(0));
        assert_eq!(region.high_water(), 16);
        assert_eq!(region.extend(8), Some(16));
        assert_eq!(region.high_water(), 24);
    }

    #[test]
    fn extend_past_cap_fails() {
        let mut region = GrowableRegion::with_capacity_limit(32);
        assert_eq!(region.extend(16), Some(0));
        assert_eq!(region.extend(32), None);
        assert_eq!(region.high_water(), 16);
    }
}
