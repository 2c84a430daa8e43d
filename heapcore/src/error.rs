//! Typed error surface for the `try_*` allocator methods. The sentinel-style
//! public surface (`allocate`, `free`, `reallocate`) is defined in terms of
//! these and simply discards the distinction.

/// Failure modes of the allocator's fallible operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AllocError {
    /// The region adapter denied an extension request.
    #[error("region adapter denied the extension request")]
    RegionExhausted,
    /// The caller supplied a zero or negative size where a positive one was required.
    #[error("requested size is invalid")]
    InvalidSize,
}
