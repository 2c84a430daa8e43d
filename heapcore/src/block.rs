//! Pure address and packing helpers over a byte-offset view of the heap region.
//!
//! Every function here takes a `payload` as a `usize` byte offset from the
//! region's base rather than a native pointer, so the allocator never holds
//! more than one live borrow of the region at a time.

/// Width of a header/footer/link word.
pub(crate) const WORD: usize = 4;
/// Width of a double word (header + footer, or the two free-list link fields).
pub(crate) const DWORD: usize = 8;
/// Smallest legal block size: header, two link words, footer.
pub(crate) const MIN_BLOCK: usize = 16;
/// Size of the prologue's header+footer pair (its only content).
pub(crate) const PROLOGUE_SIZE: usize = 8;

const ALLOC_BIT: u32 = 0x1;
const SIZE_MASK: u32 = !0x7u32;

#[inline]
pub(crate) const fn pack(size: usize, allocated: bool) -> u32 {
    size as u32 | (allocated as u32)
}

#[inline]
pub(crate) const fn unpack_size(word: u32) -> usize {
    (word & SIZE_MASK) as usize
}

#[inline]
pub(crate) const fn unpack_alloc(word: u32) -> bool {
    word & ALLOC_BIT != 0
}

#[inline]
pub(crate) fn read_word(region: &[u8], offset: usize) -> u32 {
    let mut buf = [0u8; WORD];
    buf.copy_from_slice(&region[offset..offset + WORD]);
    u32::from_ne_bytes(buf)
}

#[inline]
pub(crate) fn write_word(region: &mut [u8], offset: usize, value: u32) {
    region[offset..offset + WORD].copy_from_slice(&value.to_ne_bytes());
}

/// `None` is encoded as `0`: offset 0 always lies inside the alignment pad,
/// so no real block can ever sit there.
#[inline]
pub(crate) fn read_link(region: &[u8], offset: usize) -> Option<usize> {
    match read_word(region, offset) {
        0 => None,
        raw => Some(raw as usize),
    }
}

#[inline]
pub(crate) fn write_link(region: &mut [u8], offset: usize, value: Option<usize>) {
    write_word(region, offset, value.map_or(0, |v| v as u32));
}

#[inline]
pub(crate) const fn header_offset(payload: usize) -> usize {
    payload - WORD
}

#[inline]
pub(crate) fn block_size(region: &[u8], payload: usize) -> usize {
    unpack_size(read_word(region, header_offset(payload)))
}

#[inline]
pub(crate) fn is_allocated(region: &[u8], payload: usize) -> bool {
    unpack_alloc(read_word(region, header_offset(payload)))
}

#[inline]
pub(crate) fn footer_offset(region: &[u8], payload: usize) -> usize {
    payload + block_size(region, payload) - DWORD
}

#[inline]
pub(crate) fn next_physical(region: &[u8], payload: usize) -> usize {
    payload + block_size(region, payload)
}

/// Reads the footer word immediately preceding this block's header to find
/// where the previous physical block starts.
#[inline]
pub(crate) fn prev_physical(region: &[u8], payload: usize) -> usize {
    let prev_footer = header_offset(payload) - WORD;
    let prev_size = unpack_size(read_word(region, prev_footer));
    payload - prev_size
}

/// Writes a matching header and footer for a block of the given size.
pub(crate) fn set_header_footer(region: &mut [u8], payload: usize, size: usize, allocated: bool) {
    let word = pack(size, allocated);
    write_word(region, header_offset(payload), word);
    write_word(region, payload + size - DWORD, word);
}

#[inline]
pub(crate) const fn prev_link_offset(payload: usize) -> usize {
    payload
}

#[inline]
pub(crate) const fn next_link_offset(payload: usize) -> usize {
    payload + WORD
}

#[inline]
pub(crate) fn read_prev_link(region: &[u8], payload: usize) -> Option<usize> {
    read_link(region, prev_link_offset(payload))
}

#[inline]
pub(crate) fn read_next_link(region: &[u8], payload: usize) -> Option<usize> {
    read_link(region, next_link_offset(payload))
}

#[inline]
pub(crate) fn write_prev_link(region: &mut [u8], payload: usize, value: Option<usize>) {
    write_link(region, prev_link_offset(payload), value);
}

#[inline]
pub(crate) fn write_next_link(region: &mut [u8], payload: usize, value: Option<usize>) {
    write_link(region, next_link_offset(payload), value);
}

/// Rounds a requested payload size up to the allocator's block size, per the
/// `size + overhead, rounded to 8` rule (`size <= 8` always yields `MIN_BLOCK`).
#[inline]
pub(crate) fn adjust_size(size: usize) -> usize {
    let with_overhead = size + DWORD;
    let rounded = with_overhead.div_ceil(DWORD) * DWORD;
    core::cmp::max(MIN_BLOCK, rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_and_unpack_roundtrip() {
        let word = pack(40, true);
        assert_eq!(unpack_size(word), 40);
        assert!(unpack_alloc(word));

        let word = pack(4096, false);
        assert_eq!(unpack_size(word), 4096);
        assert!(!unpack_alloc(word));
    }

    #[test]
    fn word_read_write_roundtrip() {
        let mut region = [0u8; 16];
        write_word(&mut region, 4, pack(16, true));
        assert_eq!(read_word(&region, 4), pack(16, true));
    }

    #[test]
    fn link_zero_is_none() {
        let mut region = [0u8; 16];
        write_link(&mut region, 4, None);
        assert_eq!(read_link(&region, 4), None);
        write_link(&mut region, 4, Some(24));
        assert_eq!(read_link(&region, 4), Some(24));
    }

    #[test]
    fn adjust_size_matches_boundary_cases() {
        assert_eq!(adjust_size(0), 16);
        assert_eq!(adjust_size(1), 16);
        assert_eq!(adjust_size(8), 16);
        assert_eq!(adjust_size(9), 24);
        assert_eq!(adjust_size(32), 40);
        assert_eq!(adjust_size(100), 112);
    }

    #[test]
    fn header_footer_agree_after_set() {
        let mut region = [0u8; 32];
        set_header_footer(&mut region, 4, 24, false);
        assert_eq!(read_word(&region, header_offset(4)), pack(24, false));
        assert_eq!(read_word(&region, 4 + 24 - DWORD), pack(24, false));
    }
}
