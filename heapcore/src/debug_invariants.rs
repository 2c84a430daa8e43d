//! Walks the heap region and the free list to assert every invariant from
//! the crate's data model. Gated behind the `checked` feature so production
//! builds pay nothing for it; the test suite enables it to catch invariant
//! violations close to the operation that caused them.

use crate::allocator::Allocator;
use crate::block;
use crate::region::HeapRegion;
use std::collections::HashSet;

/// Asserts the heap-walk, tag-agreement, alignment, size-minimum,
/// no-adjacent-free, free-list/alloc-bit and free-list-symmetry invariants.
///
/// # Panics
/// Panics on the first invariant that does not hold.
pub fn check<R: HeapRegion>(alloc: &Allocator<R>) {
    let region = alloc.region_bytes();
    let Some(first) = alloc.first_block_offset() else {
        return;
    };
    let high_water = alloc.high_water();

    let mut reachable_free = HashSet::new();
    let mut node = alloc.free_list_head();
    while let Some(b) = node {
        assert!(reachable_free.insert(b), "free list cycle detected at block@{b}");
        let next = block::read_next_link(region, b);
        if let Some(n) = next {
            assert_eq!(
                block::read_prev_link(region, n),
                Some(b),
                "free-list link asymmetry between @{b} and @{n}"
            );
        }
        node = next;
    }

    let mut cursor = first;
    let mut prev_was_free = false;
    while cursor < high_water {
        let size = block::block_size(region, cursor);
        assert!(size % 8 == 0, "block@{cursor} size {size} is not a multiple of 8");
        assert!(size >= block::MIN_BLOCK, "block@{cursor} size {size} below minimum");
        assert_eq!(cursor % 8, 0, "block@{cursor} payload is not 8-byte aligned");

        let header = block::read_word(region, block::header_offset(cursor));
        let footer = block::read_word(region, block::footer_offset(region, cursor));
        assert_eq!(header, footer, "header/footer disagree at block@{cursor}");

        let is_free = !block::unpack_alloc(header);
        assert_eq!(
            is_free,
            reachable_free.contains(&cursor),
            "free-list/alloc-bit mismatch at block@{cursor}"
        );
        assert!(!(is_free && prev_was_free), "adjacent free blocks at block@{cursor}");

        prev_was_free = is_free;
        cursor = block::next_physical(region, cursor);
    }

    assert_eq!(
        cursor, high_water,
        "heap walk has a gap or overlap before the epilogue"
    );
}
