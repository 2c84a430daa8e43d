//! Merges a just-freed or just-extended block with physically adjacent free
//! neighbors, keeping boundary tags and free-list membership in sync.

use crate::block;
use crate::free_list::FreeList;

/// Coalesces `block` with its free physical neighbors, if any, and (re-)inserts
/// the resulting block into `list`. Returns the payload of the surviving block,
/// which may be `block` itself or a preceding block it was merged into.
///
/// Relies on the prologue/epilogue sentinels always reporting "allocated" so
/// the boundary cases need no special-casing; the `prev == block` guard below
/// covers the pathological case of the very first real block, whose computed
/// "previous" would otherwise loop back on itself.
pub(crate) fn coalesce(region: &mut [u8], list: &mut FreeList, block: usize) -> usize {
    let prev = block::prev_physical(region, block);
    let prev_alloc = prev == block || block::is_allocated(region, prev);
    let next = block::next_physical(region, block);
    let next_alloc = block::is_allocated(region, next);

    let result = match (prev_alloc, next_alloc) {
        (true, true) => {
            list.insert(region, block);
            block
        }
        (true, false) => {
            list.remove(region, next);
            let size = block::block_size(region, block) + block::block_size(region, next);
            block::set_header_footer(region, block, size, false);
            list.insert(region, block);
            block
        }
        (false, true) => {
            list.remove(region, prev);
            let size = block::block_size(region, prev) + block::block_size(region, block);
            block::set_header_footer(region, prev, size, false);
            list.insert(region, prev);
            prev
        }
        (false, false) => {
            list.remove(region, prev);
            list.remove(region, next);
            let size = block::block_size(region, prev)
                + block::block_size(region, block)
                + block::block_size(region, next);
            block::set_header_footer(region, prev, size, false);
            list.insert(region, prev);
            prev
        }
    };

    log::debug!("coalesce: block@{block} -> @{result}");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    // Lays out pad(0..4) + prologue(4..12, size 8 alloc) + one real free
    // block of `size` starting at payload 16, with the epilogue header
    // occupying the block-sized region's last word (at `16 + size - WORD`).
    fn region_with_one_free_block(size: usize) -> std::vec::Vec<u8> {
        let total = 16 + size;
        let mut region = vec![0u8; total];
        block::write_word(&mut region, 4, block::pack(8, true));
        block::write_word(&mut region, 8, block::pack(8, true));
        block::set_header_footer(&mut region, 16, size, false);
        block::write_word(&mut region, 16 + size - block::WORD, block::pack(0, true));
        region
    }

    #[test]
    fn no_free_neighbors_just_inserts() {
        let mut region = region_with_one_free_block(32);
        let mut list = FreeList::new();
        let result = coalesce(&mut region, &mut list, 16);
        assert_eq!(result, 16);
        assert_eq!(list.head(), Some(16));
    }

    #[test]
    fn merges_with_free_next_neighbor() {
        let mut region = vec![0u8; 16 + 24 + 24];
        block::write_word(&mut region, 4, block::pack(8, true));
        block::write_word(&mut region, 8, block::pack(8, true));
        block::set_header_footer(&mut region, 16, 24, false);
        block::set_header_footer(&mut region, 40, 24, false);
        block::write_word(&mut region, 64 - block::WORD, block::pack(0, true));

        let mut list = FreeList::new();
        list.insert(&mut region, 40);

        let result = coalesce(&mut region, &mut list, 16);
        assert_eq!(result, 16);
        assert_eq!(block::block_size(&region, 16), 48);
        assert_eq!(list.head(), Some(16));
    }

    #[test]
    fn merges_with_free_prev_neighbor() {
        let mut region = vec![0u8; 16 + 24 + 24];
        block::write_word(&mut region, 4, block::pack(8, true));
        block::write_word(&mut region, 8, block::pack(8, true));
        block::set_header_footer(&mut region, 16, 24, false);
        block::set_header_footer(&mut region, 40, 24, false);
        block::write_word(&mut region, 64 - block::WORD, block::pack(0, true));

        let mut list = FreeList::new();
        list.insert(&mut region, 16);

        let result = coalesce(&mut region, &mut list, 40);
        assert_eq!(result, 16);
        assert_eq!(block::block_size(&region, 16), 48);
    }

    #[test]
    fn merges_both_neighbors() {
        let mut region = vec![0u8; 16 + 24 + 16 + 24];
        block::write_word(&mut region, 4, block::pack(8, true));
        block::write_word(&mut region, 8, block::pack(8, true));
        block::set_header_footer(&mut region, 16, 24, false);
        block::set_header_footer(&mut region, 40, 16, true);
        block::set_header_footer(&mut region, 56, 24, false);
        block::write_word(&mut region, 80 - block::WORD, block::pack(0, true));

        let mut list = FreeList::new();
        list.insert(&mut region, 16);
        list.insert(&mut region, 56);

        // Free the middle block, then coalesce it.
        block::set_header_footer(&mut region, 40, 16, false);
        let result = coalesce(&mut region, &mut list, 40);

        assert_eq!(result, 16);
        assert_eq!(block::block_size(&region, 16), 64);
    }
}
