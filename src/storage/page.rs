// ┌─────────────────────────────────────────────────────────────────────────┐
// │ Offset │ Length │ Description                                           │
// │────────┼────────┼───────────────────────────────────────────────────────│
// │   0    │   1    │ PAGE_TYPE (0 = internal, 1 = leaf)                    │
// │   1    │   3    │ reserved, always zero                                 │
// │   4    │   8    │ LSN (u64): last logged modification of this page      │
// │  12    │   4    │ SIZE (i32): entries currently stored                  │
// │  16    │   4    │ MAX_SIZE (i32): entries the body can hold             │
// │  20    │   4    │ PARENT_PAGE (u32): INVALID_PAGE_ID for the root       │
// │  24    │   4    │ PAGE_ID (u32): this page                              │
// │────────┼────────┼───────────────────────────────────────────────────────│
// │  28    │  (PAGE_SIZE - 28)  ┆ Body, owned by the leaf/internal layouts   │
// └─────────────────────────────────────────────────────────────────────────│

// Leaf pages keep one more field before their entries:
// ┌─────────────────────────────────────────────────────────────────────────┐
// │  28    │   4    │ NEXT_PAGE (u32): right sibling, INVALID_PAGE_ID if none│
// │  32    │  ...   │ [key][value] pairs                                    │
// └─────────────────────────────────────────────────────────────────────────│

use crate::error::{IndexError, IndexResult};

pub type PageId = u32;
pub type Lsn = u64;

/// On-disk marker for "no page". Only the codec sees it; in memory an
/// absent page id is `None`.
pub const INVALID_PAGE_ID: PageId = u32::MAX;

pub const PAGE_SIZE: usize = 4096;

pub const PAGE_TYPE_OFFSET: usize   = 0;          // 1 byte
pub const LSN_OFFSET: usize         = 4;          // 8 bytes (u64)
pub const SIZE_OFFSET: usize        = 12;         // 4 bytes (i32)
pub const MAX_SIZE_OFFSET: usize    = 16;         // 4 bytes (i32)
pub const PARENT_PAGE_OFFSET: usize = 20;         // 4 bytes (u32)
pub const PAGE_ID_OFFSET: usize     = 24;         // 4 bytes (u32)
pub const HEADER_SIZE: usize        = 28;         // total header length

pub const NEXT_PAGE_OFFSET: usize   = HEADER_SIZE;
pub const LEAF_HEADER_SIZE: usize   = HEADER_SIZE + 4;

/// Width of a child pointer in an internal page body.
pub const CHILD_POINTER_SIZE: usize = 4;

pub const PAGE_INTERNAL: u8 = 0;
pub const PAGE_LEAF: u8     = 1;

fn read_u32(page: &[u8; PAGE_SIZE], offset: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&page[offset..offset + 4]);
    u32::from_le_bytes(buf)
}

fn write_u32(page: &mut [u8; PAGE_SIZE], offset: usize, value: u32) {
    page[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn read_i32(page: &[u8; PAGE_SIZE], offset: usize) -> i32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&page[offset..offset + 4]);
    i32::from_le_bytes(buf)
}

fn write_i32(page: &mut [u8; PAGE_SIZE], offset: usize, value: i32) {
    page[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn to_raw_id(id: Option<PageId>) -> IndexResult<u32> {
    match id {
        Some(INVALID_PAGE_ID) => Err(IndexError::ReservedPageId(INVALID_PAGE_ID)),
        Some(id) => Ok(id),
        None => Ok(INVALID_PAGE_ID),
    }
}

fn from_raw_id(raw: u32) -> Option<PageId> {
    if raw == INVALID_PAGE_ID { None } else { Some(raw) }
}

/// Read the raw page type byte (internal=0, leaf=1).
pub fn get_page_type_code(page: &[u8; PAGE_SIZE]) -> u8 {
    page[PAGE_TYPE_OFFSET]
}

/// Write the page type byte and clear the reserved bytes after it.
pub fn set_page_type_code(page: &mut [u8; PAGE_SIZE], code: u8) {
    page[PAGE_TYPE_OFFSET] = code;
    page[PAGE_TYPE_OFFSET + 1..LSN_OFFSET].fill(0);
}

pub fn get_lsn(page: &[u8; PAGE_SIZE]) -> Lsn {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&page[LSN_OFFSET..LSN_OFFSET + 8]);
    u64::from_le_bytes(buf)
}

pub fn set_lsn(page: &mut [u8; PAGE_SIZE], lsn: Lsn) {
    page[LSN_OFFSET..LSN_OFFSET + 8].copy_from_slice(&lsn.to_le_bytes());
}

/// Read the number of entries in this page.
pub fn get_size(page: &[u8; PAGE_SIZE]) -> i32 {
    read_i32(page, SIZE_OFFSET)
}

pub fn set_size(page: &mut [u8; PAGE_SIZE], size: i32) {
    write_i32(page, SIZE_OFFSET, size);
}

pub fn get_max_size(page: &[u8; PAGE_SIZE]) -> i32 {
    read_i32(page, MAX_SIZE_OFFSET)
}

pub fn set_max_size(page: &mut [u8; PAGE_SIZE], max_size: i32) {
    write_i32(page, MAX_SIZE_OFFSET, max_size);
}

/// Read the parent page id, `None` if the page is the root.
pub fn get_parent(page: &[u8; PAGE_SIZE]) -> Option<PageId> {
    from_raw_id(read_u32(page, PARENT_PAGE_OFFSET))
}

/// Fails if `parent` is `Some(INVALID_PAGE_ID)`, which would read back as the root.
pub fn set_parent(page: &mut [u8; PAGE_SIZE], parent: Option<PageId>) -> IndexResult<()> {
    write_u32(page, PARENT_PAGE_OFFSET, to_raw_id(parent)?);
    Ok(())
}

pub fn get_page_id(page: &[u8; PAGE_SIZE]) -> PageId {
    read_u32(page, PAGE_ID_OFFSET)
}

pub fn set_page_id(page: &mut [u8; PAGE_SIZE], page_id: PageId) {
    write_u32(page, PAGE_ID_OFFSET, page_id);
}

/// Read a leaf's right sibling, `None` for the rightmost leaf.
pub fn get_next_page(page: &[u8; PAGE_SIZE]) -> Option<PageId> {
    from_raw_id(read_u32(page, NEXT_PAGE_OFFSET))
}

pub fn set_next_page(page: &mut [u8; PAGE_SIZE], next: Option<PageId>) -> IndexResult<()> {
    write_u32(page, NEXT_PAGE_OFFSET, to_raw_id(next)?);
    Ok(())
}

fn max_entries(body_size: usize, entry_width: usize) -> IndexResult<i32> {
    if entry_width == 0 {
        return Err(IndexError::InvalidEntryWidth);
    }
    let slots = body_size / entry_width;
    // One slot is held back for the entry that overflows the page and triggers a split.
    if slots < 2 {
        return Err(IndexError::PageTooSmall { page_size: PAGE_SIZE, entry_width });
    }
    Ok((slots - 1) as i32)
}

/// Capacity of a leaf page storing fixed-width `key_width + value_width` pairs.
pub fn leaf_max_size(key_width: usize, value_width: usize) -> IndexResult<i32> {
    let entry_width = key_width.checked_add(value_width).ok_or(IndexError::PageTooSmall {
        page_size: PAGE_SIZE,
        entry_width: usize::MAX,
    })?;
    max_entries(PAGE_SIZE - LEAF_HEADER_SIZE, entry_width)
}

/// Capacity (in children) of an internal page with fixed-width separator keys.
pub fn internal_max_size(key_width: usize) -> IndexResult<i32> {
    if key_width == 0 {
        return Err(IndexError::InvalidEntryWidth);
    }
    let entry_width = key_width.checked_add(CHILD_POINTER_SIZE).ok_or(IndexError::PageTooSmall {
        page_size: PAGE_SIZE,
        entry_width: usize::MAX,
    })?;
    max_entries(PAGE_SIZE - HEADER_SIZE, entry_width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_fields_do_not_overlap() {
        let mut page = [0u8; PAGE_SIZE];
        set_page_type_code(&mut page, PAGE_LEAF);
        set_lsn(&mut page, u64::MAX);
        set_size(&mut page, -1);
        set_max_size(&mut page, 255);
        set_parent(&mut page, Some(7)).unwrap();
        set_page_id(&mut page, 9);
        set_next_page(&mut page, None).unwrap();

        assert_eq!(get_page_type_code(&page), PAGE_LEAF);
        assert_eq!(&page[1..4], &[0, 0, 0]);
        assert_eq!(get_lsn(&page), u64::MAX);
        assert_eq!(get_size(&page), -1);
        assert_eq!(get_max_size(&page), 255);
        assert_eq!(get_parent(&page), Some(7));
        assert_eq!(get_page_id(&page), 9);
        assert_eq!(get_next_page(&page), None);
    }

    #[test]
    fn root_parent_is_stored_as_invalid_id() {
        let mut page = [0u8; PAGE_SIZE];
        set_parent(&mut page, None).unwrap();
        assert_eq!(&page[PARENT_PAGE_OFFSET..PARENT_PAGE_OFFSET + 4], &[0xFF; 4]);
        assert_eq!(get_parent(&page), None);
    }

    #[test]
    fn invalid_id_cannot_be_stored_as_a_real_page() {
        let mut page = [0u8; PAGE_SIZE];
        set_parent(&mut page, Some(3)).unwrap();
        set_next_page(&mut page, Some(4)).unwrap();

        assert!(matches!(
            set_parent(&mut page, Some(INVALID_PAGE_ID)),
            Err(IndexError::ReservedPageId(INVALID_PAGE_ID))
        ));
        assert!(matches!(
            set_next_page(&mut page, Some(INVALID_PAGE_ID)),
            Err(IndexError::ReservedPageId(INVALID_PAGE_ID))
        ));
        assert_eq!(get_parent(&page), Some(3));
        assert_eq!(get_next_page(&page), Some(4));
    }

    #[test]
    fn capacity_holds_back_one_slot() {
        // (4096 - 32) / 8 = 508 slots
        assert_eq!(leaf_max_size(4, 4).unwrap(), 507);
        // (4096 - 28) / 8 = 508 slots
        assert_eq!(internal_max_size(4).unwrap(), 507);
    }

    #[test]
    fn capacity_rejects_degenerate_widths() {
        assert!(matches!(leaf_max_size(0, 0), Err(IndexError::InvalidEntryWidth)));
        assert!(matches!(internal_max_size(0), Err(IndexError::InvalidEntryWidth)));
        assert!(matches!(
            leaf_max_size(PAGE_SIZE, 0),
            Err(IndexError::PageTooSmall { .. })
        ));
        assert!(matches!(
            leaf_max_size(usize::MAX, 1),
            Err(IndexError::PageTooSmall { .. })
        ));
    }
}
