use log::{debug, trace};
use crate::error::{IndexError, IndexResult};
use crate::storage::page::{self, Lsn, PageId, PAGE_INTERNAL, PAGE_LEAF, PAGE_SIZE};

/// Which body layout follows the common header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageType {
    Internal,
    Leaf,
}

impl PageType {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            PAGE_INTERNAL => Some(PageType::Internal),
            PAGE_LEAF => Some(PageType::Leaf),
            _ => None,
        }
    }

    pub fn to_code(&self) -> u8 {
        match self {
            PageType::Internal => PAGE_INTERNAL,
            PageType::Leaf => PAGE_LEAF,
        }
    }
}

/// The kind of tree operation a latch-crabbing traversal is performing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Get,
    Insert,
    Delete,
}

impl Operation {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Operation::Get),
            1 => Some(Operation::Insert),
            2 => Some(Operation::Delete),
            _ => None,
        }
    }

    pub fn to_code(&self) -> u8 {
        match self {
            Operation::Get => 0,
            Operation::Insert => 1,
            Operation::Delete => 2,
        }
    }
}

/// Header shared by every B+-Tree page, leaf or internal.
///
/// The tree keeps `0 <= size <= max_size` outside of a mutation; the
/// setters here store whatever they are given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreePageHeader {
    page_type: PageType,
    lsn: Lsn,
    size: i32,
    max_size: i32,
    parent_page_id: Option<PageId>,
    page_id: PageId,
}

impl TreePageHeader {
    /// Format a fresh, empty header. `parent_page_id` is `None` for the root.
    pub fn new(
        page_type: PageType,
        page_id: PageId,
        parent_page_id: Option<PageId>,
        max_size: i32,
    ) -> Self {
        debug!(
            "Formatting {:?} page {} (parent {:?}, max_size {}).",
            page_type, page_id, parent_page_id, max_size
        );
        TreePageHeader {
            page_type,
            lsn: 0,
            size: 0,
            max_size,
            parent_page_id,
            page_id,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.page_type == PageType::Leaf
    }

    pub fn is_root(&self) -> bool {
        self.parent_page_id.is_none()
    }

    pub fn get_page_type(&self) -> PageType {
        self.page_type
    }

    /// Only meaningful while the page is being formatted.
    pub fn set_page_type(&mut self, page_type: PageType) {
        self.page_type = page_type;
    }

    pub fn get_size(&self) -> i32 {
        self.size
    }

    pub fn set_size(&mut self, size: i32) {
        self.size = size;
    }

    /// Add `amount` (negative to shrink) to the entry count. Not clamped;
    /// wraps on overflow.
    pub fn increase_size(&mut self, amount: i32) {
        self.size = self.size.wrapping_add(amount);
    }

    pub fn get_max_size(&self) -> i32 {
        self.max_size
    }

    pub fn set_max_size(&mut self, max_size: i32) {
        self.max_size = max_size;
    }

    /// Fewest entries this page may hold and stay valid.
    ///
    /// A root leaf must keep one entry; emptying it is handled by the index
    /// header instead. An internal root needs two children, below that the
    /// tree loses a level. Every other page stays at least half full.
    pub fn get_min_size(&self) -> i32 {
        if self.is_root() && self.is_leaf() {
            return 1;
        }
        if self.is_root() {
            2
        } else {
            (self.max_size + 1) / 2
        }
    }

    pub fn get_parent_page_id(&self) -> Option<PageId> {
        self.parent_page_id
    }

    pub fn set_parent_page_id(&mut self, parent_page_id: Option<PageId>) {
        self.parent_page_id = parent_page_id;
    }

    pub fn get_page_id(&self) -> PageId {
        self.page_id
    }

    pub fn set_page_id(&mut self, page_id: PageId) {
        self.page_id = page_id;
    }

    pub fn get_lsn(&self) -> Lsn {
        self.lsn
    }

    pub fn set_lsn(&mut self, lsn: Lsn) {
        self.lsn = lsn;
    }

    /// Whether `op` passing through this page can never split or merge it,
    /// so latches held on its ancestors may be released.
    pub fn is_safe(&self, op: Operation) -> bool {
        let safe = match op {
            Operation::Get => true,
            Operation::Insert => self.size < self.max_size,
            Operation::Delete => self.size > self.get_min_size(),
        };
        trace!(
            "is_safe({:?}) on page {}: size={} max={} -> {}",
            op, self.page_id, self.size, self.max_size, safe
        );
        safe
    }

    /// Same as [`is_safe`](Self::is_safe) for a raw operation code; codes
    /// that name no operation are never safe.
    pub fn is_safe_code(&self, code: u8) -> bool {
        match Operation::from_code(code) {
            Some(op) => self.is_safe(op),
            None => false,
        }
    }

    /// Decode the header region of a page buffer.
    pub fn read_from(data: &[u8; PAGE_SIZE]) -> IndexResult<Self> {
        let code = page::get_page_type_code(data);
        let page_type = PageType::from_code(code).ok_or(IndexError::UnknownPageType(code))?;
        Ok(TreePageHeader {
            page_type,
            lsn: page::get_lsn(data),
            size: page::get_size(data),
            max_size: page::get_max_size(data),
            parent_page_id: page::get_parent(data),
            page_id: page::get_page_id(data),
        })
    }

    /// Encode into the header region, leaving the body untouched. A parent
    /// of `Some(INVALID_PAGE_ID)` is rejected before anything is written.
    pub fn write_to(&self, data: &mut [u8; PAGE_SIZE]) -> IndexResult<()> {
        page::set_parent(data, self.parent_page_id)?;
        page::set_page_type_code(data, self.page_type.to_code());
        page::set_lsn(data, self.lsn);
        page::set_size(data, self.size);
        page::set_max_size(data, self.max_size);
        page::set_page_id(data, self.page_id);
        Ok(())
    }
}

/// Anything laid out on top of a [`TreePageHeader`].
///
/// Leaf and internal pages only supply access to their header; the
/// queries the traversal needs come for free.
pub trait BPlusTreePage {
    fn header(&self) -> &TreePageHeader;
    fn header_mut(&mut self) -> &mut TreePageHeader;

    fn is_leaf(&self) -> bool {
        self.header().is_leaf()
    }

    fn is_root(&self) -> bool {
        self.header().is_root()
    }

    fn get_size(&self) -> i32 {
        self.header().get_size()
    }

    fn get_max_size(&self) -> i32 {
        self.header().get_max_size()
    }

    fn get_min_size(&self) -> i32 {
        self.header().get_min_size()
    }

    fn get_page_id(&self) -> PageId {
        self.header().get_page_id()
    }

    fn get_parent_page_id(&self) -> Option<PageId> {
        self.header().get_parent_page_id()
    }

    fn set_parent_page_id(&mut self, parent_page_id: Option<PageId>) {
        self.header_mut().set_parent_page_id(parent_page_id);
    }

    fn get_lsn(&self) -> Lsn {
        self.header().get_lsn()
    }

    fn set_lsn(&mut self, lsn: Lsn) {
        self.header_mut().set_lsn(lsn);
    }

    fn is_safe(&self, op: Operation) -> bool {
        self.header().is_safe(op)
    }
}

impl BPlusTreePage for TreePageHeader {
    fn header(&self) -> &TreePageHeader {
        self
    }

    fn header_mut(&mut self) -> &mut TreePageHeader {
        self
    }
}
