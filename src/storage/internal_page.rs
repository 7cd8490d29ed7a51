use log::debug;
use crate::error::{IndexError, IndexResult};
use crate::storage::page::PageId;
use crate::storage::tree_page::{BPlusTreePage, PageType, TreePageHeader};

/// Internal page body: `n` child pointers separated by `n - 1` keys.
///
/// `keys[i]` divides `children[i]` from `children[i + 1]`: every key under
/// `children[i + 1]` is >= `keys[i]`. The header size counts children.
#[derive(Debug, Clone)]
pub struct InternalPage<K> {
    header: TreePageHeader,
    keys: Vec<K>,
    children: Vec<PageId>,
}

impl<K: Ord + Clone> InternalPage<K> {
    pub fn new(page_id: PageId, parent_page_id: Option<PageId>, max_size: i32) -> Self {
        InternalPage {
            header: TreePageHeader::new(PageType::Internal, page_id, parent_page_id, max_size),
            keys: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn children(&self) -> &[PageId] {
        &self.children
    }

    pub fn value_at(&self, index: usize) -> Option<PageId> {
        self.children.get(index).copied()
    }

    /// Separator in front of child `index`; child 0 has none.
    pub fn key_at(&self, index: usize) -> Option<&K> {
        index.checked_sub(1).and_then(|i| self.keys.get(i))
    }

    pub fn value_index(&self, child: PageId) -> Option<usize> {
        self.children.iter().position(|c| *c == child)
    }

    /// Child whose subtree may contain `key`.
    pub fn lookup(&self, key: &K) -> Option<PageId> {
        let index = self.keys.partition_point(|k| k <= key);
        self.value_at(index)
    }

    /// Turn an empty page into a root over two children after the old root split.
    pub fn populate_new_root(&mut self, old_child: PageId, key: K, new_child: PageId) {
        debug!(
            "New root {} over children {} and {}.",
            self.header.get_page_id(),
            old_child,
            new_child
        );
        self.keys = vec![key];
        self.children = vec![old_child, new_child];
        self.header.set_size(2);
    }

    /// Place `new_child` right after `old_child`, separated by `key`.
    pub fn insert_node_after(
        &mut self,
        old_child: PageId,
        key: K,
        new_child: PageId,
    ) -> IndexResult<i32> {
        let index = self
            .value_index(old_child)
            .ok_or(IndexError::ChildNotFound(old_child))?;
        self.keys.insert(index, key);
        self.children.insert(index + 1, new_child);
        self.header.increase_size(1);
        Ok(self.header.get_size())
    }

    /// Drop child `index` together with the separator next to it and return
    /// the removed child, or `None` if `index` is out of range.
    pub fn remove(&mut self, index: usize) -> Option<PageId> {
        if index >= self.children.len() {
            return None;
        }
        let child = self.children.remove(index);
        if !self.keys.is_empty() {
            self.keys.remove(index.saturating_sub(1));
        }
        self.header.increase_size(-1);
        Some(child)
    }

    /// Empty a root that is down to one child and hand that child back so
    /// it can become the new root.
    pub fn remove_and_return_only_child(&mut self) -> Option<PageId> {
        if self.children.len() != 1 {
            return None;
        }
        let child = self.children.pop();
        self.keys.clear();
        self.header.set_size(0);
        debug!(
            "Internal root {} collapsed onto child {:?}.",
            self.header.get_page_id(),
            child
        );
        child
    }

    /// Split: move the upper half of the children into the empty `recipient`.
    /// Returns the separator that must be pushed into the parent.
    pub fn move_half_to(&mut self, recipient: &mut InternalPage<K>) -> Option<K> {
        let total = self.children.len();
        if total < 2 {
            return None;
        }
        let split_index = (total + 1) / 2;
        let moved_children = self.children.split_off(split_index);
        let moved_keys = self.keys.split_off(split_index);
        let separator = self.keys.pop();
        let count = moved_children.len() as i32;
        debug!(
            "Internal {} moving {} children to new sibling {}.",
            self.header.get_page_id(),
            count,
            recipient.header.get_page_id()
        );

        recipient.children.extend(moved_children);
        recipient.keys.extend(moved_keys);
        recipient.header.increase_size(count);
        self.header.increase_size(-count);
        separator
    }

    /// Merge into the left sibling `recipient`; `middle_key` is the parent's
    /// separator between the two pages.
    pub fn move_all_to(&mut self, recipient: &mut InternalPage<K>, middle_key: K) {
        let count = self.children.len() as i32;
        if count == 0 {
            return;
        }
        debug!(
            "Internal {} merging {} children into {}.",
            self.header.get_page_id(),
            count,
            recipient.header.get_page_id()
        );
        recipient.keys.push(middle_key);
        recipient.keys.append(&mut self.keys);
        recipient.children.append(&mut self.children);
        recipient.header.increase_size(count);
        self.header.increase_size(-count);
    }

    /// Borrow: give the first child to the left sibling `recipient`, with
    /// `middle_key` coming down from the parent. Returns the parent's new separator.
    pub fn move_first_to_end_of(
        &mut self,
        recipient: &mut InternalPage<K>,
        middle_key: K,
    ) -> Option<K> {
        if self.children.len() < 2 {
            return None;
        }
        let child = self.children.remove(0);
        let separator = self.keys.remove(0);
        self.header.increase_size(-1);
        recipient.keys.push(middle_key);
        recipient.children.push(child);
        recipient.header.increase_size(1);
        Some(separator)
    }

    /// Borrow: give the last child to the right sibling `recipient`, with
    /// `middle_key` coming down from the parent. Returns the parent's new separator.
    pub fn move_last_to_front_of(
        &mut self,
        recipient: &mut InternalPage<K>,
        middle_key: K,
    ) -> Option<K> {
        if self.children.len() < 2 {
            return None;
        }
        let child = self.children.pop()?;
        let separator = self.keys.pop();
        self.header.increase_size(-1);
        recipient.keys.insert(0, middle_key);
        recipient.children.insert(0, child);
        recipient.header.increase_size(1);
        separator
    }
}

impl<K> BPlusTreePage for InternalPage<K> {
    fn header(&self) -> &TreePageHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut TreePageHeader {
        &mut self.header
    }
}
