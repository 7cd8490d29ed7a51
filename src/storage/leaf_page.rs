use std::fmt::Debug;
use log::debug;
use crate::error::{IndexError, IndexResult};
use crate::storage::page::PageId;
use crate::storage::tree_page::{BPlusTreePage, PageType, TreePageHeader};

/// Leaf page body: key/value pairs sorted by key, plus a link to the right
/// sibling so range scans can walk the leaf level.
#[derive(Debug, Clone)]
pub struct LeafPage<K, V> {
    header: TreePageHeader,
    next_page_id: Option<PageId>,
    entries: Vec<(K, V)>,
}

impl<K: Ord + Clone + Debug, V> LeafPage<K, V> {
    pub fn new(page_id: PageId, parent_page_id: Option<PageId>, max_size: i32) -> Self {
        LeafPage {
            header: TreePageHeader::new(PageType::Leaf, page_id, parent_page_id, max_size),
            next_page_id: None,
            entries: Vec::new(),
        }
    }

    pub fn get_next_page_id(&self) -> Option<PageId> {
        self.next_page_id
    }

    pub fn set_next_page_id(&mut self, next_page_id: Option<PageId>) {
        self.next_page_id = next_page_id;
    }

    pub fn key_at(&self, index: usize) -> Option<&K> {
        self.entries.get(index).map(|(k, _)| k)
    }

    pub fn entries(&self) -> &[(K, V)] {
        &self.entries
    }

    /// First slot whose key is >= `key`.
    pub fn key_index(&self, key: &K) -> usize {
        self.entries.partition_point(|(k, _)| k < key)
    }

    pub fn lookup(&self, key: &K) -> Option<&V> {
        self.entries
            .binary_search_by(|(k, _)| k.cmp(key))
            .ok()
            .map(|i| &self.entries[i].1)
    }

    /// Insert in key order and return the new size. The page may end up
    /// over capacity; the caller splits it afterwards.
    pub fn insert(&mut self, key: K, value: V) -> IndexResult<i32> {
        match self.entries.binary_search_by(|(k, _)| k.cmp(&key)) {
            Ok(_) => Err(IndexError::DuplicateKey(format!("{:?}", key))),
            Err(pos) => {
                self.entries.insert(pos, (key, value));
                self.header.increase_size(1);
                Ok(self.header.get_size())
            }
        }
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let pos = self.entries.binary_search_by(|(k, _)| k.cmp(key)).ok()?;
        let (_, value) = self.entries.remove(pos);
        self.header.increase_size(-1);
        Some(value)
    }

    /// Split: move the upper half of the entries into the empty `recipient`,
    /// which becomes this page's right sibling.
    pub fn move_half_to(&mut self, recipient: &mut LeafPage<K, V>) {
        let split_index = self.entries.len() / 2;
        let moved = self.entries.split_off(split_index);
        let count = moved.len() as i32;
        debug!(
            "Leaf {} moving {} entries to new sibling {}.",
            self.header.get_page_id(),
            count,
            recipient.header.get_page_id()
        );
        recipient.entries.extend(moved);
        recipient.header.increase_size(count);
        self.header.increase_size(-count);

        recipient.next_page_id = self.next_page_id;
        self.next_page_id = Some(recipient.header.get_page_id());
    }

    /// Merge: append everything into the left sibling `recipient`, which
    /// takes over this page's sibling link.
    pub fn move_all_to(&mut self, recipient: &mut LeafPage<K, V>) {
        let count = self.entries.len() as i32;
        debug!(
            "Leaf {} merging {} entries into {}.",
            self.header.get_page_id(),
            count,
            recipient.header.get_page_id()
        );
        recipient.entries.append(&mut self.entries);
        recipient.header.increase_size(count);
        self.header.increase_size(-count);
        recipient.next_page_id = self.next_page_id;
    }

    /// Borrow: give the first entry to the left sibling `recipient`.
    /// Returns this page's new first key, the parent's new separator, or
    /// `None` without moving anything if this page has fewer than two entries.
    pub fn move_first_to_end_of(&mut self, recipient: &mut LeafPage<K, V>) -> Option<K> {
        if self.entries.len() < 2 {
            return None;
        }
        let entry = self.entries.remove(0);
        self.header.increase_size(-1);
        recipient.entries.push(entry);
        recipient.header.increase_size(1);
        self.key_at(0).cloned()
    }

    /// Borrow: give the last entry to the right sibling `recipient`.
    /// Returns the recipient's new first key, the parent's new separator, or
    /// `None` without moving anything if this page has fewer than two entries.
    pub fn move_last_to_front_of(&mut self, recipient: &mut LeafPage<K, V>) -> Option<K> {
        if self.entries.len() < 2 {
            return None;
        }
        let entry = self.entries.pop()?;
        self.header.increase_size(-1);
        let key = entry.0.clone();
        recipient.entries.insert(0, entry);
        recipient.header.increase_size(1);
        Some(key)
    }
}

impl<K, V> BPlusTreePage for LeafPage<K, V> {
    fn header(&self) -> &TreePageHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut TreePageHeader {
        &mut self.header
    }
}
