use aeroindex::storage::{BPlusTreePage, InternalPage, LeafPage, Operation, TreePageHeader};

/// Walk a root-to-leaf path the way a crabbing traversal would: latch each
/// page in turn and drop every ancestor latch once the new page is safe.
/// Returns the page ids still latched when the leaf is reached.
fn latched_at_leaf(path: &[&dyn BPlusTreePage], op: Operation) -> Vec<u32> {
    let mut held: Vec<u32> = Vec::new();
    for page in path {
        held.push(page.get_page_id());
        if page.is_safe(op) {
            held.retain(|id| *id == page.get_page_id());
        }
    }
    held
}

fn three_level_tree(
    root_children: usize,
    inner_children: usize,
    leaf_entries: usize,
) -> (InternalPage<i32>, InternalPage<i32>, LeafPage<i32, i32>) {
    let mut root = InternalPage::new(1, None, 4);
    root.populate_new_root(2, 100, 90);
    for i in 2..root_children {
        root.insert_node_after(90 + i as u32 - 2, 100 * i as i32, 90 + i as u32 - 1).unwrap();
    }

    let mut inner = InternalPage::new(2, Some(1), 4);
    inner.populate_new_root(3, 10, 80);
    for i in 2..inner_children {
        inner.insert_node_after(80 + i as u32 - 2, 10 * i as i32, 80 + i as u32 - 1).unwrap();
    }

    let mut leaf = LeafPage::new(3, Some(2), 4);
    for k in 0..leaf_entries as i32 {
        leaf.insert(k, k).unwrap();
    }
    (root, inner, leaf)
}

#[test]
fn reads_keep_only_the_current_latch() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (root, inner, leaf) = three_level_tree(4, 4, 4);
    let path: [&dyn BPlusTreePage; 3] = [&root, &inner, &leaf];
    assert_eq!(latched_at_leaf(&path, Operation::Get), vec![3]);
}

#[test]
fn insert_into_leaf_with_room_releases_ancestors() {
    let (root, inner, leaf) = three_level_tree(4, 4, 2);
    let path: [&dyn BPlusTreePage; 3] = [&root, &inner, &leaf];
    assert_eq!(latched_at_leaf(&path, Operation::Insert), vec![3]);
}

#[test]
fn insert_split_chain_keeps_full_ancestors() {
    // The leaf is full but the inner page has room: a split stops at the
    // inner page, so the root latch is dropped.
    let (root, inner, leaf) = three_level_tree(4, 3, 4);
    let path: [&dyn BPlusTreePage; 3] = [&root, &inner, &leaf];
    assert!(!root.is_safe(Operation::Insert));
    assert!(inner.is_safe(Operation::Insert));
    assert_eq!(latched_at_leaf(&path, Operation::Insert), vec![2, 3]);

    // A root with room does not help once a full page sits below it.
    let (root, inner, leaf) = three_level_tree(3, 4, 4);
    let path: [&dyn BPlusTreePage; 3] = [&root, &inner, &leaf];
    assert!(root.is_safe(Operation::Insert));
    assert_eq!(latched_at_leaf(&path, Operation::Insert), vec![1, 2, 3]);
}

#[test]
fn delete_at_minimum_keeps_ancestors() {
    // Non-root pages with max_size 4 need 2 entries; the internal root needs 2 children.
    let (root, inner, leaf) = three_level_tree(2, 2, 2);
    let path: [&dyn BPlusTreePage; 3] = [&root, &inner, &leaf];
    assert_eq!(latched_at_leaf(&path, Operation::Delete), vec![1, 2, 3]);

    let (root, inner, leaf) = three_level_tree(2, 3, 2);
    let path: [&dyn BPlusTreePage; 3] = [&root, &inner, &leaf];
    assert_eq!(latched_at_leaf(&path, Operation::Delete), vec![2, 3]);

    let (root, inner, leaf) = three_level_tree(2, 2, 3);
    let path: [&dyn BPlusTreePage; 3] = [&root, &inner, &leaf];
    assert_eq!(latched_at_leaf(&path, Operation::Delete), vec![3]);
}

#[test]
fn single_leaf_tree_is_its_own_root() {
    let mut leaf: LeafPage<i32, i32> = LeafPage::new(0, None, 4);
    leaf.insert(1, 1).unwrap();
    assert!(leaf.is_root());
    assert_eq!(leaf.get_min_size(), 1);
    assert!(!leaf.is_safe(Operation::Delete));
    leaf.insert(2, 2).unwrap();
    assert!(leaf.is_safe(Operation::Delete));

    let header: &TreePageHeader = leaf.header();
    assert!(header.is_leaf());
    assert_eq!(header.get_size(), 2);
}
