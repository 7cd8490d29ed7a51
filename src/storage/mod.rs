pub mod page;
pub mod tree_page;
pub mod leaf_page;
pub mod internal_page;

pub use tree_page::{BPlusTreePage, Operation, PageType, TreePageHeader};
pub use leaf_page::LeafPage;
pub use internal_page::InternalPage;
