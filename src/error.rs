use thiserror::Error;
use crate::storage::page::PageId;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("unknown index page type code {0}")]
    UnknownPageType(u8),
    #[error("index entries must have a non-zero width")]
    InvalidEntryWidth,
    #[error("page of {page_size} bytes cannot hold two entries of {entry_width} bytes")]
    PageTooSmall { page_size: usize, entry_width: usize },
    #[error("duplicate key {0}")]
    DuplicateKey(String),
    #[error("page id {0} is reserved and cannot name a page")]
    ReservedPageId(PageId),
    #[error("page {0} is not a child of this internal page")]
    ChildNotFound(PageId),
}

pub type IndexResult<T> = Result<T, IndexError>;
