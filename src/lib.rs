pub mod storage;
pub mod error;
