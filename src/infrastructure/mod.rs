pub mod cache;
pub mod media;
pub mod observability;
pub mod speech;
pub mod storage;
