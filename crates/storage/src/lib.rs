#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;
pub mod tabular;

pub use repository::{
    HistoryRepository, InMemoryRepository, QuestionRecord, QuestionSource, Storage, StorageError,
};
