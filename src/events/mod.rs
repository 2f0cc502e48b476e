//! Typing log records, loading and discovery

mod record;
mod loader;
pub mod discovery;

pub use record::{parse_timestamp, Field, TypingEvent, START_OF_SEQUENCE};
pub use loader::{load_files, load_jsonl, load_reader, Dataset, LoadError};
