//! Persistent artifact layout and atomic JSON file I/O.
//!
//! Storage is a set of JSON files under one data directory; every rewrite
//! goes through write-temp-rename so readers never observe a torn file.

mod store;

pub use store::{read_json, read_json_opt, write_json_atomic, ArtifactPaths};
