pub mod document;
pub mod search;

pub use document::{DocId, DocRecord, RawDocument};
pub use search::{
    AutocompleteOutcome, EngineStatus, MatchType, SearchOutcome, SearchResultItem,
};
