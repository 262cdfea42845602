//! Index primitives: lexicon, forward index and the barrel-partitioned
//! inverted index.

pub mod barrel;
pub mod doc_store;
pub mod forward;
pub mod lexicon;
pub mod types;

pub use barrel::{BarrelMap, BarrelSet};
pub use doc_store::DocumentStore;
pub use forward::{ForwardEntry, ForwardIndex};
pub use lexicon::Lexicon;
pub use types::{FieldCode, Hit, Posting, WordId};
