//! Core types shared by the indexing and query paths

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::DocId;

/// Dense word identifier allocated by the lexicon, starting at 1.
/// Never reused; `word_id mod num_barrels` selects the owning shard.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct WordId(pub u32);

impl WordId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// Shard index owning this word
    pub fn shard(self, num_barrels: u32) -> u32 {
        self.0 % num_barrels
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// Document field a hit occurred in. The numeric codes are part of the
/// persistent format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum FieldCode {
    Title = 1,
    Abstract = 2,
    Categories = 3,
    Authors = 4,
    Submitter = 5,
}

impl FieldCode {
    /// Fields in canonical position-counting order
    pub const CANONICAL_ORDER: [FieldCode; 5] = [
        FieldCode::Title,
        FieldCode::Abstract,
        FieldCode::Categories,
        FieldCode::Authors,
        FieldCode::Submitter,
    ];
}

impl From<FieldCode> for u8 {
    fn from(field: FieldCode) -> u8 {
        field as u8
    }
}

impl TryFrom<u8> for FieldCode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(FieldCode::Title),
            2 => Ok(FieldCode::Abstract),
            3 => Ok(FieldCode::Categories),
            4 => Ok(FieldCode::Authors),
            5 => Ok(FieldCode::Submitter),
            other => Err(format!("unknown field code {}", other)),
        }
    }
}

/// An occurrence of a word at a document position. `pos` is the running
/// counter across fields in canonical order, so hit positions from
/// different fields are comparable for proximity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit {
    pub pos: u32,
    #[serde(rename = "type")]
    pub field: FieldCode,
}

impl Hit {
    pub fn new(pos: u32, field: FieldCode) -> Self {
        Self { pos, field }
    }
}

/// One document's contribution to a word's posting list
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub hits: Vec<Hit>,
}

impl Posting {
    pub fn new(doc_id: impl Into<DocId>, hits: Vec<Hit>) -> Self {
        Self {
            doc_id: doc_id.into(),
            hits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_id_shard() {
        assert_eq!(WordId(1).shard(64), 1);
        assert_eq!(WordId(64).shard(64), 0);
        assert_eq!(WordId(129).shard(64), 1);
        assert_eq!(format!("{}", WordId(7)), "w7");
    }

    #[test]
    fn test_field_code_round_trip() {
        for field in FieldCode::CANONICAL_ORDER {
            let code: u8 = field.into();
            assert_eq!(FieldCode::try_from(code).unwrap(), field);
        }
        assert!(FieldCode::try_from(0).is_err());
        assert!(FieldCode::try_from(6).is_err());
    }

    #[test]
    fn test_hit_serializes_with_type_key() {
        let hit = Hit::new(12, FieldCode::Categories);
        let json = serde_json::to_string(&hit).unwrap();
        assert_eq!(json, r#"{"pos":12,"type":3}"#);
        let back: Hit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hit);
    }

    #[test]
    fn test_posting_json_shape() {
        let posting = Posting::new("d1", vec![Hit::new(0, FieldCode::Title)]);
        let json = serde_json::to_value(&posting).unwrap();
        assert_eq!(json["doc_id"], "d1");
        assert_eq!(json["hits"][0]["type"], 1);
    }
}
