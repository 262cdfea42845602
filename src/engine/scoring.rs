//! Scoring functions for ranked search

use crate::index::{FieldCode, Hit};

/// Multiplier applied to a group matched through a synonym instead of the
/// query's own term
pub const SYNONYM_FACTOR: f32 = 0.5;

/// Relative weight of a hit by field
pub fn field_weight(field: FieldCode) -> f32 {
    match field {
        FieldCode::Title => 5.0,
        FieldCode::Abstract => 1.0,
        FieldCode::Categories => 3.0,
        FieldCode::Authors => 1.0,
        FieldCode::Submitter => 1.0,
    }
}

/// Field-weighted sum over one posting's hits
pub fn base_score(hits: &[Hit]) -> f32 {
    hits.iter().map(|hit| field_weight(hit.field)).sum()
}

/// One group's contribution: the base score, halved for synonym matches
pub fn term_score(hits: &[Hit], is_exact: bool) -> f32 {
    let base = base_score(hits);
    if is_exact {
        base
    } else {
        base * SYNONYM_FACTOR
    }
}

/// Bonus for matched terms occurring close together. The span is the
/// distance between the outermost hit positions across all surviving
/// groups; spans at or beyond `max_span` earn nothing.
pub fn proximity_bonus(positions: &[u32], max_span: u32) -> f32 {
    let (min, max) = match (positions.iter().min(), positions.iter().max()) {
        (Some(min), Some(max)) => (*min, *max),
        _ => return 0.0,
    };
    let span = (max - min).min(max_span);
    (max_span - span) as f32 / 100.0
}
