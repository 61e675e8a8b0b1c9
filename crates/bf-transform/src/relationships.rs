//! Part relationship aggregation

use crate::schema::PartRelationshipRow;
use indexmap::{IndexMap, IndexSet};

/// Label for a relationship code; unknown codes have none
pub fn rel_type_desc(code: &str) -> Option<&'static str> {
    match code {
        "P" => Some("Print"),
        "R" => Some("Pair"),
        "B" => Some("Sub-Part"),
        "M" => Some("Mold"),
        "T" => Some("Pattern"),
        "A" => Some("Alternative"),
        _ => None,
    }
}

/// Relationship summary of one parent part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipSummary {
    /// Distinct codes joined with `", "`, e.g. `"P, M"`
    pub rel_type: String,
    /// Matching labels joined with `", "`, e.g. `"Print, Mold"`
    pub rel_type_desc: String,
}

/// Summarize relationships per parent part number
///
/// Each distinct code appears once per parent, in the order it first
/// appears in the input. Parents keep first-appearance order too.
pub fn summarize(rows: &[PartRelationshipRow]) -> IndexMap<String, RelationshipSummary> {
    let mut codes: IndexMap<&str, IndexSet<&str>> = IndexMap::new();
    for row in rows {
        codes
            .entry(row.parent_part_num.as_str())
            .or_default()
            .insert(row.rel_type.as_str());
    }

    codes
        .into_iter()
        .map(|(parent, codes)| {
            let rel_type = codes.iter().copied().collect::<Vec<_>>().join(", ");
            let rel_type_desc = codes
                .iter()
                .map(|code| rel_type_desc(code).unwrap_or(""))
                .collect::<Vec<_>>()
                .join(", ");
            (
                parent.to_string(),
                RelationshipSummary {
                    rel_type,
                    rel_type_desc,
                },
            )
        })
        .collect()
}
