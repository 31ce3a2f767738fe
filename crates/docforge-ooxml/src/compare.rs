//! Fingerprint comparison
//!
//! Diffs two structural fingerprints field by field. Every mismatch is
//! reported — the comparison never stops at the first difference — and
//! tables are compared positionally up to the smaller table count.

use serde::Serialize;
use serde_json::{json, Value};

use crate::inspect::StructuralFingerprint;

/// One mismatched field between two documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Difference {
    /// Dotted path of the mismatched field, e.g. `tables[1].row_count`.
    pub field: String,
    pub value_in_doc1: Value,
    pub value_in_doc2: Value,
}

/// The outcome of comparing two fingerprints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub is_identical: bool,
    pub differences: Vec<Difference>,
}

impl ComparisonResult {
    /// One-line human summary.
    pub fn summary(&self) -> String {
        if self.is_identical {
            "Documents are identical in structure".to_string()
        } else {
            format!("Found {} difference(s)", self.differences.len())
        }
    }
}

/// Compare two fingerprints field by field.
pub fn compare(doc1: &StructuralFingerprint, doc2: &StructuralFingerprint) -> ComparisonResult {
    let mut differences = Vec::new();

    push_if_differs(
        &mut differences,
        "table_count",
        &doc1.table_count,
        &doc2.table_count,
    );
    push_if_differs(
        &mut differences,
        "paragraph_count",
        &doc1.paragraph_count,
        &doc2.paragraph_count,
    );
    push_if_differs(
        &mut differences,
        "has_header",
        &doc1.has_header,
        &doc2.has_header,
    );
    push_if_differs(
        &mut differences,
        "has_footer",
        &doc1.has_footer,
        &doc2.has_footer,
    );

    // Positional comparison up to the shared prefix; the count mismatch
    // above already covers the tail.
    let shared = doc1.tables.len().min(doc2.tables.len());
    for i in 0..shared {
        let (t1, t2) = (&doc1.tables[i], &doc2.tables[i]);
        push_if_differs(
            &mut differences,
            &format!("tables[{i}].column_count"),
            &t1.column_count,
            &t2.column_count,
        );
        push_if_differs(
            &mut differences,
            &format!("tables[{i}].row_count"),
            &t1.row_count,
            &t2.row_count,
        );
        push_if_differs(
            &mut differences,
            &format!("tables[{i}].column_widths"),
            &t1.column_widths,
            &t2.column_widths,
        );
        push_if_differs(
            &mut differences,
            &format!("tables[{i}].row_heights"),
            &t1.row_heights,
            &t2.row_heights,
        );
    }

    ComparisonResult {
        is_identical: differences.is_empty(),
        differences,
    }
}

fn push_if_differs<T: PartialEq + Serialize>(
    differences: &mut Vec<Difference>,
    field: &str,
    v1: &T,
    v2: &T,
) {
    if v1 != v2 {
        differences.push(Difference {
            field: field.to_string(),
            value_in_doc1: json!(v1),
            value_in_doc2: json!(v2),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::TableInfo;

    fn fingerprint(tables: Vec<TableInfo>, paragraphs: usize) -> StructuralFingerprint {
        StructuralFingerprint {
            table_count: tables.len(),
            tables,
            paragraph_count: paragraphs,
            has_header: false,
            has_footer: false,
        }
    }

    fn table(cols: usize, rows: usize) -> TableInfo {
        TableInfo {
            column_widths: vec![1000; cols],
            row_heights: vec![None; rows + 1],
            row_count: rows,
            column_count: cols,
        }
    }

    #[test]
    fn identical_fingerprints_have_no_differences() {
        let fp = fingerprint(vec![table(2, 3)], 5);
        let result = compare(&fp, &fp);
        assert!(result.is_identical);
        assert!(result.differences.is_empty());
    }

    #[test]
    fn all_mismatches_are_reported() {
        let a = fingerprint(vec![table(2, 3)], 5);
        let b = fingerprint(vec![table(3, 4)], 7);
        let result = compare(&a, &b);
        assert!(!result.is_identical);
        let fields: Vec<&str> = result.differences.iter().map(|d| d.field.as_str()).collect();
        assert!(fields.contains(&"paragraph_count"));
        assert!(fields.contains(&"tables[0].column_count"));
        assert!(fields.contains(&"tables[0].row_count"));
        assert!(fields.contains(&"tables[0].column_widths"));
    }

    #[test]
    fn symmetry_swaps_values() {
        let a = fingerprint(vec![], 1);
        let b = fingerprint(vec![], 2);
        let ab = compare(&a, &b);
        let ba = compare(&b, &a);
        assert_eq!(ab.is_identical, ba.is_identical);
        assert_eq!(ab.differences[0].value_in_doc1, ba.differences[0].value_in_doc2);
        assert_eq!(ab.differences[0].value_in_doc2, ba.differences[0].value_in_doc1);
    }

    #[test]
    fn extra_tables_reported_as_count_mismatch_only() {
        let a = fingerprint(vec![table(2, 2)], 0);
        let b = fingerprint(vec![table(2, 2), table(1, 1)], 0);
        let result = compare(&a, &b);
        let fields: Vec<&str> = result.differences.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["table_count"]);
    }
}
