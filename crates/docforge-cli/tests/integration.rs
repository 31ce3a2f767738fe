//! CLI command integration tests
//!
//! Drives the library-level command functions against real files in temp
//! directories.

use std::fs;

use docforge_cli::{
    compare_command, convert_command, delete_dir_command, delete_file_command, edit_command,
    inspect_command, render_command, OutputFormat,
};

#[test]
fn render_and_inspect_a_description() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("report.json");
    fs::write(
        &input,
        r#"{"title": "Report", "sections": [
            {"type": "heading", "level": 1, "text": "Overview"},
            {"type": "table", "headers": ["A", "B"], "rows": [["1", "2"]]}
        ]}"#,
    )
    .unwrap();

    let output = dir.path().join("report.docx");
    render_command(&input, Some(&output)).unwrap();
    assert!(output.exists());

    inspect_command(&output, OutputFormat::Json).unwrap();
    inspect_command(&output, OutputFormat::Text).unwrap();
}

#[test]
fn render_defaults_output_next_to_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("doc.json");
    fs::write(&input, r#"{"sections": []}"#).unwrap();

    render_command(&input, None).unwrap();
    assert!(dir.path().join("doc.docx").exists());
}

#[test]
fn render_rejects_invalid_description() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.json");
    fs::write(&input, r#"{"sections": [{"type": "carousel"}]}"#).unwrap();

    let err = render_command(&input, None).unwrap_err();
    assert!(err.to_string().contains("invalid document description"));
    assert!(!dir.path().join("bad.docx").exists());
}

#[test]
fn convert_then_compare_documents() {
    let dir = tempfile::tempdir().unwrap();
    let txt = dir.path().join("notes.txt");
    fs::write(&txt, "line one\nline two\n").unwrap();

    let doc1 = dir.path().join("a.docx");
    let doc2 = dir.path().join("b.docx");
    convert_command(&txt, Some(&doc1)).unwrap();
    convert_command(&txt, Some(&doc2)).unwrap();

    compare_command(&doc1, &doc2, OutputFormat::Text).unwrap();
    compare_command(&doc1, &doc2, OutputFormat::Json).unwrap();
}

#[test]
fn edit_applies_operations_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("doc.json");
    fs::write(
        &input,
        r#"{"sections": [{"type": "paragraph", "text": "original"}]}"#,
    )
    .unwrap();
    let doc = dir.path().join("doc.docx");
    render_command(&input, Some(&doc)).unwrap();

    let ops = dir.path().join("ops.json");
    fs::write(
        &ops,
        r#"[{"type": "add_paragraph", "text": "added"},
            {"type": "edit_paragraph", "index": 0, "text": "changed"}]"#,
    )
    .unwrap();

    edit_command(&doc, &ops).unwrap();
}

#[test]
fn delete_file_requires_valid_token() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("keep.txt");
    fs::write(&file, b"data").unwrap();

    let err = delete_file_command(&file, "DELETE").unwrap_err();
    assert!(err.to_string().contains("CORBEILLE"));
    assert!(file.exists());

    delete_file_command(&file, "SUPPRESSION DÉFINITIVE").unwrap();
    assert!(!file.exists());
}

#[test]
fn delete_dir_refuses_non_empty_directory() {
    let parent = tempfile::tempdir().unwrap();
    let target = parent.path().join("full");
    fs::create_dir(&target).unwrap();
    for name in ["a", "b", "c"] {
        fs::write(target.join(name), b"x").unwrap();
    }

    let err = delete_dir_command(&target, "SUPPRESSION DÉFINITIVE").unwrap_err();
    assert!(err.to_string().contains("3 items"));
    assert!(target.exists());
    assert_eq!(fs::read_dir(&target).unwrap().count(), 3);

    // Clear it out and the same call succeeds.
    for name in ["a", "b", "c"] {
        fs::remove_file(target.join(name)).unwrap();
    }
    delete_dir_command(&target, "SUPPRESSION DÉFINITIVE").unwrap();
    assert!(!target.exists());
}
