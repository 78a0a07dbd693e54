//! Integration tests for the `extract` subcommand.

mod common;

use assert_cmd::Command;
use common::{page_contents, pdf_with_pages, write_pdf};
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("pdfexcise").unwrap()
}

fn five_pages() -> Vec<u8> {
    pdf_with_pages(&[
        b"BT (p1) Tj ET",
        b"BT (p2) Tj ET",
        b"BT (p3) Tj ET",
        b"BT (p4) Tj ET",
        b"BT (p5) Tj ET",
    ])
}

#[test]
fn extracts_inclusive_range_next_to_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_pdf(dir.path(), "book.pdf", &five_pages());
    cmd()
        .args(["extract", input.to_str().unwrap(), "-r", "2,4"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Extracted 3 pages"));

    let contents = page_contents(&dir.path().join("book_2-4.pdf"));
    assert_eq!(contents.len(), 3);
    assert!(contents[0].contains("(p2)"));
    assert!(contents[2].contains("(p4)"));
}

#[test]
fn dash_range_and_explicit_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_pdf(dir.path(), "book.pdf", &five_pages());
    let output = dir.path().join("parts/last.pdf");
    cmd()
        .args(["extract", input.to_str().unwrap(), "--page-range", "5-5", "-o"])
        .arg(&output)
        .assert()
        .success();

    let contents = page_contents(&output);
    assert_eq!(contents.len(), 1);
    assert!(contents[0].contains("(p5)"));
}

#[test]
fn out_of_bounds_range_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_pdf(dir.path(), "book.pdf", &five_pages());
    cmd()
        .args(["extract", input.to_str().unwrap(), "-r", "4,9"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("exceeds page count 5"));
    assert!(!dir.path().join("book_4-9.pdf").exists());
}

#[test]
fn malformed_range_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_pdf(dir.path(), "book.pdf", &five_pages());
    for range in ["3", "a,b", "0,2", "4,2"] {
        cmd()
            .args(["extract", input.to_str().unwrap(), "-r", range])
            .assert()
            .code(1)
            .stderr(predicate::str::starts_with("Error:"));
    }
}
