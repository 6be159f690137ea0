// Integration test utilities and common code
// WHY: Centralized utilities avoid duplication across integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test fixture helper for creating temporary note archives
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with temporary directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self { temp_dir, root_path }
    }

    /// Create a note archive with given content
    pub fn create_archive<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        let file_path = self.root_path.join(relative_path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write test archive");
        file_path
    }

    /// Path for a report file inside the fixture
    pub fn output_path<P: AsRef<Path>>(&self, relative_path: P) -> PathBuf {
        self.root_path.join(relative_path)
    }

    /// Read a report file produced by a scan
    pub fn read_output<P: AsRef<Path>>(&self, path: P) -> String {
        fs::read_to_string(path).expect("Failed to read report file")
    }
}

/// Build one archive entry: start marker, body lines, end marker
pub fn note(patient: &str, note: &str, body: &str) -> String {
    format!("start_of_record={patient}||||{note}||||\n{body}\n||||END_OF_RECORD\n")
}

/// Compare two strings line by line, providing detailed diff on mismatch
pub fn assert_golden_file(actual: &str, expected: &str, context: &str) {
    let actual_lines: Vec<&str> = actual.lines().collect();
    let expected_lines: Vec<&str> = expected.lines().collect();

    if actual_lines.len() != expected_lines.len() {
        panic!(
            "{}: Line count mismatch. Expected {} lines, got {} lines\nActual:\n{}",
            context,
            expected_lines.len(),
            actual_lines.len(),
            actual
        );
    }

    for (i, (actual_line, expected_line)) in actual_lines.iter().zip(expected_lines.iter()).enumerate() {
        if actual_line != expected_line {
            panic!(
                "{}: Line {} mismatch\nExpected: {}\nActual:   {}",
                context,
                i + 1,
                expected_line,
                actual_line
            );
        }
    }
}
