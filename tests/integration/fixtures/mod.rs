// Test fixtures with known note archives and expected reports
// WHY: Golden-file testing requires deterministic input/output pairs for validation

#![allow(dead_code)]

/// One note with one full date
pub const SIMPLE_ARCHIVE: &str = "start_of_record=1||||1||||\nVisit on 03/14/2020 for checkup.\n||||END_OF_RECORD\n";

/// Expected report for SIMPLE_ARCHIVE at the default offset
pub const SIMPLE_EXPECTED: &str = "Patient 1\tNote 1\n9 9 19\n";

/// Same note with CRLF line terminators
pub const SIMPLE_ARCHIVE_CRLF: &str = "start_of_record=1||||1||||\r\nVisit on 03/14/2020 for checkup.\r\n||||END_OF_RECORD\r\n";

/// Three notes: two-digit year plus year-less date, a note with a blood pressure
/// reading but no date, and a multi-line note with an impossible calendar date
pub const MULTI_NOTE_ARCHIVE: &str = "start_of_record=10||||100||||
Admitted 1/5/21, discharged 1/9.
||||END_OF_RECORD
start_of_record=10||||101||||
Patient stable. BP 120/80 noted.
||||END_OF_RECORD
start_of_record=11||||7||||
DOB 02/31/2020.
Follow-up 5/6 pm, then 12/25/99.
||||END_OF_RECORD
";

/// Expected report for MULTI_NOTE_ARCHIVE
/// Format: header `Patient X<TAB>Note Y`, then `start start end` per date
pub const MULTI_NOTE_EXPECTED: &str = "Patient 10\tNote 100
12 12 18
31 31 34
Patient 10\tNote 101
Patient 11\tNote 7
5 5 15
27 27 30
40 40 48
";

/// Accented text ahead of the date; offsets count characters, not bytes
pub const UNICODE_ARCHIVE: &str = "start_of_record=2||||3||||\nRéévaluation prévue le 04/07/2021.\n||||END_OF_RECORD\n";

/// Expected report for UNICODE_ARCHIVE
pub const UNICODE_EXPECTED: &str = "Patient 2\tNote 3\n23 23 33\n";

/// A note opened twice before closing, followed by a note that never closes
pub const OVERWRITE_AND_TRAILING_ARCHIVE: &str = "start_of_record=1||||1||||
start_of_record=9||||9||||
Seen 7/4.
||||END_OF_RECORD
start_of_record=3||||3||||
Unfinished 8/8/88
";

/// Expected report for OVERWRITE_AND_TRAILING_ARCHIVE
/// WHY: the second start marker wins and the unterminated note is dropped
pub const OVERWRITE_AND_TRAILING_EXPECTED: &str = "Patient 9\tNote 9\n32 32 35\n";

/// Large archive for throughput testing: `count` notes, each with two dates
pub fn generate_large_archive(count: usize) -> String {
    let mut archive = String::new();
    for i in 1..=count {
        archive.push_str(&format!(
            "start_of_record={}||||{}||||\nSeen on 0{}/1{}/20{:02} and again 1{}/2{}.\n||||END_OF_RECORD\n",
            i / 10 + 1,
            i,
            i % 9 + 1,
            i % 10,
            i % 100,
            i % 3,
            i % 10,
        ));
    }
    archive
}
