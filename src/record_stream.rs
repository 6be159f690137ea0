// WHY: Reconstructs discrete notes from a line-oriented archive
// Two-state assembler (Empty/Accumulating) with metadata held apart from the buffer,
// driven line by line from any async buffered reader

use anyhow::{Context, Result};
use futures::stream::Stream;
use regex_automata::meta::Regex;
use std::collections::VecDeque;
use std::sync::OnceLock;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

/// Identifying metadata carried by a start marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMeta {
    pub patient_id: String,
    pub note_id: String,
}

impl RecordMeta {
    pub fn new(patient_id: impl Into<String>, note_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            note_id: note_id.into(),
        }
    }
}

/// A finalized note: metadata plus the trimmed accumulated text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub meta: RecordMeta,
    pub text: String,
}

/// Text left open when the input ended before an end marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailingRecord {
    pub meta: Option<RecordMeta>,
    pub chars: usize,
}

/// Precompiled record boundary grammars, shared read-only for the whole process
struct MarkerPatterns {
    start: Regex,
    end: Regex,
}

impl MarkerPatterns {
    fn shared() -> &'static MarkerPatterns {
        static SHARED_MARKERS: OnceLock<MarkerPatterns> = OnceLock::new();
        SHARED_MARKERS.get_or_init(|| MarkerPatterns {
            start: Regex::new(r"(?i)^start_of_record=(\d+)\|\|\|\|(\d+)\|\|\|\|$")
                .expect("start marker pattern must compile"),
            end: Regex::new(r"\|\|\|\|END_OF_RECORD$")
                .expect("end marker pattern must compile"),
        })
    }
}

/// Parse a start marker line (terminator already removed)
pub fn parse_start_marker(line: &str) -> Option<RecordMeta> {
    let start = &MarkerPatterns::shared().start;
    let mut caps = start.create_captures();
    start.captures(line, &mut caps);
    if !caps.is_match() {
        return None;
    }

    let patient = caps.get_group(1)?;
    let note = caps.get_group(2)?;
    Some(RecordMeta::new(&line[patient.range()], &line[note.range()]))
}

/// Whether a line (terminator already removed) closes the current record
pub fn is_end_marker(line: &str) -> bool {
    MarkerPatterns::shared().end.is_match(line)
}

/// Split text into lines ending in `\n`, `\r\n` or a lone `\r`, terminators kept.
/// A trailing fragment without a terminator is the last line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..=i]);
                start = i + 1;
            }
            b'\r' => {
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                lines.push(&text[start..=i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    if start < bytes.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Split a raw line into its content and a normalized terminator
/// WHY: CR, CRLF and LF archives must produce the same character offsets
fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else if let Some(body) = line.strip_suffix('\r') {
        (body, "\n")
    } else {
        (line, "")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblerState {
    /// No text accumulated since the last record closed
    Empty,
    /// At least one line appended to the current chunk
    Accumulating,
}

/// Line-at-a-time record segmentation state machine
#[derive(Debug)]
pub struct RecordAssembler {
    state: AssemblerState,
    chunk: String,
    /// Persists across record boundaries; a note without a start marker inherits it
    pending_meta: Option<RecordMeta>,
    records_emitted: u64,
    records_without_metadata: u64,
    unterminated_discarded: u64,
}

impl Default for RecordAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordAssembler {
    pub fn new() -> Self {
        Self {
            state: AssemblerState::Empty,
            chunk: String::new(),
            pending_meta: None,
            records_emitted: 0,
            records_without_metadata: 0,
            unterminated_discarded: 0,
        }
    }

    pub fn state(&self) -> AssemblerState {
        self.state
    }

    pub fn pending_meta(&self) -> Option<&RecordMeta> {
        self.pending_meta.as_ref()
    }

    pub fn records_emitted(&self) -> u64 {
        self.records_emitted
    }

    pub fn records_without_metadata(&self) -> u64 {
        self.records_without_metadata
    }

    pub fn unterminated_discarded(&self) -> u64 {
        self.unterminated_discarded
    }

    /// Feed one line as produced by [`split_lines`] (with its terminator, if any).
    /// Returns the finalized record when the line carries the end marker.
    pub fn push_line(&mut self, line: &str) -> Option<Record> {
        let (body, terminator) = split_terminator(line);

        if let Some(meta) = parse_start_marker(body) {
            debug!(patient = %meta.patient_id, note = %meta.note_id, "Start of record");
            self.pending_meta = Some(meta);
        }

        self.chunk.push_str(body);
        self.chunk.push_str(terminator);
        self.state = AssemblerState::Accumulating;

        if !is_end_marker(body) {
            return None;
        }

        let chunk = std::mem::take(&mut self.chunk);
        self.state = AssemblerState::Empty;

        match &self.pending_meta {
            Some(meta) => {
                self.records_emitted += 1;
                Some(Record {
                    meta: meta.clone(),
                    text: chunk.trim().to_string(),
                })
            }
            None => {
                warn!(
                    "Discarding record closed before any start marker ({} chars)",
                    chunk.trim().chars().count()
                );
                self.records_without_metadata += 1;
                None
            }
        }
    }

    /// Drop whatever is still open at end of input.
    /// Nothing is emitted; the return value only describes what was lost.
    pub fn finish(&mut self) -> Option<TrailingRecord> {
        let chunk = std::mem::take(&mut self.chunk);
        self.state = AssemblerState::Empty;

        let trimmed = chunk.trim();
        if trimmed.is_empty() {
            return None;
        }

        self.unterminated_discarded += 1;
        Some(TrailingRecord {
            meta: self.pending_meta.clone(),
            chars: trimmed.chars().count(),
        })
    }
}

/// Pull-based record reader over an async line source
pub struct RecordStream<R> {
    reader: R,
    assembler: RecordAssembler,
    line: String,
    ready: VecDeque<Record>,
    lines_read: u64,
    exhausted: bool,
}

impl<R: AsyncBufRead + Unpin> RecordStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            assembler: RecordAssembler::new(),
            line: String::new(),
            ready: VecDeque::new(),
            lines_read: 0,
            exhausted: false,
        }
    }

    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    pub fn assembler(&self) -> &RecordAssembler {
        &self.assembler
    }

    /// Read lines until the next record closes or the input is exhausted
    pub async fn next_record(&mut self) -> Result<Option<Record>> {
        loop {
            if let Some(record) = self.ready.pop_front() {
                return Ok(Some(record));
            }
            if self.exhausted {
                return Ok(None);
            }

            // read_line stops at `\n` only; lone `\r` breaks are split out below
            self.line.clear();
            let bytes = self
                .reader
                .read_line(&mut self.line)
                .await
                .with_context(|| format!("Failed to read input line {}", self.lines_read + 1))?;

            if bytes == 0 {
                self.exhausted = true;
                if let Some(trailing) = self.assembler.finish() {
                    match &trailing.meta {
                        Some(meta) => warn!(
                            patient = %meta.patient_id,
                            note = %meta.note_id,
                            "Input ended inside a record; discarding {} chars",
                            trailing.chars
                        ),
                        None => warn!("Input ended inside a record; discarding {} chars", trailing.chars),
                    }
                }
                continue;
            }

            for line in split_lines(&self.line) {
                self.lines_read += 1;
                if let Some(record) = self.assembler.push_line(line) {
                    self.ready.push_back(record);
                }
            }
        }
    }
}

/// Lazy stream of finalized records; ends after the first read error
pub fn records<R: AsyncBufRead + Unpin>(reader: R) -> impl Stream<Item = Result<Record>> {
    futures::stream::unfold(Some(RecordStream::new(reader)), |state| async move {
        let mut stream = state?;
        match stream.next_record().await {
            Ok(Some(record)) => Some((Ok(record), Some(stream))),
            Ok(None) => None,
            Err(e) => Some((Err(e), None)),
        }
    })
}
