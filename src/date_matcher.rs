// WHY: numeric date detection over a single finalized record
// At each scan position the year-bearing form is tried first, anchored, and the
// year-less form is the fallback; scanning resumes after the chosen match

use anyhow::Result;
use regex_automata::{meta::Regex, Anchored, Input};
use std::sync::OnceLock;
use tracing::debug;

/// Month 1-12 with optional leading zero
const MONTH: &str = r"(?:0?[1-9]|1[0-2])";
/// Day 1-31 with optional leading zero; no month-length validation
const DAY: &str = r"(?:0?[1-9]|[12][0-9]|3[0-1])";
/// Day as chosen when no year follows: the first day branch (`0?[1-9]`) always
/// succeeds before the two-digit branches are reached
const SHORT_DAY: &str = r"0?[1-9]";

/// `month/day/year`
fn full_pattern() -> String {
    format!(r"{MONTH}/{DAY}/\d{{2,4}}")
}

/// `month/day`, also used to locate the leftmost candidate start
fn short_pattern() -> String {
    format!(r"{MONTH}/{SHORT_DAY}")
}

/// A date-like substring located in a record's trimmed text.
/// Positions are 0-based character offsets, `end` exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateSpan<'a> {
    pub start: usize,
    pub end: usize,
    pub text: &'a str,
}

/// Forward-only byte to character position counter
/// WHY: matches arrive in increasing order, so each byte is visited once per record
struct CharCounter<'a> {
    bytes: &'a [u8],
    byte_pos: usize,
    char_pos: usize,
}

impl<'a> CharCounter<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            byte_pos: 0,
            char_pos: 0,
        }
    }

    fn advance_to_byte(&mut self, target_byte_pos: usize) -> usize {
        while self.byte_pos < target_byte_pos && self.byte_pos < self.bytes.len() {
            let byte = self.bytes[self.byte_pos];
            // ASCII (0xxxxxxx) or the lead byte of a multi-byte sequence (11xxxxxx)
            if (byte & 0x80) == 0 || (byte & 0xC0) == 0xC0 {
                self.char_pos += 1;
            }
            self.byte_pos += 1;
        }
        self.char_pos
    }
}

/// Compiled date grammar, stateless across records
pub struct DateMatcher {
    full: Regex,
    short: Regex,
}

impl DateMatcher {
    /// Compile the date grammar
    pub fn new() -> Result<Self> {
        let full = Regex::new(&full_pattern())?;
        let short = Regex::new(&short_pattern())?;
        debug!("Compiled date patterns: {} | {}", full_pattern(), short_pattern());
        Ok(Self { full, short })
    }

    /// Process-wide matcher compiled on first use and never mutated afterwards
    pub fn shared() -> &'static DateMatcher {
        static SHARED_MATCHER: OnceLock<DateMatcher> = OnceLock::new();
        SHARED_MATCHER.get_or_init(|| {
            DateMatcher::new().expect("built-in date pattern must compile")
        })
    }

    /// Find every date-like substring in `text`, left to right, without overlap
    pub fn find_dates<'a>(&self, text: &'a str) -> Vec<DateSpan<'a>> {
        let mut counter = CharCounter::new(text);
        let mut spans = Vec::new();
        let mut pos = 0;

        // Every full date starts with a short one, so the short form finds the leftmost start
        while let Some(short) = self.short.find(Input::new(text).range(pos..)) {
            let anchored = Input::new(text)
                .range(short.start()..)
                .anchored(Anchored::Yes);
            let m = self.full.find(anchored).unwrap_or(short);

            let start = counter.advance_to_byte(m.start());
            let end = counter.advance_to_byte(m.end());
            spans.push(DateSpan {
                start,
                end,
                text: &text[m.range()],
            });
            pos = m.end();
        }

        debug!("Found {} date spans in {} bytes", spans.len(), text.len());
        spans
    }
}

/// Convenience wrapper around the shared matcher
pub fn find_dates(text: &str) -> Vec<DateSpan<'_>> {
    DateMatcher::shared().find_dates(text)
}
