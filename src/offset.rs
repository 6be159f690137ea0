use crate::date_matcher::DateSpan;

/// A date span moved into the output coordinate system.
/// Signed because a date inside the leading calibration window lands below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjustedSpan {
    pub start: i64,
    pub end: i64,
}

/// Subtract the calibration offset from both ends of a span
pub fn adjust(span: &DateSpan<'_>, offset: i64) -> AdjustedSpan {
    AdjustedSpan {
        start: span.start as i64 - offset,
        end: span.end as i64 - offset,
    }
}

/// Adjust a whole record's spans, preserving order
pub fn adjust_all(spans: &[DateSpan<'_>], offset: i64) -> Vec<AdjustedSpan> {
    spans.iter().map(|span| adjust(span, offset)).collect()
}
