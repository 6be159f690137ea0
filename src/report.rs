use anyhow::{Context, Result};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::date_matcher::DateSpan;
use crate::offset::AdjustedSpan;
use crate::record_stream::RecordMeta;

/// Render one note output block: header line plus one line per span.
/// Span lines are `start start end`; downstream consumers expect the start twice.
pub fn format_block(meta: &RecordMeta, spans: &[AdjustedSpan]) -> String {
    let mut block = format!("Patient {}\tNote {}\n", meta.patient_id, meta.note_id);
    for span in spans {
        block.push_str(&format!("{} {} {}\n", span.start, span.start, span.end));
    }
    block
}

/// Render the diagnostic line for a single match
pub fn format_trace_line(meta: &RecordMeta, adjusted: &AdjustedSpan, span: &DateSpan<'_>) -> String {
    format!(
        "{} {} {} {} {}\n",
        meta.patient_id, meta.note_id, adjusted.start, adjusted.end, span.text
    )
}

/// Writes note output blocks to the report destination, one record at a time
pub struct ReportWriter<W> {
    writer: W,
    blocks_written: u64,
    spans_written: u64,
}

impl<W: AsyncWrite + Unpin> ReportWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            blocks_written: 0,
            spans_written: 0,
        }
    }

    pub fn blocks_written(&self) -> u64 {
        self.blocks_written
    }

    pub fn spans_written(&self) -> u64 {
        self.spans_written
    }

    pub async fn write_block(&mut self, meta: &RecordMeta, spans: &[AdjustedSpan]) -> Result<()> {
        let block = format_block(meta, spans);
        self.writer
            .write_all(block.as_bytes())
            .await
            .with_context(|| {
                format!("Failed to write report for patient {} note {}", meta.patient_id, meta.note_id)
            })?;

        self.blocks_written += 1;
        self.spans_written += spans.len() as u64;
        Ok(())
    }

    /// Flush buffered output and hand back the underlying writer
    pub async fn finish(mut self) -> Result<W> {
        self.writer.flush().await.context("Failed to flush report output")?;
        Ok(self.writer)
    }
}
