// WHY: Single sequential pass tying segmentation, matching, correction and reporting together
// Each closed record is fully matched and written before the next line is read

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tokio::fs::{self, File};
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tracing::{debug, info};

use crate::config::ScanConfig;
use crate::date_matcher::DateMatcher;
use crate::offset::adjust_all;
use crate::record_stream::RecordStream;
use crate::report::{format_trace_line, ReportWriter};

/// Summary of one scan run, written as JSON when requested
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub input_path: String,
    pub output_path: String,
    pub lines_read: u64,
    pub records_emitted: u64,
    pub spans_found: u64,
    pub records_without_metadata: u64,
    pub unterminated_discarded: u64,
    pub duration_ms: u64,
}

impl RunStats {
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write stats file {}", path.display()))?;
        Ok(())
    }
}

/// Scan every record from `reader`, writing blocks to `writer` and per-match lines to `trace`.
/// Returns the flushed report writer together with the run counters.
pub async fn scan_records<R, W, T>(
    reader: R,
    writer: W,
    trace: &mut T,
    config: &ScanConfig,
) -> Result<(W, RunStats)>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    T: AsyncWrite + Unpin,
{
    let matcher = DateMatcher::shared();
    let mut records = RecordStream::new(reader);
    let mut report = ReportWriter::new(writer);

    while let Some(record) = records.next_record().await? {
        let spans = matcher.find_dates(&record.text);
        let adjusted = adjust_all(&spans, config.offset);

        debug!(
            patient = %record.meta.patient_id,
            note = %record.meta.note_id,
            "Record closed with {} date spans",
            spans.len()
        );

        report.write_block(&record.meta, &adjusted).await?;

        if config.trace {
            for (span, adj) in spans.iter().zip(adjusted.iter()) {
                trace
                    .write_all(format_trace_line(&record.meta, adj, span).as_bytes())
                    .await
                    .context("Failed to write diagnostic trace")?;
            }
        }
    }

    trace.flush().await.context("Failed to flush diagnostic trace")?;

    let stats = RunStats {
        lines_read: records.lines_read(),
        records_emitted: report.blocks_written(),
        spans_found: report.spans_written(),
        records_without_metadata: records.assembler().records_without_metadata(),
        unterminated_discarded: records.assembler().unterminated_discarded(),
        ..Default::default()
    };

    let writer = report.finish().await?;
    Ok((writer, stats))
}

/// Scan `input` into `output`, tracing matches to stdout
pub async fn run(input: &Path, output: &Path, config: &ScanConfig) -> Result<RunStats> {
    let start_time = Instant::now();

    // The report is truncated before the input is opened, so a failed open leaves it empty
    let output_file = File::create(output)
        .await
        .with_context(|| format!("Failed to create output file {}", output.display()))?;
    let input_file = File::open(input)
        .await
        .with_context(|| format!("Failed to open input file {}", input.display()))?;

    info!("Scanning {} into {}", input.display(), output.display());

    let reader = BufReader::with_capacity(config.buffer_size, input_file);
    let writer = BufWriter::with_capacity(config.buffer_size, output_file);
    let mut trace = BufWriter::new(tokio::io::stdout());

    let (mut writer, mut stats) = scan_records(reader, writer, &mut trace, config).await?;
    writer
        .get_mut()
        .sync_all()
        .await
        .with_context(|| format!("Failed to sync output file {}", output.display()))?;

    stats.input_path = input.display().to_string();
    stats.output_path = output.display().to_string();
    stats.duration_ms = u64::try_from(start_time.elapsed().as_millis()).unwrap_or(u64::MAX);

    info!(
        "Scan complete: {} lines, {} records, {} date spans in {}ms",
        stats.lines_read, stats.records_emitted, stats.spans_found, stats.duration_ms
    );

    Ok(stats)
}
