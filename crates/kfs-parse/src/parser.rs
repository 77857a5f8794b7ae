use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use kfs_core::errors::{ErrorInfo, KfsError};
use kfs_core::{LogRecords, Slot, StepKey, SurfaceKey, TrackKey};
use tracing::{debug, info, warn};

use crate::classify::{classify, Level, LineKind, Sentinel};

/// Cursor over the hierarchy while scanning a log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseContext {
    pub track: Slot<TrackKey>,
    pub surface: Slot<SurfaceKey>,
    pub step: Slot<StepKey>,
    /// Set once the start sentinel has been seen; never cleared.
    pub recording: bool,
}

/// Line counters collected during a parse pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub lines: usize,
    pub skipped_before_sentinel: usize,
    pub identifiers: usize,
    pub features: usize,
    pub annotations: usize,
    pub ignored: usize,
    pub sentinels: usize,
}

/// Sequential parser that attaches measurement lines to the current context.
#[derive(Debug, Clone)]
pub struct LogHierarchyParser {
    sentinel: Sentinel,
    context: ParseContext,
    records: LogRecords,
    stats: ParseStats,
}

impl LogHierarchyParser {
    pub fn new(sentinel: &str) -> Self {
        Self {
            sentinel: Sentinel::new(sentinel),
            context: ParseContext::default(),
            records: LogRecords::default(),
            stats: ParseStats::default(),
        }
    }

    pub fn context(&self) -> &ParseContext {
        &self.context
    }

    pub fn stats(&self) -> &ParseStats {
        &self.stats
    }

    /// Consumes the next line of the stream.
    ///
    /// Fails only when an identifier line does not end in an integer.
    pub fn feed(&mut self, line: &str) -> Result<(), KfsError> {
        self.stats.lines += 1;
        if self.sentinel.matches(line) {
            self.stats.sentinels += 1;
            if self.context.recording {
                warn!(
                    line = self.stats.lines,
                    "start sentinel seen again; later records merge into the same hierarchy"
                );
            } else {
                debug!(line = self.stats.lines, "recording started");
            }
            self.context.recording = true;
            return Ok(());
        }
        if !self.context.recording {
            self.stats.skipped_before_sentinel += 1;
            return Ok(());
        }
        match classify(line) {
            LineKind::Identifier { level, token } => {
                let raw = self.parse_identifier(level, token, line)?;
                match level {
                    Level::Track => self.context.track = Some(TrackKey::from_raw(raw)),
                    Level::Surface => self.context.surface = Some(SurfaceKey::from_raw(raw)),
                    Level::Step => self.context.step = Some(StepKey::from_raw(raw)),
                }
                self.stats.identifiers += 1;
            }
            LineKind::Feature { name, value } => {
                let ParseContext {
                    track,
                    surface,
                    step,
                    ..
                } = self.context;
                self.records
                    .steps
                    .record_or_default(track, surface, step)
                    .set(name, value);
                self.stats.features += 1;
            }
            LineKind::Annotation { name, value } => {
                self.records
                    .annotations
                    .annotation_or_default(self.context.track, self.context.surface)
                    .set(name, value);
                self.stats.annotations += 1;
            }
            LineKind::Ignored => self.stats.ignored += 1,
        }
        Ok(())
    }

    fn parse_identifier(&self, level: Level, token: &str, line: &str) -> Result<i64, KfsError> {
        token.parse::<i64>().map_err(|err| {
            KfsError::Parse(
                ErrorInfo::new(
                    "kfs_parse.malformed_identifier",
                    format!("{level:?} identifier is not an integer: {err}"),
                )
                .with_context("line", self.stats.lines.to_string())
                .with_context("text", line.trim()),
            )
        })
    }

    /// Ends the pass and hands over the record stores.
    pub fn finish(self) -> LogRecords {
        info!(
            lines = self.stats.lines,
            steps = self.records.steps.step_count(),
            annotated_surfaces = self.records.annotations.surface_count(),
            ignored = self.stats.ignored,
            "log parsed"
        );
        if !self.context.recording {
            warn!("start sentinel never seen; no records extracted");
        }
        self.records
    }
}

/// Parses an in-memory sequence of lines.
pub fn parse_lines<I, S>(lines: I, sentinel: &str) -> Result<LogRecords, KfsError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = LogHierarchyParser::new(sentinel);
    for line in lines {
        parser.feed(line.as_ref())?;
    }
    Ok(parser.finish())
}

/// Parses a buffered reader line by line.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected; only
/// read failures of the underlying stream are fatal.
pub fn parse_reader<R: BufRead>(mut reader: R, sentinel: &str) -> Result<LogRecords, KfsError> {
    let mut parser = LogHierarchyParser::new(sentinel);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = reader.read_until(b'\n', &mut buf).map_err(|err| {
            KfsError::Io(
                ErrorInfo::new("kfs_parse.read", err.to_string())
                    .with_context("line", (parser.stats().lines + 1).to_string()),
            )
        })?;
        if read == 0 {
            break;
        }
        let bytes = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
        let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
        let line = String::from_utf8_lossy(bytes);
        if let Cow::Owned(_) = line {
            debug!(
                line = parser.stats().lines + 1,
                "invalid UTF-8 replaced while reading log"
            );
        }
        parser.feed(&line)?;
    }
    Ok(parser.finish())
}

/// Parses a log file; the handle is released when the scan ends.
pub fn parse_file(path: &Path, sentinel: &str) -> Result<LogRecords, KfsError> {
    let file = File::open(path).map_err(|err| KfsError::io("kfs_parse.open", path, err))?;
    debug!(path = %path.display(), "scanning log");
    parse_reader(BufReader::new(file), sentinel).map_err(|err| match err {
        KfsError::Io(info) => KfsError::Io(info.with_context("path", path.display().to_string())),
        KfsError::Parse(info) => {
            KfsError::Parse(info.with_context("path", path.display().to_string()))
        }
        other => other,
    })
}
