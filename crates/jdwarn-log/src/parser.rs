use crate::catalog::{Catalog, RuleKind, normalize_message, strip_task_tag};
use crate::collector::Collector;
use crate::error::ParseError;
use crate::filter::{Candidate, NoiseFilter};
use crate::ir::{DEFAULT_CATEGORY, WarningRecord};
use crate::linefeed::LineFeed;
use serde::{Deserialize, Serialize};
use std::io::BufRead;

/// What to do with a multi-line warning whose continuation never arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContinuationPolicy {
    /// Emit the record with the message captured from the opening line.
    #[default]
    EmitPartial,
    /// Discard the record.
    Drop,
}

/// Per-parser settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Category stamped on every record.
    pub category: String,
    pub continuation: ContinuationPolicy,
    /// Drop candidates found in test-runner output and javac lint warnings.
    pub suppress_noise: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            category: DEFAULT_CATEGORY.to_string(),
            continuation: ContinuationPolicy::default(),
            suppress_noise: true,
        }
    }
}

impl ParserOptions {
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_continuation(mut self, continuation: ContinuationPolicy) -> Self {
        self.continuation = continuation;
        self
    }

    pub fn with_noise_suppression(mut self, enabled: bool) -> Self {
        self.suppress_noise = enabled;
        self
    }
}

enum State {
    Scanning,
    /// An opener matched; the next line completes its message.
    AwaitingContinuation(Candidate),
}

/// A streaming parser for javadoc warnings in build logs.
///
/// `WarningParser` processes log output incrementally or as a whole. Each line
/// is classified against the [`Catalog`], candidates pass through the
/// [`NoiseFilter`], and the [`Collector`] drops repeats. Records come out in
/// the order their first occurrence appears in the log, independent of how
/// the input was chunked.
pub struct WarningParser {
    options: ParserOptions,
    catalog: &'static Catalog,
    filter: NoiseFilter,
    collector: Collector,
    state: State,
    buffer: String,
    lines_seen: usize,
}

impl Default for WarningParser {
    /// Creates a parser with default options.
    fn default() -> Self {
        Self::new()
    }
}

impl WarningParser {
    /// Creates a new parser with default options.
    pub fn new() -> Self {
        Self::with_options(ParserOptions::default())
    }

    pub fn with_options(options: ParserOptions) -> Self {
        Self {
            filter: NoiseFilter::new(options.suppress_noise),
            options,
            catalog: Catalog::javadoc(),
            collector: Collector::new(),
            state: State::Scanning,
            buffer: String::new(),
            lines_seen: 0,
        }
    }

    /// Appends input to the internal buffer and processes every complete line.
    ///
    /// # Arguments
    ///
    /// * `input` - A slice of the log content to append.
    ///
    /// # Returns
    ///
    /// The records first seen in the lines this call completed.
    pub fn update(&mut self, input: &str) -> Vec<WarningRecord> {
        self.buffer.push_str(input);
        let mut records = Vec::new();

        // Only whole lines are classified; the tail waits for more input.
        let Some(last_nl) = self.buffer.rfind('\n') else {
            return records;
        };
        let chunk: String = self.buffer.drain(..=last_nl).collect();
        for line in chunk.lines() {
            self.feed_line(line, &mut records);
        }
        records
    }

    /// Consumes the parser, treating any buffered text as the final line.
    ///
    /// A multi-line warning still waiting for its continuation is resolved
    /// according to [`ParserOptions::continuation`].
    ///
    /// # Returns
    ///
    /// The records first seen in the flushed remainder.
    pub fn finish(mut self) -> Vec<WarningRecord> {
        let mut records = Vec::new();

        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            let line = rest.strip_suffix('\r').unwrap_or(rest.as_str());
            self.feed_line(line, &mut records);
        }

        if let State::AwaitingContinuation(candidate) =
            std::mem::replace(&mut self.state, State::Scanning)
        {
            match self.options.continuation {
                ContinuationPolicy::EmitPartial => {
                    log::debug!(
                        "input ended before continuation of {:?}, emitting partial message",
                        candidate.record.message
                    );
                    self.emit(candidate, &mut records);
                }
                ContinuationPolicy::Drop => {
                    log::debug!(
                        "input ended before continuation of {:?}, dropping it",
                        candidate.record.message
                    );
                }
            }
        }

        log::info!(
            "scanned {} lines: {} warnings, {} duplicates dropped",
            self.lines_seen,
            self.collector.len(),
            self.collector.duplicates()
        );
        records
    }

    /// Parses a complete log held in memory.
    ///
    /// # Arguments
    ///
    /// * `input` - The full content of the log.
    ///
    /// # Returns
    ///
    /// All distinct [`WarningRecord`]s in first-occurrence order.
    pub fn parse(mut self, input: &str) -> Vec<WarningRecord> {
        let mut records = self.update(input);
        records.extend(self.finish());
        records
    }

    /// Parses a log line by line from a reader.
    ///
    /// Meant for a fresh parser; text left over from earlier [`update`](Self::update)
    /// calls is flushed after the reader's lines.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Input`] if reading fails. Records found before the
    /// failure are discarded with the parser.
    pub fn parse_reader<R: BufRead>(mut self, reader: R) -> Result<Vec<WarningRecord>, ParseError> {
        let mut records = Vec::new();
        for line in LineFeed::new(reader) {
            let line = line?;
            self.feed_line(&line, &mut records);
        }
        records.extend(self.finish());
        Ok(records)
    }

    fn feed_line(&mut self, line: &str, records: &mut Vec<WarningRecord>) {
        self.lines_seen += 1;
        let in_test_output = self.filter.observe(line);

        match std::mem::replace(&mut self.state, State::Scanning) {
            State::AwaitingContinuation(mut candidate) => {
                // Bound unconditionally, even if the line would match a rule itself.
                let continuation = normalize_message(strip_task_tag(line));
                if !continuation.is_empty() {
                    candidate.record.message.push(' ');
                    candidate.record.message.push_str(&continuation);
                }
                self.emit(candidate, records);
            }
            State::Scanning => {
                let catalog: &'static Catalog = self.catalog;
                let Some(classified) = catalog.classify(line) else {
                    return;
                };
                log::debug!(
                    "line {}: rule `{}` matched {:?}",
                    self.lines_seen,
                    classified.rule.id,
                    classified.extraction.message
                );

                let extraction = classified.extraction;
                let candidate = Candidate {
                    record: WarningRecord::new(
                        extraction.file_path,
                        extraction.line_number,
                        extraction.message,
                        classified.rule.severity,
                        self.options.category.as_str(),
                    ),
                    in_test_output,
                };

                match classified.rule.kind {
                    RuleKind::SingleLine => self.emit(candidate, records),
                    RuleKind::MultiLineOpener => {
                        self.state = State::AwaitingContinuation(candidate);
                    }
                }
            }
        }
    }

    fn emit(&mut self, candidate: Candidate, records: &mut Vec<WarningRecord>) {
        if !self.filter.admits(&candidate) {
            return;
        }
        if let Some(record) = self.collector.admit(candidate.record) {
            records.push(record);
        }
    }
}
