//! # jdwarn Log Parser
//!
//! Extracts javadoc warnings from build logs as structured records.
//!
//! ## Overview
//!
//! Build logs from Ant, Maven or a bare JDK `javadoc` run interleave the
//! tool's warnings with everything else the build prints. This crate turns
//! such a log into a list of [`WarningRecord`](ir::WarningRecord)s, each with
//! a file path, line number, message, severity and category. It handles:
//!
//! - **Several output generations**: Ant's `[javadoc] File.java:12: warning - ...`,
//!   JDK 8's `File.java:12: warning: ...` / `error: ...`, Maven's `[WARNING]` prefix
//! - **Warnings without location**: package-level warnings get path `-` and line `0`
//! - **Wrapped warnings**: an unresolved `@link` split over two lines becomes one record
//! - **Look-alikes**: test-runner output and javac lint warnings are not reported
//! - **Repeats**: identical warnings are reported once, at their first position
//!
//! ## Architecture
//!
//! ```text
//! text ──► LineFeed ──► Catalog (first matching rule) ──► NoiseFilter ──► Collector ──► Vec<WarningRecord>
//! ```
//!
//! - [`catalog`] - ordered rule list; the first rule matching a line wins
//! - [`parser`] - [`WarningParser`], the streaming classifier and its options
//! - [`filter`] - test-runner and lint suppression
//! - [`collector`] - order-preserving deduplication
//! - [`linefeed`] - lazy line splitting over a reader
//!
//! ## Examples
//!
//! ### One-shot Parsing
//!
//! ```
//! use jdwarn_log::WarningParser;
//! use jdwarn_log::ir::Severity;
//!
//! let log = "  [javadoc] /src/Apps.java:686: warning - no description for @param\n";
//! let records = WarningParser::new().parse(log);
//!
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].line_number, 686);
//! assert_eq!(records[0].severity, Severity::Normal);
//! ```
//!
//! ### Streaming/Incremental Parsing
//!
//! ```
//! use jdwarn_log::WarningParser;
//!
//! let mut parser = WarningParser::new();
//! let mut records = parser.update("/src/A.java:25: error: bad use of '>'\n/src/B.ja");
//! records.extend(parser.update("va:3: error: malformed HTML\n"));
//! records.extend(parser.finish());
//! assert_eq!(records.len(), 2);
//! ```
//!
//! ### Reading From a File
//!
//! ```no_run
//! use jdwarn_log::WarningParser;
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! let file = File::open("build.log")?;
//! let records = WarningParser::new().parse_reader(BufReader::new(file))?;
//! println!("{}", serde_json::to_string_pretty(&records)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Ordered rule catalog.
pub mod catalog;
/// Order-preserving deduplication.
pub mod collector;
pub mod error;
/// Noise suppression.
pub mod filter;
/// Output record types.
pub mod ir;
pub mod linefeed;
/// Streaming parser implementation.
pub mod parser;

#[cfg(test)]
mod tests;

pub use error::ParseError;
pub use ir::{Severity, SeveritySummary, WarningRecord};
pub use parser::{ContinuationPolicy, ParserOptions, WarningParser};

/// Schema version of the serialized [`WarningRecord`].
///
/// Bumped on a MAJOR level when fields are removed or renamed.
pub const SCHEMA_VERSION: &str = "1.0.0";
