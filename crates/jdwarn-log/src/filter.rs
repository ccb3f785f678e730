use crate::ir::WarningRecord;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Ant test tasks tag every line they print.
    static ref TEST_TASK_TAG: Regex =
        Regex::new(r"^\s*\[(?:junit|junitlauncher|testng|surefire|failsafe)\]")
            .expect("test task tag pattern must compile");

    /// The Surefire banner printed once before its test classes run.
    static ref TEST_BANNER: Regex =
        Regex::new(r"^\s*(?:\[INFO\]\s*)?T E S T S\s*$").expect("test banner pattern must compile");

    /// Lines that open a block of test-runner output on their own.
    static ref TEST_HEADER: Regex = Regex::new(
        r"^\s*(?:\[INFO\]\s*)?(?:Testsuite:|Testcase:|-{5,} Standard (?:Output|Error) -{5,})"
    )
    .expect("test header pattern must compile");

    /// A Surefire test class header; only meaningful after the banner.
    static ref TEST_CLASS: Regex =
        Regex::new(r"^\s*(?:\[INFO\]\s*)?Running (?:[\w$]+\.)+[\w$]+\s*$")
            .expect("test class pattern must compile");

    /// Lines that close a block of test-runner output.
    static ref TEST_FOOTER: Regex =
        Regex::new(r"^\s*(?:\[\w+\]\s*)?(?:Tests run:|Results\s*:|-{5,} -{5,} -{5,})")
            .expect("test footer pattern must compile");

    /// Markers of javadoc itself or of a new build step.
    static ref BUILD_STEP: Regex = Regex::new(
        r"^\s*(?:\[javadoc\]|Generating Javadoc|Constructing Javadoc information|Loading source file|>\s*Task\s+:|(?:\[INFO\]\s*)?---\s+\S)"
    )
    .expect("build step pattern must compile");

    /// javac lint categories, e.g. `[deprecation]` or `[rawtypes]`.
    static ref LINT_TAG: Regex = Regex::new(r"^\[[a-z][a-z-]*\]").expect("lint tag pattern must compile");
}

/// A record produced by the classifier, before filtering and deduplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub record: WarningRecord,
    /// Whether the line that produced the record was inside test-runner output.
    pub in_test_output: bool,
}

/// Drops candidates that look like javadoc output but come from somewhere else.
///
/// The filter watches every physical line to know whether the log is currently
/// inside test-runner output, and rejects candidates produced there as well as
/// javac lint warnings.
#[derive(Debug, Clone)]
pub struct NoiseFilter {
    enabled: bool,
    in_test_output: bool,
    /// A Surefire banner was seen in the current build step.
    banner_seen: bool,
}

impl Default for NoiseFilter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl NoiseFilter {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            in_test_output: false,
            banner_seen: false,
        }
    }

    /// Feeds one physical line and reports whether it belongs to test-runner output.
    pub fn observe(&mut self, line: &str) -> bool {
        if !self.enabled {
            return false;
        }
        if TEST_TASK_TAG.is_match(line) {
            return true;
        }
        if BUILD_STEP.is_match(line) {
            if self.in_test_output {
                log::trace!("leaving test output at {:?}", line);
            }
            self.in_test_output = false;
            self.banner_seen = false;
            return false;
        }
        if TEST_BANNER.is_match(line) {
            self.banner_seen = true;
            return self.enter(line);
        }
        if TEST_HEADER.is_match(line) || (self.banner_seen && TEST_CLASS.is_match(line)) {
            return self.enter(line);
        }
        if self.in_test_output && TEST_FOOTER.is_match(line) {
            log::trace!("leaving test output at {:?}", line);
            self.in_test_output = false;
            return true;
        }
        self.in_test_output
    }

    fn enter(&mut self, line: &str) -> bool {
        if !self.in_test_output {
            log::trace!("entering test output at {:?}", line);
        }
        self.in_test_output = true;
        true
    }

    pub fn admits(&self, candidate: &Candidate) -> bool {
        if !self.enabled {
            return true;
        }
        if candidate.in_test_output {
            log::debug!("dropping test-runner output: {}", candidate.record.message);
            return false;
        }
        if LINT_TAG.is_match(&candidate.record.message) {
            log::debug!("dropping javac lint warning: {}", candidate.record.message);
            return false;
        }
        true
    }
}
