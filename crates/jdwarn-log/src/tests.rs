use crate::WarningParser;
use crate::ir::{NO_FILE, NO_LINE, Severity, SeveritySummary};
use std::io::Cursor;

#[test]
fn test_parse_empty_log() {
    let result = WarningParser::new().parse("");
    assert!(result.is_empty());
}

#[test]
fn test_parser_default() {
    let result = WarningParser::default().parse("");
    assert!(result.is_empty());
}

#[test]
fn test_parse_without_recognizable_shapes() {
    let log = r#"
[INFO] Scanning for projects...
[INFO] Compiling 42 source files to /work/target/classes
Loading source files for package com.example...
Constructing Javadoc information...
Standard Doclet version 1.8.0_66
Building tree for all the packages and classes...
Generating /work/target/apidocs/com/example/Foo.html...
[INFO] BUILD SUCCESS
    "#;
    assert!(WarningParser::new().parse(log).is_empty());
}

#[test]
fn test_missing_param_description() {
    let log = "/a/Apps.java:686: warning - no description for @param\n";
    let result = WarningParser::new().parse(log);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].line_number, 686);
    assert_eq!(result[0].file_path, "/a/Apps.java");
    assert_eq!(result[0].message, "no description for @param");
    assert_eq!(result[0].severity, Severity::Normal);
    assert_eq!(result[0].category, "JavaDoc");
}

#[test]
fn test_bad_angle_bracket_is_high() {
    let log = "/a/MultiThrottle.java:25: error: bad use of '>'";
    let result = WarningParser::new().parse(log);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].line_number, 25);
    assert_eq!(result[0].severity, Severity::High);
}

#[test]
fn test_duplicate_package_comment_has_no_location() {
    let log = r#"  [javadoc] javadoc: warning - Multiple sources of package comments found for package "org.hamcrest""#;
    let result = WarningParser::new().parse(log);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].file_path, NO_FILE);
    assert_eq!(result[0].line_number, NO_LINE);
    assert!(!result[0].has_file());
}

#[test]
fn test_same_line_twice_is_reported_once() {
    let line = "/a/B.java:3: error: malformed HTML\n";
    let log = format!("{line}{line}[INFO] again\n{line}");
    assert_eq!(WarningParser::new().parse(&log).len(), 1);
}

#[test]
fn test_parse_is_deterministic() {
    let log = "/a/B.java:3: error: malformed HTML\n/a/A.java:1: warning - no description for @param\n";
    let first = WarningParser::new().parse(log);
    let second = WarningParser::new().parse(log);
    assert_eq!(first, second);
    assert_eq!(first[0].file_path, "/a/B.java");
}

#[test]
fn test_output_keeps_log_order_not_severity_order() {
    let log = "/z/Z.java:9: warning - no description for @param\n/a/A.java:1: error: malformed HTML\n";
    let result = WarningParser::new().parse(log);
    assert_eq!(result[0].severity, Severity::Normal);
    assert_eq!(result[1].severity, Severity::High);
}

#[test]
fn test_html_references_are_decoded() {
    let log = r#"/a/B.java:94: warning - @param argument "&lt;code&gt;Foo&lt;/code&gt;" is not a parameter"#;
    let result = WarningParser::new().parse(log);
    assert_eq!(result[0].message, r#"@param argument "<code>Foo</code>" is not a parameter"#);
}

#[test]
fn test_crlf_line_endings() {
    let log = "/a/B.java:3: error: malformed HTML\r\n/a/B.java:4: error: malformed HTML\r\n";
    let result = WarningParser::new().parse(log);
    assert_eq!(result.len(), 2);
    assert_eq!(result[1].message, "malformed HTML");
}

#[test]
fn test_parse_reader_matches_parse() {
    let log = "  [javadoc] /a/B.java:3: warning - Tag @link: can't find x in\n  [javadoc] a.B\n/a/B.java:4: error: malformed HTML\n";
    let from_str = WarningParser::new().parse(log);
    let from_reader = WarningParser::new().parse_reader(Cursor::new(log)).unwrap();
    assert_eq!(from_str, from_reader);
    assert_eq!(from_reader[0].message, "Tag @link: can't find x in a.B");
}

#[test]
fn test_parse_reader_surfaces_read_failure() {
    struct Broken;
    impl std::io::Read for Broken {
        fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk gone"))
        }
    }
    let err = WarningParser::new()
        .parse_reader(std::io::BufReader::new(Broken))
        .unwrap_err();
    assert!(err.to_string().contains("could not read log"));
}

#[test]
fn test_parsers_on_separate_threads() {
    let log = "/a/B.java:3: error: malformed HTML\n/a/A.java:1: warning - no description for @param\n";
    let expected = WarningParser::new().parse(log);
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| WarningParser::new().parse(log)))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_severity_summary() {
    let log = "/a/B.java:3: error: malformed HTML\n/a/A.java:1: warning - no description for @param\n/a/A.java:2: warning - no description for @param\n";
    let summary = SeveritySummary::from_records(&WarningParser::new().parse(log));
    assert_eq!(summary.high, 1);
    assert_eq!(summary.normal, 2);
    assert_eq!(summary.low, 0);
    assert_eq!(summary.total(), 3);
}

#[test]
fn test_severity_serializes_uppercase() {
    let json = serde_json::to_string(&Severity::High).unwrap();
    assert_eq!(json, "\"HIGH\"");
    assert_eq!(Severity::Normal.to_string(), "NORMAL");
}
