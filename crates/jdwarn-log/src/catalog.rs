use crate::ir::{NO_FILE, NO_LINE, Severity};
use lazy_static::lazy_static;
use regex::{Regex, RegexSet};

/// Location prefix shared by every rule that can carry file context.
///
/// Accepts an optional build-tool tag (`[javadoc]`, `[WARNING]`, ...), then either
/// `<path>.java[:<line>]` / `<path>.html[:<line>]` or the bare tool name `javadoc`.
const LOCATION: &str = r"^\s*(?:\[(?:javadoc|WARNING|ERROR|INFO)\]\s*)?(?:(?P<file>(?:[A-Za-z]:)?[^:\s][^:]*\.(?:java|html))(?::(?P<line>\d+))?|javadoc)\s*:\s*";

/// Prefix for shapes that javadoc prints without any file context.
const BARE: &str = r"^\s*(?:\[\w+\]\s*)?(?:javadoc\s*:\s*)?(?:warning\s*[-:]\s*)?";

lazy_static! {
    static ref JAVADOC_CATALOG: Catalog = javadoc_rules()
        .and_then(Catalog::new)
        .expect("built-in javadoc rules must compile");

    static ref TASK_TAG: Regex = Regex::new(r"^\s*\[\w+\]\s*").expect("task tag pattern must compile");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// The whole warning sits on the matched line.
    SingleLine,
    /// The matched line opens a warning whose message ends on the next line.
    MultiLineOpener,
}

/// Names the capture groups a rule extracts from.
///
/// `file` and `line` are `None` for shapes that never carry location context;
/// such records always get [`NO_FILE`] and [`NO_LINE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupMapping {
    pub file: Option<&'static str>,
    pub line: Option<&'static str>,
    pub message: &'static str,
}

impl GroupMapping {
    pub const LOCATED: GroupMapping = GroupMapping {
        file: Some("file"),
        line: Some("line"),
        message: "message",
    };

    pub const UNLOCATED: GroupMapping = GroupMapping {
        file: None,
        line: None,
        message: "message",
    };
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub id: &'static str,
    pub kind: RuleKind,
    pub severity: Severity,
    pub mapping: GroupMapping,
    regex: Regex,
}

impl Rule {
    pub fn new(
        id: &'static str,
        kind: RuleKind,
        pattern: &str,
        mapping: GroupMapping,
        severity: Severity,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            id,
            kind,
            severity,
            mapping,
            regex: Regex::new(pattern)?,
        })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Applies the rule to one line and pulls out location and message.
    ///
    /// Returns `None` when the line does not match or the message normalizes
    /// to nothing.
    pub fn extract(&self, line: &str) -> Option<Extraction> {
        let caps = self.regex.captures(line)?;

        let file_path = self
            .mapping
            .file
            .and_then(|group| caps.name(group))
            .map(|m| m.as_str().trim())
            .filter(|path| !path.is_empty())
            .unwrap_or(NO_FILE)
            .to_string();

        let line_number = self
            .mapping
            .line
            .and_then(|group| caps.name(group))
            .map(|m| parse_line_number(m.as_str()))
            .unwrap_or(NO_LINE);

        let message = normalize_message(caps.name(self.mapping.message)?.as_str());
        if message.is_empty() {
            return None;
        }

        Some(Extraction {
            file_path,
            line_number,
            message,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub file_path: String,
    pub line_number: u32,
    pub message: String,
}

/// The winning rule for a line together with what it extracted.
#[derive(Debug, Clone)]
pub struct Classification<'a> {
    pub rule: &'a Rule,
    pub extraction: Extraction,
}

/// An ordered rule list; earlier rules take precedence over later ones.
#[derive(Debug)]
pub struct Catalog {
    rules: Vec<Rule>,
    screen: RegexSet,
}

impl Catalog {
    pub fn new(rules: Vec<Rule>) -> Result<Self, regex::Error> {
        let screen = RegexSet::new(rules.iter().map(Rule::pattern))?;
        Ok(Self { rules, screen })
    }

    /// The built-in javadoc rule set, compiled once per process.
    pub fn javadoc() -> &'static Catalog {
        &JAVADOC_CATALOG
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Finds the first rule, in declared order, that matches `line` and
    /// yields a usable extraction.
    pub fn classify(&self, line: &str) -> Option<Classification<'_>> {
        // SetMatches iterates in ascending pattern index, i.e. declared order.
        self.screen.matches(line).into_iter().find_map(|index| {
            let rule = &self.rules[index];
            rule.extract(line)
                .map(|extraction| Classification { rule, extraction })
        })
    }
}

fn located(keyword: &str, body: &str) -> String {
    format!(r"{LOCATION}{keyword}\s*[-:]\s*{body}")
}

fn bare(body: &str) -> String {
    format!("{BARE}{body}")
}

fn javadoc_rules() -> Result<Vec<Rule>, regex::Error> {
    use RuleKind::{MultiLineOpener, SingleLine};
    use Severity::{High, Normal};

    Ok(vec![
        Rule::new(
            "unresolved-link-wrapped",
            MultiLineOpener,
            &located("warning", r"(?P<message>Tag @\w+: can't find .*\sin)\s*$"),
            GroupMapping::LOCATED,
            Normal,
        )?,
        Rule::new(
            "unresolved-link",
            SingleLine,
            &located("warning", r"(?P<message>Tag @\w+: can't find \S.*)$"),
            GroupMapping::LOCATED,
            Normal,
        )?,
        Rule::new(
            "duplicate-package-comment",
            SingleLine,
            &bare(r#"(?P<message>Multiple sources of package comments found for package "[^"]*")"#),
            GroupMapping::UNLOCATED,
            Normal,
        )?,
        Rule::new(
            "tag-text-too-long",
            SingleLine,
            &bare(r"(?P<message>Text of tag @\S+ in class \S+ is too long!)"),
            GroupMapping::UNLOCATED,
            Normal,
        )?,
        Rule::new(
            "bad-angle-bracket",
            SingleLine,
            &located("(?:warning|error)", r"(?P<message>bad use of '>')"),
            GroupMapping::LOCATED,
            High,
        )?,
        Rule::new(
            "malformed-html",
            SingleLine,
            &located("(?:warning|error)", r"(?P<message>malformed HTML)"),
            GroupMapping::LOCATED,
            High,
        )?,
        Rule::new(
            "missing-param-description",
            SingleLine,
            &located("warning", r"(?P<message>no description for @\w+)"),
            GroupMapping::LOCATED,
            Normal,
        )?,
        Rule::new(
            "unknown-tag",
            SingleLine,
            &located("warning", r"(?P<message>(?:\S+ )?is an unknown tag\.)"),
            GroupMapping::LOCATED,
            Normal,
        )?,
        Rule::new(
            "not-a-parameter",
            SingleLine,
            &located("warning", r#"(?P<message>@param argument "[^"]*" is not a parameter.*)$"#),
            GroupMapping::LOCATED,
            Normal,
        )?,
        Rule::new(
            "javadoc-error",
            SingleLine,
            &located("error", r"(?P<message>\S.*)$"),
            GroupMapping::LOCATED,
            High,
        )?,
        Rule::new(
            "javadoc-warning",
            SingleLine,
            &located("warning", r"(?P<message>\S.*)$"),
            GroupMapping::LOCATED,
            Normal,
        )?,
    ])
}

/// Removes a leading build-tool tag such as `[javadoc]` and surrounding blanks.
pub fn strip_task_tag(line: &str) -> &str {
    match TASK_TAG.find(line) {
        Some(tag) => line[tag.end()..].trim(),
        None => line.trim(),
    }
}

fn parse_line_number(token: &str) -> u32 {
    token.parse::<u32>().unwrap_or_else(|err| {
        log::debug!("line number {:?} is not usable ({}), using {}", token, err, NO_LINE);
        NO_LINE
    })
}

/// Trims a message and decodes HTML character references javadoc echoes back
/// from doc comments (`&lt;code&gt;` and friends).
pub fn normalize_message(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.contains('&') {
        return trimmed.to_string();
    }

    let mut out = String::with_capacity(trimmed.len());
    let mut rest = trimmed;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match decode_reference(tail) {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}

/// Decodes the character reference at the start of `tail` (which begins with `&`).
/// Returns the character and the number of bytes consumed.
fn decode_reference(tail: &str) -> Option<(char, usize)> {
    let end = tail
        .char_indices()
        .take(12)
        .find(|&(_, c)| c == ';')
        .map(|(i, _)| i)?;
    let name = &tail[1..end];

    let ch = match name {
        "lt" => '<',
        "gt" => '>',
        "amp" => '&',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        _ => {
            let code = match name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => name.strip_prefix('#')?.parse::<u32>().ok()?,
            };
            char::from_u32(code)?
        }
    };
    Some((ch, end + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_for(line: &str) -> Option<&'static str> {
        Catalog::javadoc().classify(line).map(|c| c.rule.id)
    }

    #[test]
    fn test_builtin_catalog_compiles_in_order() {
        let ids: Vec<_> = Catalog::javadoc().rules().iter().map(|r| r.id).collect();
        assert_eq!(ids.first(), Some(&"unresolved-link-wrapped"));
        assert_eq!(ids.last(), Some(&"javadoc-warning"));
        assert_eq!(ids.len(), 11);
    }

    #[test]
    fn test_specific_shapes_win_over_generic() {
        let cases = [
            ("/a/B.java:3: warning - no description for @param", "missing-param-description"),
            ("/a/B.java:3: error: bad use of '>'", "bad-angle-bracket"),
            ("/a/B.java:3: error: malformed HTML", "malformed-html"),
            ("/a/B.java:3: warning - @(#) is an unknown tag.", "unknown-tag"),
            ("/a/B.java:3: warning - is an unknown tag.", "unknown-tag"),
            (r#"/a/B.java:3: warning - @param argument "x" is not a parameter"#, "not-a-parameter"),
            ("/a/B.java:3: warning - Tag @link: can't find foo in a.B", "unresolved-link"),
            ("/a/B.java:3: warning - Tag @see: can't find foo in", "unresolved-link-wrapped"),
            ("/a/B.java:3: error: reference not found", "javadoc-error"),
            ("/a/B.java:3: warning: no @return", "javadoc-warning"),
        ];
        for (line, expected) in cases {
            assert_eq!(rule_for(line), Some(expected), "line: {line}");
        }
    }

    #[test]
    fn test_unlocated_shapes() {
        let line = r#"  [javadoc] javadoc: warning - Multiple sources of package comments found for package "org.hamcrest""#;
        let classified = Catalog::javadoc().classify(line).unwrap();
        assert_eq!(classified.rule.id, "duplicate-package-comment");
        assert_eq!(classified.extraction.file_path, NO_FILE);
        assert_eq!(classified.extraction.line_number, NO_LINE);

        let line = "Text of tag @sys.prop in class a.b.C is too long!";
        assert_eq!(rule_for(line), Some("tag-text-too-long"));
    }

    #[test]
    fn test_location_prefix_variants() {
        let lines = [
            "  [javadoc] /src/Foo.java:12: warning - no description for @param",
            "[WARNING] /src/Foo.java:12: warning: no description for @param",
            "/src/Foo.java:12: warning: no description for @param",
            r"C:\work\src\Foo.java:12: warning - no description for @param",
            "/jobs/JavaDoc check/src/Foo.java:12: warning: no description for @param",
        ];
        for line in lines {
            let c = Catalog::javadoc().classify(line).unwrap();
            assert_eq!(c.extraction.line_number, 12, "line: {line}");
            assert!(c.extraction.file_path.ends_with("Foo.java"), "line: {line}");
            assert_eq!(c.extraction.message, "no description for @param");
        }
    }

    #[test]
    fn test_unrelated_lines_do_not_classify() {
        let lines = [
            "",
            "[INFO] BUILD SUCCESS",
            "Generating /target/apidocs/index.html...",
            "[WARNING] /src/Foo.java:[12,5] unchecked conversion",
            "8 warnings",
            "     * @param container",
            "       ^",
            "java.lang.IllegalStateException: warning - boom",
        ];
        for line in lines {
            assert!(rule_for(line).is_none(), "line: {line}");
        }
    }

    #[test]
    fn test_line_number_overflow_falls_back() {
        let line = "/src/Foo.java:99999999999999999999: warning - no description for @param";
        let c = Catalog::javadoc().classify(line).unwrap();
        assert_eq!(c.extraction.line_number, NO_LINE);
        assert_eq!(c.extraction.file_path, "/src/Foo.java");
    }

    #[test]
    fn test_normalize_message_decodes_references() {
        assert_eq!(normalize_message("  plain  "), "plain");
        assert_eq!(normalize_message("&lt;code&gt;A &amp; B&lt;/code&gt;"), "<code>A & B</code>");
        assert_eq!(normalize_message("it&#39;s &#x41;&quot;"), "it's A\"");
        assert_eq!(normalize_message("R&D; fish & chips"), "R&D; fish & chips");
        assert_eq!(normalize_message("&nbsp;x&nbsp;"), "x");
    }

    #[test]
    fn test_strip_task_tag() {
        assert_eq!(strip_task_tag("  [javadoc] a.b.C"), "a.b.C");
        assert_eq!(strip_task_tag("  a.b.C  "), "a.b.C");
    }
}
