#![no_main]
use jdwarn_log::WarningParser;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Whole-input and split-input parsing must not panic and must agree.
    let s = String::from_utf8_lossy(data);
    let whole = WarningParser::new().parse(&s);

    let mid = s.len() / 2;
    let split = (0..=mid).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0);
    let mut parser = WarningParser::new();
    let mut streamed = parser.update(&s[..split]);
    streamed.extend(parser.update(&s[split..]));
    streamed.extend(parser.finish());

    assert_eq!(whole, streamed);
});
