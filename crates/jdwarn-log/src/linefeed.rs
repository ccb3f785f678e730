use std::io::{self, BufRead};

/// Lazily splits a reader into lines.
///
/// Line terminators (`\n` or `\r\n`) are removed. Bytes that are not valid
/// UTF-8 are replaced rather than rejected, so a log with a stray Latin-1
/// character still parses. Only I/O failures surface as errors.
pub struct LineFeed<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> LineFeed<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for LineFeed<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                }
                if self.buf.last() == Some(&b'\r') {
                    self.buf.pop();
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
