//! Lazy line reader over the child's combined output.

use std::io::{self, BufRead, BufReader, Read};

/// Iterator of output lines with the terminator removed.
///
/// Bytes are decoded as lossy UTF-8. Not restartable: once it has yielded
/// `None` or an error, the underlying reader is exhausted.
pub struct OutputLines<R> {
    reader: BufReader<R>,
    buf: Vec<u8>,
    done: bool,
}

impl<R: Read> OutputLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            buf: Vec::new(),
            done: false,
        }
    }
}

impl<R: Read> Iterator for OutputLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                if self.buf.ends_with(b"\n") {
                    self.buf.pop();
                    if self.buf.ends_with(b"\r") {
                        self.buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
