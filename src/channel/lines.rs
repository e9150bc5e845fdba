//! Reassemble newline-terminated lines from an arbitrary byte stream.

/// Longest partial line kept between reads.
pub const MAX_LINE: usize = 1024;

#[derive(Debug, Default)]
pub struct LineBuffer {
    partial: Vec<u8>,
    overflowed: bool,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, calling `on_line` for every completed line.
    pub fn push(&mut self, mut bytes: &[u8], mut on_line: impl FnMut(&str)) {
        while let Some(pos) = bytes.iter().position(|&b| b == b'\n') {
            self.append(&bytes[..pos]);
            self.emit(&mut on_line);
            bytes = &bytes[pos + 1..];
        }
        self.append(bytes);
    }

    /// Emit whatever is left as a final line (writer went away).
    pub fn flush(&mut self, mut on_line: impl FnMut(&str)) {
        if !self.partial.is_empty() || self.overflowed {
            self.emit(&mut on_line);
        }
    }

    fn append(&mut self, bytes: &[u8]) {
        if self.overflowed {
            return;
        }
        if self.partial.len() + bytes.len() > MAX_LINE {
            log::warn!("Command line longer than {} bytes, discarding", MAX_LINE);
            self.partial.clear();
            self.overflowed = true;
            return;
        }
        self.partial.extend_from_slice(bytes);
    }

    fn emit(&mut self, on_line: &mut impl FnMut(&str)) {
        if !self.overflowed {
            on_line(&String::from_utf8_lossy(&self.partial));
        }
        self.partial.clear();
        self.overflowed = false;
    }
}
