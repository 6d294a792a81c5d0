//! Reassembly of newline-terminated lines from arbitrary read chunks.

/// Maximum bytes buffered for a single unterminated line.
pub const MAX_LINE_LEN: usize = 4096;

/// Accumulates partial line data between polls.
///
/// Stream transports push whatever a read returned; complete lines come out,
/// the unterminated tail stays buffered until its newline arrives.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(256),
        }
    }

    /// Append `data` and return every line it completed, in order.
    ///
    /// Terminators (`\n` or `\r\n`) are stripped. Invalid UTF-8 is replaced
    /// lossily. If the unterminated tail grows past [`MAX_LINE_LEN`] it is
    /// discarded.
    pub fn push(&mut self, data: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(data);

        let mut lines = Vec::new();
        while let Some(newline_pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line_bytes: Vec<u8> = self.buf.drain(..=newline_pos).collect();
            lines.push(decode_line(&line_bytes));
        }

        if self.buf.len() > MAX_LINE_LEN {
            log::warn!(
                "discarding {} bytes of unterminated input (line too long)",
                self.buf.len()
            );
            self.buf.clear();
        }

        lines
    }

    /// Bytes waiting for a terminator.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Drain the unterminated tail as a final line, once the stream has
    /// ended. Blank tails yield nothing.
    pub fn take_tail(&mut self) -> Option<String> {
        let bytes = std::mem::take(&mut self.buf);
        let line = decode_line(&bytes);
        (!line.trim().is_empty()).then_some(line)
    }
}

/// Split one datagram into lines.
///
/// A datagram is self-contained: its end terminates the last line even
/// without a trailing newline. Blank segments are dropped.
pub fn split_datagram(data: &[u8]) -> Vec<String> {
    data.split(|&b| b == b'\n')
        .map(decode_line)
        .filter(|line| !line.trim().is_empty())
        .collect()
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_complete_line() {
        let mut buf = LineBuffer::new();
        assert_eq!(buf.push(b"VERSION\n"), vec!["VERSION"]);
        assert_eq!(buf.pending(), 0);
    }

    #[test]
    fn multiple_lines_in_one_chunk() {
        let mut buf = LineBuffer::new();
        assert_eq!(
            buf.push(b"RESET\nMENU_UP\nVERSION\n"),
            vec!["RESET", "MENU_UP", "VERSION"]
        );
    }

    #[test]
    fn partial_line_waits_for_newline() {
        let mut buf = LineBuffer::new();
        assert!(buf.push(b"SCREEN").is_empty());
        assert_eq!(buf.pending(), 6);
        assert_eq!(buf.push(b"SHOT\n"), vec!["SCREENSHOT"]);
        assert_eq!(buf.pending(), 0);
    }

    #[test]
    fn tail_kept_after_complete_lines() {
        let mut buf = LineBuffer::new();
        assert_eq!(buf.push(b"MUTE\nVOL"), vec!["MUTE"]);
        assert_eq!(buf.push(b"UME_UP\n"), vec!["VOLUME_UP"]);
    }

    #[test]
    fn crlf_is_stripped() {
        let mut buf = LineBuffer::new();
        assert_eq!(buf.push(b"GET_STATUS\r\n"), vec!["GET_STATUS"]);
    }

    #[test]
    fn empty_lines_are_returned() {
        let mut buf = LineBuffer::new();
        assert_eq!(buf.push(b"\n\n"), vec!["", ""]);
    }

    #[test]
    fn overlong_tail_is_discarded() {
        let mut buf = LineBuffer::new();
        let junk = vec![b'A'; MAX_LINE_LEN + 1];
        assert!(buf.push(&junk).is_empty());
        assert_eq!(buf.pending(), 0);
        // The next line is unaffected.
        assert_eq!(buf.push(b"RESET\n"), vec!["RESET"]);
    }

    #[test]
    fn invalid_utf8_is_lossy() {
        let mut buf = LineBuffer::new();
        let lines = buf.push(b"SHOW_MSG \xff\n");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("SHOW_MSG "));
    }

    #[test]
    fn tail_is_flushed_at_end_of_stream() {
        let mut buf = LineBuffer::new();
        assert_eq!(buf.push(b"MUTE\nVERSION"), vec!["MUTE"]);
        assert_eq!(buf.take_tail().as_deref(), Some("VERSION"));
        assert_eq!(buf.pending(), 0);
        assert_eq!(buf.take_tail(), None);

        buf.push(b"  \r");
        assert_eq!(buf.take_tail(), None);
        assert_eq!(buf.pending(), 0);
    }

    #[test]
    fn datagram_without_newline() {
        assert_eq!(split_datagram(b"VERSION"), vec!["VERSION"]);
    }

    #[test]
    fn datagram_with_several_lines() {
        assert_eq!(
            split_datagram(b"RESET\nGET_STATUS\r\n\nMUTE"),
            vec!["RESET", "GET_STATUS", "MUTE"]
        );
    }

    #[test]
    fn empty_datagram() {
        assert!(split_datagram(b"").is_empty());
        assert!(split_datagram(b"\n\n").is_empty());
    }
}
