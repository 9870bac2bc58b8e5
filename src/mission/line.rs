//! Log line view and timestamp prefix parsing.
//!
//! Every client log line starts with the number of seconds since the game
//! process started, e.g. `1234.567 Script [Info]: ...`. Some lines carry a
//! single `!` before the number.

/// One decoded line of the log together with its 1-based position.
///
/// Borrowed from the feeder's buffer; it is consumed immediately by the
/// state machine and never retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLine<'a> {
    /// 1-based line number within the whole input.
    pub number: usize,
    /// Line text without its terminator.
    pub text: &'a str,
}

impl<'a> LogLine<'a> {
    /// Create a new line view.
    pub fn new(number: usize, text: &'a str) -> Self {
        Self { number, text }
    }

    /// Timestamp from the line's numeric prefix, if well-formed.
    pub fn time(&self) -> Option<f64> {
        parse_time(self.text)
    }
}

/// Parse the leading `<seconds> ` prefix of a log line.
///
/// Accepts `\d+(\.\d+)?` optionally preceded by `!`, and requires the
/// number to be followed by whitespace. Anything else yields `None`.
pub fn parse_time(line: &str) -> Option<f64> {
    let body = line.strip_prefix('!').unwrap_or(line);
    let bytes = body.as_bytes();

    let int_len = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if int_len == 0 {
        return None;
    }

    let mut end = int_len;
    if bytes.get(end) == Some(&b'.') {
        let frac_len = bytes[end + 1..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if frac_len == 0 {
            return None;
        }
        end += 1 + frac_len;
    }

    match bytes.get(end) {
        Some(b) if b.is_ascii_whitespace() => {}
        _ => return None,
    }

    let value: f64 = body[..end].parse().ok()?;
    value.is_finite().then_some(value)
}
