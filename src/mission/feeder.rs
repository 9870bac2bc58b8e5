//! Chunked line feeder.
//!
//! Reads a byte source in bounded chunks, decodes it incrementally as UTF-8
//! and hands out complete lines with their 1-based line numbers.
//!
//! # Chunk boundaries
//!
//! Two things can straddle a chunk boundary and both are carried forward:
//!
//! - a partial multi-byte character (kept inside the `encoding_rs` decoder)
//! - a partial line (kept in the feeder's text buffer)
//!
//! Lines end at `\n`; a trailing `\r` is stripped, so `\r\n` works even when
//! the two bytes land in different chunks.

use std::io::{self, ErrorKind, Read};

use encoding_rs::{CoderResult, Decoder, UTF_8};

use super::line::LogLine;

/// Default chunk size used when reading a log (4 MiB).
pub const DEFAULT_CHUNK_BYTES: usize = 4 * 1024 * 1024;

/// Incremental byte-to-line splitter.
pub struct LineFeeder {
    decoder: Decoder,
    /// Decoded text not yet emitted (the carried partial line).
    buf: String,
    /// Number of the last emitted line.
    line_number: usize,
}

impl Default for LineFeeder {
    fn default() -> Self {
        Self::new()
    }
}

impl LineFeeder {
    /// Create a feeder. A leading UTF-8 byte order mark is dropped.
    pub fn new() -> Self {
        Self {
            decoder: UTF_8.new_decoder(),
            buf: String::new(),
            line_number: 0,
        }
    }

    /// Number of lines emitted so far.
    pub fn lines_emitted(&self) -> usize {
        self.line_number
    }

    /// Decode one chunk and emit every line it completes.
    pub fn feed<F>(&mut self, bytes: &[u8], on_line: F)
    where
        F: FnMut(LogLine<'_>),
    {
        self.decode(bytes, false);
        self.emit_complete_lines(on_line);
    }

    /// Flush the decoder and emit the carried remainder as a final line,
    /// even without a trailing terminator.
    pub fn finish<F>(&mut self, mut on_line: F)
    where
        F: FnMut(LogLine<'_>),
    {
        self.decode(&[], true);
        self.emit_complete_lines(&mut on_line);

        if !self.buf.is_empty() {
            self.line_number += 1;
            let text = self.buf.strip_suffix('\r').unwrap_or(&self.buf);
            on_line(LogLine::new(self.line_number, text));
            self.buf.clear();
        }
    }

    fn decode(&mut self, bytes: &[u8], last: bool) {
        let mut src = bytes;
        loop {
            let needed = self
                .decoder
                .max_utf8_buffer_length(src.len())
                .unwrap_or_else(|| src.len().saturating_mul(3).saturating_add(4));
            self.buf.reserve(needed);

            let (result, read, _had_replacements) =
                self.decoder.decode_to_string(src, &mut self.buf, last);
            src = &src[read..];

            match result {
                CoderResult::InputEmpty => break,
                CoderResult::OutputFull => continue,
            }
        }
    }

    fn emit_complete_lines<F>(&mut self, mut on_line: F)
    where
        F: FnMut(LogLine<'_>),
    {
        let mut consumed = 0;
        while let Some(offset) = self.buf[consumed..].find('\n') {
            let end = consumed + offset;
            let raw = &self.buf[consumed..end];
            let text = raw.strip_suffix('\r').unwrap_or(raw);

            self.line_number += 1;
            on_line(LogLine::new(self.line_number, text));

            consumed = end + 1;
        }

        if consumed > 0 {
            self.buf.drain(..consumed);
        }
    }
}

/// Read `reader` to the end in chunks of `chunk_bytes`, feeding every line
/// to `on_line`.
///
/// `progress` receives `min(1, bytes_read / total_size)` after each chunk.
/// Returns the total number of bytes read. Read errors are propagated
/// unchanged; `Interrupted` is the only kind that is retried.
pub fn feed_reader<R, F>(
    mut reader: R,
    total_size: u64,
    chunk_bytes: usize,
    mut progress: Option<&mut dyn FnMut(f64)>,
    mut on_line: F,
) -> io::Result<u64>
where
    R: Read,
    F: FnMut(LogLine<'_>),
{
    let mut feeder = LineFeeder::new();
    let mut chunk = vec![0u8; chunk_bytes.max(1)];
    let mut read_total: u64 = 0;

    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        read_total += n as u64;
        feeder.feed(&chunk[..n], &mut on_line);

        if let Some(report) = progress.as_mut() {
            if total_size > 0 {
                report((read_total as f64 / total_size as f64).min(1.0));
            }
        }
    }

    feeder.finish(&mut on_line);
    Ok(read_total)
}
