// src/acquisition/line_decoder.rs
//! Line framing for newline-delimited ASCII samples
//!
//! The device emits one integer amplitude per line. Lines that fail UTF-8
//! decoding or integer validation are dropped and counted instead of
//! aborting the recording; a partial line interrupted by a read timeout is
//! kept and completed on a later poll.

use std::io::{BufRead, BufReader, ErrorKind, Read};

use super::AcquisitionError;

/// Outcome of a single decoder poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SamplePoll {
    /// A complete, valid sample line.
    Sample(f64),
    /// No complete line yet (timeout, partial line, or a dropped bad line).
    Pending,
    /// The source is exhausted.
    Eof,
}

/// Decodes framed samples from any byte source.
pub struct LineDecoder<R> {
    reader: BufReader<R>,
    pending: Vec<u8>,
    decode_errors: usize,
}

impl<R: Read> LineDecoder<R> {
    /// Wrap a byte source (a serial port, or any reader in tests).
    pub fn new(source: R) -> Self {
        Self {
            reader: BufReader::new(source),
            pending: Vec::with_capacity(16),
            decode_errors: 0,
        }
    }

    /// Try to produce the next sample.
    ///
    /// Timeouts surface as `Pending` so callers can check their stop flag
    /// between reads; only real I/O failures become errors.
    pub fn poll(&mut self) -> Result<SamplePoll, AcquisitionError> {
        match self.reader.read_until(b'\n', &mut self.pending) {
            Ok(0) => Ok(SamplePoll::Eof),
            Ok(_) => {
                if self.pending.last() != Some(&b'\n') {
                    // Hit EOF mid-line; an incomplete trailing line is dropped.
                    return Ok(SamplePoll::Pending);
                }
                let parsed = parse_sample_line(&self.pending);
                self.pending.clear();
                match parsed {
                    Some(value) => Ok(SamplePoll::Sample(value)),
                    None => {
                        self.decode_errors += 1;
                        Ok(SamplePoll::Pending)
                    }
                }
            }
            Err(err)
                if matches!(
                    err.kind(),
                    ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                ) =>
            {
                Ok(SamplePoll::Pending)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Lines dropped for failing UTF-8 decoding or integer validation.
    pub fn decode_errors(&self) -> usize {
        self.decode_errors
    }
}

/// Accept only an optionally negated run of ASCII digits, like the firmware
/// emits; anything else (prompts, boot noise, torn lines) is invalid.
fn parse_sample_line(raw: &[u8]) -> Option<f64> {
    let line = std::str::from_utf8(raw).ok()?.trim();
    let digits = line.strip_prefix('-').unwrap_or(line);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    line.parse::<i64>().ok().map(|v| v as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn drain(decoder: &mut LineDecoder<Cursor<Vec<u8>>>) -> Vec<f64> {
        let mut values = Vec::new();
        loop {
            match decoder.poll().unwrap() {
                SamplePoll::Sample(v) => values.push(v),
                SamplePoll::Pending => continue,
                SamplePoll::Eof => return values,
            }
        }
    }

    #[test]
    fn test_decodes_valid_lines() {
        let mut decoder = LineDecoder::new(Cursor::new(b"512\n-40\n1023\n".to_vec()));
        assert_eq!(drain(&mut decoder), vec![512.0, -40.0, 1023.0]);
        assert_eq!(decoder.decode_errors(), 0);
    }

    #[test]
    fn test_malformed_lines_counted_and_skipped() {
        let input = b"100\ngarbage\n\n12.5\n-\n200\n".to_vec();
        let mut decoder = LineDecoder::new(Cursor::new(input));
        assert_eq!(drain(&mut decoder), vec![100.0, 200.0]);
        assert_eq!(decoder.decode_errors(), 4);
    }

    #[test]
    fn test_invalid_utf8_counted() {
        let input = vec![b'5', b'\n', 0xFF, 0xFE, b'\n', b'7', b'\n'];
        let mut decoder = LineDecoder::new(Cursor::new(input));
        assert_eq!(drain(&mut decoder), vec![5.0, 7.0]);
        assert_eq!(decoder.decode_errors(), 1);
    }

    #[test]
    fn test_windows_line_endings() {
        let mut decoder = LineDecoder::new(Cursor::new(b"300\r\n301\r\n".to_vec()));
        assert_eq!(drain(&mut decoder), vec![300.0, 301.0]);
    }

    #[test]
    fn test_partial_trailing_line_dropped() {
        let mut decoder = LineDecoder::new(Cursor::new(b"42\n99".to_vec()));
        assert_eq!(drain(&mut decoder), vec![42.0]);
    }

    #[test]
    fn test_plus_prefix_rejected() {
        // The firmware never emits '+'; treat it as line noise.
        let mut decoder = LineDecoder::new(Cursor::new(b"+17\n18\n".to_vec()));
        assert_eq!(drain(&mut decoder), vec![18.0]);
        assert_eq!(decoder.decode_errors(), 1);
    }
}
