#![forbid(unsafe_code)]

//! Input parser state machine.
//!
//! Decodes raw terminal bytes into [`Event`] values. The parser is fed one
//! byte at a time by the main loop, which makes multi-byte sequences
//! (escape sequences and UTF-8 codepoints) span several loop iterations
//! without any lookahead or re-reads.
//!
//! Cursor position reports (`ESC [ row ; col R`) flow through the same
//! state machine as keystrokes. That is what disambiguates a status reply
//! from user input arriving in the same byte stream: a left-arrow that lands
//! in the middle of a report wait still decodes as a left-arrow event and is
//! queued, never misread as coordinates.
//!
//! Malformed or unrecognized sequences are discarded without effect.

use crate::event::{Event, KeyCode};
use crate::line_buffer::is_continuation;

/// Cap on accumulated CSI parameter bytes; longer sequences are discarded.
const MAX_CSI_LEN: usize = 64;

/// Parser states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ParserState {
    /// Normal character input.
    #[default]
    Ground,
    /// After ESC (0x1B).
    Escape,
    /// After ESC [ — collecting CSI parameters.
    Csi,
    /// After ESC O (SS3 introducer).
    Ss3,
    /// Collecting a UTF-8 multi-byte sequence.
    Utf8 {
        /// Bytes collected so far.
        collected: u8,
        /// Total bytes expected.
        expected: u8,
    },
}

/// Terminal input parser.
#[derive(Debug)]
pub struct InputParser {
    state: ParserState,
    /// CSI parameter accumulator.
    buffer: Vec<u8>,
    /// UTF-8 bytes collected so far.
    utf8_buffer: [u8; 4],
}

impl Default for InputParser {
    fn default() -> Self {
        Self::new()
    }
}

impl InputParser {
    /// Create a new parser in the ground state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: ParserState::Ground,
            buffer: Vec::with_capacity(MAX_CSI_LEN),
            utf8_buffer: [0; 4],
        }
    }

    /// Parse input bytes and return any completed events.
    pub fn parse(&mut self, input: &[u8]) -> Vec<Event> {
        let mut events = Vec::new();
        for &byte in input {
            if let Some(event) = self.process_byte(byte) {
                events.push(event);
            }
        }
        events
    }

    /// Process a single byte and optionally return an event.
    pub fn process_byte(&mut self, byte: u8) -> Option<Event> {
        match self.state {
            ParserState::Ground => self.process_ground(byte),
            ParserState::Escape => self.process_escape(byte),
            ParserState::Csi => self.process_csi(byte),
            ParserState::Ss3 => self.process_ss3(byte),
            ParserState::Utf8 {
                collected,
                expected,
            } => self.process_utf8(byte, collected, expected),
        }
    }

    fn process_ground(&mut self, byte: u8) -> Option<Event> {
        match byte {
            0x1B => {
                self.state = ParserState::Escape;
                None
            }
            b'\n' | b'\r' => Some(Event::Key(KeyCode::Enter)),
            // Backspace (DEL)
            0x7F => Some(Event::Key(KeyCode::Backspace)),
            // Printable ASCII
            0x20..=0x7E => Some(Event::Key(KeyCode::Char(byte as char))),
            // UTF-8 lead bytes
            0xC0..=0xDF => {
                self.utf8_buffer[0] = byte;
                self.state = ParserState::Utf8 {
                    collected: 1,
                    expected: 2,
                };
                None
            }
            0xE0..=0xEF => {
                self.utf8_buffer[0] = byte;
                self.state = ParserState::Utf8 {
                    collected: 1,
                    expected: 3,
                };
                None
            }
            0xF0..=0xF7 => {
                self.utf8_buffer[0] = byte;
                self.state = ParserState::Utf8 {
                    collected: 1,
                    expected: 4,
                };
                None
            }
            // Control bytes we do not map, and stray continuation bytes:
            // a continuation byte on its own is not a codepoint boundary,
            // so it must never surface as input.
            _ => None,
        }
    }

    fn process_escape(&mut self, byte: u8) -> Option<Event> {
        match byte {
            b'[' => {
                self.state = ParserState::Csi;
                self.buffer.clear();
                None
            }
            b'O' => {
                self.state = ParserState::Ss3;
                None
            }
            // Another ESC: stay and wait for an introducer.
            0x1B => None,
            // Unrecognized escape - discard.
            _ => {
                self.state = ParserState::Ground;
                None
            }
        }
    }

    fn process_csi(&mut self, byte: u8) -> Option<Event> {
        if self.buffer.len() >= MAX_CSI_LEN {
            self.state = ParserState::Ground;
            self.buffer.clear();
            return None;
        }

        match byte {
            // Parameter bytes - keep collecting.
            b'0'..=b'9' | b';' | b':' | b'?' => {
                self.buffer.push(byte);
                None
            }
            // Final byte - dispatch.
            b'A'..=b'Z' | b'a'..=b'z' | b'~' => {
                self.state = ParserState::Ground;
                self.parse_csi_final(byte)
            }
            // Invalid - discard.
            _ => {
                self.state = ParserState::Ground;
                self.buffer.clear();
                None
            }
        }
    }

    fn process_ss3(&mut self, byte: u8) -> Option<Event> {
        self.state = ParserState::Ground;
        match byte {
            b'H' => Some(Event::Key(KeyCode::Home)),
            b'F' => Some(Event::Key(KeyCode::End)),
            _ => None,
        }
    }

    /// Dispatch a complete CSI sequence from the accumulated parameters.
    fn parse_csi_final(&mut self, final_byte: u8) -> Option<Event> {
        let params = std::mem::take(&mut self.buffer);

        match final_byte {
            b'C' => Some(Event::Key(KeyCode::Right)),
            b'D' => Some(Event::Key(KeyCode::Left)),
            b'H' => Some(Event::Key(KeyCode::Home)),
            b'F' => Some(Event::Key(KeyCode::End)),
            b'R' => Some(Self::parse_cursor_report(&params)),
            b'~' => match Self::parse_first_param(&params) {
                Some(1) | Some(7) => Some(Event::Key(KeyCode::Home)),
                Some(3) => Some(Event::Key(KeyCode::Delete)),
                Some(4) | Some(8) => Some(Event::Key(KeyCode::End)),
                _ => None,
            },
            _ => None,
        }
    }

    /// Parse `row ; col` out of a position report.
    ///
    /// A malformed reply degrades to whatever parses: missing or garbled
    /// fields fall back to 1, matching the terminal's own 1-indexed origin.
    fn parse_cursor_report(params: &[u8]) -> Event {
        let s = String::from_utf8_lossy(params);
        let mut fields = s.split(';');
        let row = fields.next().and_then(|f| f.parse().ok()).unwrap_or(1);
        let col = fields.next().and_then(|f| f.parse().ok()).unwrap_or(1);
        Event::CursorReport { row, col }
    }

    fn parse_first_param(params: &[u8]) -> Option<u32> {
        let s = std::str::from_utf8(params).ok()?;
        s.split(';').next()?.parse().ok()
    }

    fn process_utf8(&mut self, byte: u8, collected: u8, expected: u8) -> Option<Event> {
        if !is_continuation(byte) {
            // Truncated sequence: drop it and reprocess this byte fresh.
            self.state = ParserState::Ground;
            return self.process_byte(byte);
        }

        self.utf8_buffer[collected as usize] = byte;
        let collected = collected + 1;
        if collected < expected {
            self.state = ParserState::Utf8 {
                collected,
                expected,
            };
            return None;
        }

        self.state = ParserState::Ground;
        match std::str::from_utf8(&self.utf8_buffer[..expected as usize]) {
            Ok(s) => s.chars().next().map(|ch| Event::Key(KeyCode::Char(ch))),
            // Overlong or otherwise invalid encoding - discard.
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_chars_decode_directly() {
        let mut parser = InputParser::new();
        let events = parser.parse(b"hi");
        assert_eq!(
            events,
            vec![
                Event::Key(KeyCode::Char('h')),
                Event::Key(KeyCode::Char('i')),
            ]
        );
    }

    #[test]
    fn arrows_decode_from_csi() {
        let mut parser = InputParser::new();
        assert_eq!(parser.parse(b"\x1b[C"), vec![Event::Key(KeyCode::Right)]);
        assert_eq!(parser.parse(b"\x1b[D"), vec![Event::Key(KeyCode::Left)]);
    }

    #[test]
    fn home_end_delete_variants() {
        let mut parser = InputParser::new();
        assert_eq!(parser.parse(b"\x1b[H"), vec![Event::Key(KeyCode::Home)]);
        assert_eq!(parser.parse(b"\x1b[F"), vec![Event::Key(KeyCode::End)]);
        assert_eq!(parser.parse(b"\x1b[1~"), vec![Event::Key(KeyCode::Home)]);
        assert_eq!(parser.parse(b"\x1b[4~"), vec![Event::Key(KeyCode::End)]);
        assert_eq!(parser.parse(b"\x1b[3~"), vec![Event::Key(KeyCode::Delete)]);
        assert_eq!(parser.parse(b"\x1bOH"), vec![Event::Key(KeyCode::Home)]);
        assert_eq!(parser.parse(b"\x1bOF"), vec![Event::Key(KeyCode::End)]);
    }

    #[test]
    fn del_and_newline() {
        let mut parser = InputParser::new();
        assert_eq!(parser.parse(&[0x7F]), vec![Event::Key(KeyCode::Backspace)]);
        assert_eq!(parser.parse(b"\n"), vec![Event::Key(KeyCode::Enter)]);
        assert_eq!(parser.parse(b"\r"), vec![Event::Key(KeyCode::Enter)]);
    }

    #[test]
    fn utf8_assembles_across_feeds() {
        let mut parser = InputParser::new();
        let bytes = "é".as_bytes();
        assert!(parser.parse(&bytes[..1]).is_empty());
        assert_eq!(
            parser.parse(&bytes[1..]),
            vec![Event::Key(KeyCode::Char('é'))]
        );
    }

    #[test]
    fn stray_continuation_byte_is_silent() {
        let mut parser = InputParser::new();
        assert!(parser.parse(&[0x80]).is_empty());
    }

    #[test]
    fn cursor_report_parses_row_and_col() {
        let mut parser = InputParser::new();
        assert_eq!(
            parser.parse(b"\x1b[12;34R"),
            vec![Event::CursorReport { row: 12, col: 34 }]
        );
    }

    #[test]
    fn malformed_report_degrades_to_partial_values() {
        let mut parser = InputParser::new();
        assert_eq!(
            parser.parse(b"\x1b[7R"),
            vec![Event::CursorReport { row: 7, col: 1 }]
        );
        assert_eq!(
            parser.parse(b"\x1b[;R"),
            vec![Event::CursorReport { row: 1, col: 1 }]
        );
    }

    #[test]
    fn keystroke_interleaved_with_report_decodes_separately() {
        let mut parser = InputParser::new();
        let mut events = parser.parse(b"a\x1b[5;9Rb");
        events.extend(parser.parse(b"\x1b[D"));
        assert_eq!(
            events,
            vec![
                Event::Key(KeyCode::Char('a')),
                Event::CursorReport { row: 5, col: 9 },
                Event::Key(KeyCode::Char('b')),
                Event::Key(KeyCode::Left),
            ]
        );
    }

    #[test]
    fn unrecognized_sequences_are_discarded() {
        let mut parser = InputParser::new();
        assert!(parser.parse(b"\x1b[5Z").is_empty());
        assert!(parser.parse(b"\x1bX").is_empty());
        assert!(parser.parse(b"a").len() == 1);
    }

    #[test]
    fn oversized_csi_never_dispatches() {
        let mut parser = InputParser::new();
        let mut seq = b"\x1b[".to_vec();
        seq.extend(std::iter::repeat_n(b'1', MAX_CSI_LEN + 8));
        seq.push(b'C');
        // Once the cap trips, the sequence is abandoned; the final byte must
        // not dispatch as a right-arrow.
        let events = parser.parse(&seq);
        assert!(!events.contains(&Event::Key(KeyCode::Right)));
    }
}
