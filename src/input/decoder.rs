//! Key decoder state machine
//!
//! States:
//! - Ground: waiting for the first byte of a key
//! - Escape: after ESC, waiting for `[` or `O`
//! - Csi: after `ESC [`, a letter finishes the key, a digit moves on
//! - CsiDigit: after `ESC [ <digit>`, waiting for the closing `~`
//! - Ss3: after `ESC O`, waiting for `H` or `F`
//!
//! A read deadline expiring inside any escape state yields a literal ESC.
//! Bytes that do not continue a known sequence also collapse to ESC.

use std::collections::VecDeque;
use std::io;

use super::{Key, ESC};

/// A byte stream with a bounded read deadline
pub trait ByteSource {
    /// Read one byte, returning `Ok(None)` when the deadline expires without data
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }
}

/// Decoder state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ground,
    Escape,
    Csi,
    CsiDigit(u8),
    Ss3,
}

/// Decodes one logical key per call from a [`ByteSource`]
#[derive(Debug)]
pub struct KeyDecoder {
    state: State,
}

impl Default for KeyDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyDecoder {
    /// Create a decoder in the ground state
    pub fn new() -> Self {
        Self {
            state: State::Ground,
        }
    }

    /// Block until a complete key is available
    ///
    /// Timeouts in the ground state are retried; timeouts in the middle of an
    /// escape sequence produce [`Key::ESCAPE`]. Only genuine I/O failures of
    /// the source are returned as errors.
    pub fn read_key<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> io::Result<Key> {
        self.state = State::Ground;

        loop {
            let Some(byte) = source.read_byte()? else {
                if self.state == State::Ground {
                    continue;
                }
                tracing::trace!(state = ?self.state, "escape sequence timed out");
                self.state = State::Ground;
                return Ok(Key::ESCAPE);
            };

            if let Some(key) = self.advance(byte) {
                return Ok(key);
            }
        }
    }

    /// Feed one byte, returning a key once a sequence is complete
    fn advance(&mut self, byte: u8) -> Option<Key> {
        let (next, key) = match self.state {
            State::Ground => match byte {
                ESC => (State::Escape, None),
                0x7f => (State::Ground, Some(Key::Backspace)),
                b => (State::Ground, Some(Key::Char(b))),
            },
            State::Escape => match byte {
                b'[' => (State::Csi, None),
                b'O' => (State::Ss3, None),
                _ => (State::Ground, Some(Key::ESCAPE)),
            },
            State::Csi => match byte {
                b'0'..=b'9' => (State::CsiDigit(byte), None),
                b'A' => (State::Ground, Some(Key::ArrowUp)),
                b'B' => (State::Ground, Some(Key::ArrowDown)),
                b'C' => (State::Ground, Some(Key::ArrowRight)),
                b'D' => (State::Ground, Some(Key::ArrowLeft)),
                b'H' => (State::Ground, Some(Key::Home)),
                b'F' => (State::Ground, Some(Key::End)),
                _ => (State::Ground, Some(Key::ESCAPE)),
            },
            State::CsiDigit(digit) => {
                let key = if byte == b'~' {
                    tilde_key(digit)
                } else {
                    None
                };
                (State::Ground, Some(key.unwrap_or(Key::ESCAPE)))
            },
            State::Ss3 => match byte {
                b'H' => (State::Ground, Some(Key::Home)),
                b'F' => (State::Ground, Some(Key::End)),
                _ => (State::Ground, Some(Key::ESCAPE)),
            },
        };

        if key == Some(Key::ESCAPE) {
            tracing::debug!(byte, state = ?self.state, "unrecognised escape sequence");
        }
        self.state = next;
        key
    }
}

/// Keys encoded as `ESC [ <digit> ~`
fn tilde_key(digit: u8) -> Option<Key> {
    match digit {
        b'1' | b'7' => Some(Key::Home),
        b'3' => Some(Key::Delete),
        b'4' | b'8' => Some(Key::End),
        b'5' => Some(Key::PageUp),
        b'6' => Some(Key::PageDown),
        _ => None,
    }
}

/// A canned byte source for tests and headless runs
///
/// Each entry is either a byte or a timeout (`None`). Reading past the end
/// of the script is an `UnexpectedEof` error.
#[derive(Debug, Default, Clone)]
pub struct ScriptedSource {
    script: VecDeque<Option<u8>>,
}

impl ScriptedSource {
    /// Create a source that yields `bytes` in order
    pub fn new(bytes: impl AsRef<[u8]>) -> Self {
        let mut source = Self::default();
        source.push_bytes(bytes);
        source
    }

    /// Append bytes to the script
    pub fn push_bytes(&mut self, bytes: impl AsRef<[u8]>) -> &mut Self {
        self.script.extend(bytes.as_ref().iter().copied().map(Some));
        self
    }

    /// Append a read that times out
    pub fn push_timeout(&mut self) -> &mut Self {
        self.script.push_back(None);
        self
    }

    /// Number of scripted reads not yet consumed
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl ByteSource for ScriptedSource {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        self.script.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "input script exhausted")
        })
    }
}
