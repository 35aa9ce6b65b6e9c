//! Keyboard input
//!
//! Turns the raw byte stream coming from a terminal in raw mode into
//! logical key events. Multi-byte escape sequences for navigation keys are
//! recognised by a small state machine in [`KeyDecoder`].

mod decoder;

pub use decoder::{ByteSource, KeyDecoder, ScriptedSource};

/// The escape byte that starts every navigation sequence
pub const ESC: u8 = 0x1b;

/// Map a letter to its control code (`ctrl(b'q')` is Ctrl-Q)
pub const fn ctrl(c: u8) -> u8 {
    c & 0x1f
}

/// A logical key event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A plain byte: printable character, control code or a lone ESC
    Char(u8),
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    /// DEL (0x7f), which terminals send for the backspace key
    Backspace,
}

impl Key {
    /// The literal escape key
    pub const ESCAPE: Key = Key::Char(ESC);
    /// Enter arrives as a carriage return in raw mode
    pub const ENTER: Key = Key::Char(b'\r');

    /// Key for a control chord such as Ctrl-S
    pub const fn ctrl(c: u8) -> Key {
        Key::Char(ctrl(c))
    }
}
