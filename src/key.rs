/// Logical key codes the engine distinguishes.
///
/// Hosts map their platform key events onto this enum. `Nop` is the
/// do-nothing key: it is always accepted and always dispatched as a no-op,
/// which makes it useful as a mapping right-hand side that swallows input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Esc,
    Enter,
    Backspace,
    Tab,
    Left,
    Right,
    Up,
    Down,
    /// Function keys, `F(1)` through `F(12)`.
    F(u8),
    Nop,
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const META  = 0b1000;
    }
}

/// One keystroke: a logical key code plus modifier state.
///
/// Comparable for equality and hashable so key sequences can index the
/// remap table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub code: KeyCode,
    pub mods: Modifiers,
}

impl KeyInput {
    pub const NOP: KeyInput = KeyInput {
        code: KeyCode::Nop,
        mods: Modifiers::empty(),
    };

    pub const ESC: KeyInput = KeyInput {
        code: KeyCode::Esc,
        mods: Modifiers::empty(),
    };

    pub fn new(code: KeyCode, mods: Modifiers) -> Self {
        Self { code, mods }
    }

    /// An unmodified printable character.
    pub fn char(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            mods: Modifiers::empty(),
        }
    }

    pub fn is_nop(&self) -> bool {
        matches!(self.code, KeyCode::Nop)
    }

    pub fn is_escape(&self) -> bool {
        matches!(self.code, KeyCode::Esc)
    }
}

/// An ordered, non-empty sequence of keystrokes.
///
/// This is the unit the remap machinery works over: a buffered prefix, a
/// mapping left-hand side, or an expansion result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyInputSet {
    keys: Vec<KeyInput>,
}

impl KeyInputSet {
    pub fn single(key: KeyInput) -> Self {
        Self { keys: vec![key] }
    }

    /// Builds a set from a non-empty vector. Returns `None` on empty input;
    /// the non-empty invariant is load-bearing for `first`.
    pub fn from_vec(keys: Vec<KeyInput>) -> Option<Self> {
        if keys.is_empty() {
            None
        } else {
            Some(Self { keys })
        }
    }

    /// Convenience constructor from plain characters.
    pub fn from_chars(chars: &str) -> Option<Self> {
        Self::from_vec(chars.chars().map(KeyInput::char).collect())
    }

    /// Returns a new set with `key` appended.
    pub fn append(&self, key: KeyInput) -> Self {
        let mut keys = self.keys.clone();
        keys.push(key);
        Self { keys }
    }

    pub fn first(&self) -> KeyInput {
        self.keys[0]
    }

    pub fn keys(&self) -> &[KeyInput] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always false; the sequence is non-empty by construction.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// True when `self` is a proper prefix of `other`.
    pub fn is_proper_prefix_of(&self, other: &KeyInputSet) -> bool {
        other.keys.len() > self.keys.len() && other.keys[..self.keys.len()] == self.keys[..]
    }
}

impl From<KeyInput> for KeyInputSet {
    fn from(key: KeyInput) -> Self {
        Self::single(key)
    }
}
