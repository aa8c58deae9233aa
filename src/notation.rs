//! Vim key-notation codec: `"<C-x>ab<Esc>"` ⇄ [`KeyInputSet`].
//!
//! The map-command AST stores left- and right-hand sides as notation
//! strings; this module is how a host turns them into key sequences for the
//! remap table, and renders sequences back for display.

use thiserror::Error;

use crate::key::{KeyCode, KeyInput, KeyInputSet, Modifiers};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("empty key notation")]
    Empty,
    #[error("unrecognized key notation <{0}>")]
    UnrecognizedSpecial(String),
}

fn named_key(name: &str) -> Option<KeyCode> {
    let code = match name.to_ascii_lowercase().as_str() {
        "esc" => KeyCode::Esc,
        "cr" | "enter" | "return" => KeyCode::Enter,
        "bs" => KeyCode::Backspace,
        "tab" => KeyCode::Tab,
        "space" => KeyCode::Char(' '),
        "lt" => KeyCode::Char('<'),
        "nop" => KeyCode::Nop,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        other => {
            let n = other.strip_prefix('f')?.parse::<u8>().ok()?;
            if (1..=12).contains(&n) {
                KeyCode::F(n)
            } else {
                return None;
            }
        }
    };
    Some(code)
}

fn push_key_name(out: &mut String, code: KeyCode) {
    match code {
        KeyCode::Esc => out.push_str("Esc"),
        KeyCode::Enter => out.push_str("CR"),
        KeyCode::Backspace => out.push_str("BS"),
        KeyCode::Tab => out.push_str("Tab"),
        KeyCode::Left => out.push_str("Left"),
        KeyCode::Right => out.push_str("Right"),
        KeyCode::Up => out.push_str("Up"),
        KeyCode::Down => out.push_str("Down"),
        KeyCode::F(n) => {
            out.push('F');
            out.push_str(&n.to_string());
        }
        KeyCode::Char(c) => out.push(c),
        KeyCode::Nop => out.push_str("Nop"),
    }
}

fn parse_special(content: &str) -> Result<KeyInput, NotationError> {
    let mut mods = Modifiers::empty();
    let mut rest = content;

    // Modifier prefixes, e.g. the `C-S-` of `<C-S-x>`. The key itself may
    // be `-`, so only strip while more than one character follows.
    while rest.len() > 2 && rest.as_bytes()[1] == b'-' {
        let flag = match rest.as_bytes()[0].to_ascii_uppercase() {
            b'C' => Modifiers::CTRL,
            b'S' => Modifiers::SHIFT,
            b'A' | b'M' => Modifiers::ALT,
            b'D' => Modifiers::META,
            _ => break,
        };
        mods |= flag;
        rest = &rest[2..];
    }

    let mut chars = rest.chars();
    let code = match (chars.next(), chars.next()) {
        (Some(c), None) => KeyCode::Char(c),
        _ => named_key(rest)
            .ok_or_else(|| NotationError::UnrecognizedSpecial(content.to_string()))?,
    };
    Ok(KeyInput::new(code, mods))
}

/// Parses a notation string into a key sequence.
///
/// Bare characters stand for themselves; `<…>` groups name a special key
/// and optional modifiers. A `<` with no closing `>` is taken literally,
/// matching Vim. Fails on an empty string or an unrecognized `<…>` group.
pub fn parse_key_notation(notation: &str) -> Result<KeyInputSet, NotationError> {
    let chars: Vec<char> = notation.chars().collect();
    let mut keys = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '<'
            && let Some(close) = chars[i + 1..].iter().position(|&c| c == '>')
        {
            let content: String = chars[i + 1..i + 1 + close].iter().collect();
            keys.push(parse_special(&content)?);
            i += close + 2;
        } else {
            keys.push(KeyInput::char(chars[i]));
            i += 1;
        }
    }

    KeyInputSet::from_vec(keys).ok_or(NotationError::Empty)
}

/// Renders a key sequence back into notation. Inverse of
/// [`parse_key_notation`] on its own output.
pub fn to_notation(keys: &KeyInputSet) -> String {
    let mut out = String::new();
    for key in keys.keys() {
        if key.mods.is_empty() {
            match key.code {
                KeyCode::Char('<') => out.push_str("<Lt>"),
                KeyCode::Char(c) => out.push(c),
                code => {
                    out.push('<');
                    push_key_name(&mut out, code);
                    out.push('>');
                }
            }
            continue;
        }

        out.push('<');
        if key.mods.contains(Modifiers::CTRL) {
            out.push_str("C-");
        }
        if key.mods.contains(Modifiers::SHIFT) {
            out.push_str("S-");
        }
        if key.mods.contains(Modifiers::ALT) {
            out.push_str("A-");
        }
        if key.mods.contains(Modifiers::META) {
            out.push_str("D-");
        }
        push_key_name(&mut out, key.code);
        out.push('>');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_characters() {
        let set = parse_key_notation("gg").unwrap();
        assert_eq!(set.keys(), &[KeyInput::char('g'), KeyInput::char('g')]);
    }

    #[test]
    fn control_modifier() {
        let set = parse_key_notation("<C-x>").unwrap();
        assert_eq!(
            set.first(),
            KeyInput::new(KeyCode::Char('x'), Modifiers::CTRL)
        );
    }

    #[test]
    fn named_specials_are_case_insensitive() {
        assert_eq!(parse_key_notation("<esc>"), parse_key_notation("<Esc>"));
        assert_eq!(parse_key_notation("<cr>"), parse_key_notation("<CR>"));
    }

    #[test]
    fn lt_escapes_the_open_bracket() {
        let set = parse_key_notation("<lt>x").unwrap();
        assert_eq!(set.keys(), &[KeyInput::char('<'), KeyInput::char('x')]);
    }

    #[test]
    fn unterminated_bracket_is_literal() {
        let set = parse_key_notation("<foo").unwrap();
        assert_eq!(set.len(), 4);
        assert_eq!(set.first(), KeyInput::char('<'));
    }

    #[test]
    fn unknown_special_fails() {
        assert!(matches!(
            parse_key_notation("<Bogus>"),
            Err(NotationError::UnrecognizedSpecial(_))
        ));
    }

    #[test]
    fn round_trips_through_notation() {
        for s in ["gg", "<C-x>y", "<Esc><CR><Tab>", "<C-S-F5>", "a<lt>b"] {
            let set = parse_key_notation(s).unwrap();
            let rendered = to_notation(&set);
            assert_eq!(parse_key_notation(&rendered).unwrap(), set, "{s}");
        }
    }
}
