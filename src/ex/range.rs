//! Line-range parsing: `.`, `$`, marks, patterns, signed adjustments, and
//! the `,` / `;` combinators.

use super::ast::{LineRange, LineSpecifier, Mark};
use super::cursor::CharCursor;

fn clamp_i32(n: u32) -> i32 {
    n.try_into().unwrap_or(i32::MAX)
}

/// Parses one line specifier at the current index. Restores the index and
/// returns `None` when nothing matches.
pub fn parse_line_specifier(cursor: &mut CharCursor) -> Option<LineSpecifier> {
    let start = cursor.index();

    let base = match cursor.peek()? {
        '.' => {
            cursor.advance();
            LineSpecifier::CurrentLine
        }
        '\'' => {
            cursor.advance();
            match cursor.parse_char().and_then(Mark::of) {
                Some(mark) => LineSpecifier::MarkLine(mark),
                None => {
                    cursor.set_index(start);
                    return None;
                }
            }
        }
        '$' | '%' => {
            cursor.advance();
            LineSpecifier::LastLine
        }
        // An unclosed pattern is not a specifier; resetting here lets a
        // bare `/rest` reach the parser as the search command.
        '/' => {
            cursor.advance();
            match cursor.parse_pattern('/') {
                Some(pattern) => LineSpecifier::NextLineWithPattern(pattern),
                None => {
                    cursor.set_index(start);
                    return None;
                }
            }
        }
        '?' => {
            cursor.advance();
            match cursor.parse_pattern('?') {
                Some(pattern) => LineSpecifier::PreviousLineWithPattern(pattern),
                None => {
                    cursor.set_index(start);
                    return None;
                }
            }
        }
        '\\' => {
            cursor.advance();
            match cursor.parse_char() {
                Some('/') => LineSpecifier::NextLineWithPreviousPattern,
                Some('?') => LineSpecifier::PreviousLineWithPreviousPattern,
                Some('&') => LineSpecifier::NextLineWithPreviousSubstitutePattern,
                _ => {
                    cursor.set_index(start);
                    return None;
                }
            }
        }
        '+' => {
            cursor.advance();
            let n = cursor.parse_number().unwrap_or(1);
            LineSpecifier::AdjustmentOnCurrent(clamp_i32(n))
        }
        '-' => {
            cursor.advance();
            let n = cursor.parse_number().unwrap_or(1);
            LineSpecifier::AdjustmentOnCurrent(-clamp_i32(n))
        }
        c if c.is_ascii_digit() => LineSpecifier::Number(cursor.parse_number()?),
        _ => return None,
    };

    // A trailing signed adjustment applies to the base: `.+2`, `'a-1`.
    let spec = match cursor.peek() {
        Some('+') => {
            cursor.advance();
            let n = cursor.parse_number().unwrap_or(1);
            LineSpecifier::WithAdjustment(Box::new(base), clamp_i32(n))
        }
        Some('-') => {
            cursor.advance();
            let n = cursor.parse_number().unwrap_or(1);
            LineSpecifier::WithAdjustment(Box::new(base), -clamp_i32(n))
        }
        _ => base,
    };
    Some(spec)
}

/// Parses a full line range at the current index.
///
/// Returns `None` without consuming anything when no range is present. A
/// `,` or `;` whose right side fails to parse also returns `None`, with
/// the index left one past the separator.
pub fn parse_line_range(cursor: &mut CharCursor) -> Option<LineRange> {
    if cursor.try_consume('%') {
        return Some(LineRange::EntireBuffer);
    }

    let left = parse_line_specifier(cursor)?;

    match cursor.peek() {
        Some(sep @ (',' | ';')) => {
            cursor.advance();
            let right = parse_line_specifier(cursor)?;
            Some(LineRange::Range {
                left,
                right,
                includes_current_line: sep == ';',
            })
        }
        _ => Some(LineRange::SingleLine(left)),
    }
}
