use proptest::prelude::*;

use vim_core::ex::{
    LineCommand, LineRange, LineSpecifier, RegisterName, SubstituteFlags, expand,
    parse_line_command, parse_line_range,
};
use vim_core::{KeyInput, KeyMap, KeyRemapMode, parse_key_notation, to_notation};

// Strategy for command-line text with various shapes: pure garbage, things
// that look like commands, and range-heavy prefixes.
fn command_text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        // Arbitrary printable text
        "[ -~]{0,40}",
        // Word-led lines
        "[a-z]{1,10}[ -~]{0,20}",
        // Range-flavored prefixes
        "[0-9.,$%+;'\\-\\\\]{0,8}[a-z]{0,8}[ -~]{0,15}",
        // Substitute-flavored lines
        "s/[a-z/\\\\]{0,10}",
        // Set chains
        "set [a-z=:+^!&\\- ]{0,25}",
    ]
}

fn register_strategy() -> impl Strategy<Value = Option<RegisterName>> {
    prop_oneof![
        Just(None),
        prop::char::range('a', 'z').prop_map(|c| RegisterName::of(c)),
    ]
}

fn count_strategy() -> impl Strategy<Value = Option<u32>> {
    prop_oneof![Just(None), (1u32..1000).prop_map(Some)]
}

fn specifier_strategy() -> impl Strategy<Value = LineSpecifier> {
    prop_oneof![
        Just(LineSpecifier::CurrentLine),
        Just(LineSpecifier::LastLine),
        (1u32..100_000).prop_map(LineSpecifier::Number),
    ]
}

fn range_strategy() -> impl Strategy<Value = Option<LineRange>> {
    prop_oneof![
        Just(None),
        Just(Some(LineRange::EntireBuffer)),
        specifier_strategy().prop_map(|s| Some(LineRange::SingleLine(s))),
        (specifier_strategy(), specifier_strategy(), any::<bool>()).prop_map(
            |(left, right, semi)| {
                Some(LineRange::Range {
                    left,
                    right,
                    includes_current_line: semi,
                })
            }
        ),
    ]
}

fn flags_strategy() -> impl Strategy<Value = SubstituteFlags> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(g, c, i, n)| {
        let mut flags = SubstituteFlags::default();
        if g {
            flags.insert(SubstituteFlags::REPLACE_ALL);
        }
        if c {
            flags.insert(SubstituteFlags::CONFIRM);
        }
        if i {
            flags.insert(SubstituteFlags::IGNORE_CASE);
        }
        if n {
            flags.insert(SubstituteFlags::REPORT_ONLY);
        }
        flags
    })
}

// Commands with a canonical textual form, for the round-trip property.
fn command_strategy() -> impl Strategy<Value = LineCommand> {
    prop_oneof![
        (range_strategy(), register_strategy(), count_strategy()).prop_map(
            |(range, register, count)| LineCommand::Delete {
                range,
                register,
                count,
            }
        ),
        (range_strategy(), register_strategy(), count_strategy()).prop_map(
            |(range, register, count)| LineCommand::Yank {
                range,
                register,
                count,
            }
        ),
        any::<bool>().prop_map(|bang| LineCommand::Close { bang }),
        any::<bool>().prop_map(|bang| LineCommand::Quit { bang }),
        (range_strategy(), count_strategy())
            .prop_map(|(range, count)| LineCommand::Join { range, count }),
        (range_strategy(), count_strategy())
            .prop_map(|(range, count)| LineCommand::ShiftLeft { range, count }),
        (range_strategy(), count_strategy())
            .prop_map(|(range, count)| LineCommand::ShiftRight { range, count }),
        (1u32..1_000_000).prop_map(LineCommand::JumpToLine),
        (
            range_strategy(),
            "[a-z]{1,8}",
            "[a-z]{0,8}",
            flags_strategy(),
            count_strategy()
        )
            .prop_map(|(range, pattern, replace, flags, count)| {
                LineCommand::Substitute {
                    range,
                    pattern,
                    replace,
                    flags,
                    count,
                }
            }),
        ("[a-z]{1,6}", "[a-z:]{1,8}").prop_map(|(left, right)| LineCommand::MapKeys {
            left,
            right,
            modes: vec![KeyRemapMode::Normal],
            allow_remap: false,
        }),
    ]
}

fn render_specifier(spec: &LineSpecifier) -> String {
    match spec {
        LineSpecifier::CurrentLine => ".".to_string(),
        LineSpecifier::LastLine => "$".to_string(),
        LineSpecifier::Number(n) => n.to_string(),
        other => panic!("no canonical form for {other:?}"),
    }
}

fn render_range(range: &Option<LineRange>) -> String {
    match range {
        None => String::new(),
        Some(LineRange::EntireBuffer) => "%".to_string(),
        Some(LineRange::SingleLine(spec)) => render_specifier(spec),
        Some(LineRange::Range {
            left,
            right,
            includes_current_line,
        }) => format!(
            "{}{}{}",
            render_specifier(left),
            if *includes_current_line { ';' } else { ',' },
            render_specifier(right)
        ),
    }
}

fn render_flags(flags: SubstituteFlags) -> String {
    let mut out = String::new();
    if flags.contains(SubstituteFlags::REPLACE_ALL) {
        out.push('g');
    }
    if flags.contains(SubstituteFlags::CONFIRM) {
        out.push('c');
    }
    if flags.contains(SubstituteFlags::IGNORE_CASE) {
        out.push('i');
    }
    if flags.contains(SubstituteFlags::REPORT_ONLY) {
        out.push('n');
    }
    out
}

fn render_count(count: &Option<u32>) -> String {
    count.map(|n| format!(" {n}")).unwrap_or_default()
}

fn render_register(register: &Option<RegisterName>) -> String {
    register.map(|r| format!(" {}", r.char())).unwrap_or_default()
}

/// Canonical text for the subset of commands generated above.
fn render(command: &LineCommand) -> String {
    match command {
        LineCommand::Delete {
            range,
            register,
            count,
        } => format!(
            "{}delete{}{}",
            render_range(range),
            render_register(register),
            render_count(count)
        ),
        LineCommand::Yank {
            range,
            register,
            count,
        } => format!(
            "{}yank{}{}",
            render_range(range),
            render_register(register),
            render_count(count)
        ),
        LineCommand::Close { bang } => format!("close{}", if *bang { "!" } else { "" }),
        LineCommand::Quit { bang } => format!("quit{}", if *bang { "!" } else { "" }),
        LineCommand::Join { range, count } => {
            format!("{}join{}", render_range(range), render_count(count))
        }
        LineCommand::ShiftLeft { range, count } => {
            format!("{}<{}", render_range(range), render_count(count))
        }
        LineCommand::ShiftRight { range, count } => {
            format!("{}>{}", render_range(range), render_count(count))
        }
        LineCommand::JumpToLine(n) => n.to_string(),
        LineCommand::Substitute {
            range,
            pattern,
            replace,
            flags,
            count,
        } => format!(
            "{}substitute/{}/{}/{}{}",
            render_range(range),
            pattern,
            replace,
            render_flags(*flags),
            render_count(count)
        ),
        LineCommand::MapKeys { left, right, .. } => format!("nnoremap {left} {right}"),
        other => panic!("no canonical form for {other:?}"),
    }
}

proptest! {
    #[test]
    fn parser_never_panics(text in command_text_strategy()) {
        let _ = parse_line_command(&text);
    }

    #[test]
    fn parser_never_panics_on_arbitrary_input(text in ".{0,60}") {
        let _ = parse_line_command(&text);
    }

    #[test]
    fn range_parser_never_panics(text in "[0-9.,$%+;'?/\\\\a-z\\-]{0,20}") {
        let mut cursor = vim_core::ex::CharCursor::new(&text);
        let _ = parse_line_range(&mut cursor);
    }

    #[test]
    fn name_expansion_is_idempotent(input in "[a-zA-Z]{0,10}") {
        let once = expand(&input).to_string();
        let twice = expand(&once).to_string();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn canonical_commands_round_trip(command in command_strategy()) {
        let text = render(&command);
        let reparsed = parse_line_command(&text);
        prop_assert_eq!(reparsed.as_ref(), Ok(&command), "rendered as {:?}", text);
    }

    #[test]
    fn notation_round_trips(keys in prop::collection::vec(
        prop_oneof![
            prop::char::range('a', 'z').prop_map(KeyInput::char),
            Just(KeyInput::ESC),
            Just(KeyInput::char('<')),
        ],
        1..8,
    )) {
        let set = vim_core::KeyInputSet::from_vec(keys).unwrap();
        let rendered = to_notation(&set);
        prop_assert_eq!(parse_key_notation(&rendered), Ok(set));
    }

    #[test]
    fn remap_lookup_never_panics(
        lhs in "[a-g]{1,3}",
        rhs in "[a-g]{1,3}",
        query in "[a-g]{1,4}",
        allow_remap in any::<bool>(),
    ) {
        use vim_core::KeyMapTable;
        let mut map = KeyMap::new();
        map.add_mapping(
            KeyRemapMode::Normal,
            vim_core::KeyInputSet::from_chars(&lhs).unwrap(),
            vim_core::KeyInputSet::from_chars(&rhs).unwrap(),
            allow_remap,
        );
        let query = vim_core::KeyInputSet::from_chars(&query).unwrap();
        let _ = map.get_key_mapping(&query, KeyRemapMode::Normal);
    }
}
