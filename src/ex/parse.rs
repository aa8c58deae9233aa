//! The line-command parser: one textual ex command in, one [`LineCommand`]
//! out.

use thiserror::Error;

use crate::mode::KeyRemapMode;

use super::ast::{
    CommandOption, FileOption, LineCommand, LineRange, Mark, RegisterName, SearchPath,
    SetArgument, SubstituteFlags,
};
use super::cursor::CharCursor;
use super::names::expand;
use super::range::parse_line_range;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("{0}")]
    Generic(String),
    #[error("no ! allowed")]
    NoBangAllowed,
    #[error("no range allowed")]
    NoRangeAllowed,
    #[error("trailing characters")]
    TrailingCharacters,
    #[error("no marks matching {0}")]
    NoMarksMatching(char),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Parses `text` as a single ex command. Leading blanks and prompt colons
/// are tolerated.
pub fn parse_line_command(text: &str) -> Result<LineCommand, ParseError> {
    Parser::new(text).parse_single_command()
}

/// Single-pass recursive parser over one command line.
pub struct Parser {
    cursor: CharCursor,
}

impl Parser {
    pub fn new(text: &str) -> Self {
        Self {
            cursor: CharCursor::new(text),
        }
    }

    pub fn parse_single_command(&mut self) -> Result<LineCommand, ParseError> {
        self.cursor.skip_blanks();
        while self.cursor.try_consume(':') {}
        self.cursor.skip_blanks();

        // A bare number or `$` is a jump, but only when nothing else
        // follows; `3,$d` takes the range path below.
        if let Some(command) = self.try_parse_jump() {
            return Ok(command);
        }

        let range = parse_line_range(&mut self.cursor);

        let name = match self.cursor.peek() {
            Some(c) if c.is_ascii_alphabetic() => {
                let word = self.parse_name_word();
                expand(&word).to_string()
            }
            Some(c) => {
                self.cursor.advance();
                c.to_string()
            }
            None => String::new(),
        };

        let command = self.parse_command_arguments(&name, range)?;

        self.cursor.skip_blanks();
        if !self.cursor.is_at_end() {
            return Err(ParseError::TrailingCharacters);
        }
        Ok(command)
    }

    /// The maximal alphabetic run; command names never contain digits or
    /// punctuation, so `d5` and `s/…` split correctly.
    fn parse_name_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.cursor.peek() {
            if !c.is_ascii_alphabetic() {
                break;
            }
            word.push(c);
            self.cursor.advance();
        }
        word
    }

    fn try_parse_jump(&mut self) -> Option<LineCommand> {
        let save = self.cursor.index();
        match self.cursor.peek()? {
            c if c.is_ascii_digit() => {
                let number = self.cursor.parse_number()?;
                self.cursor.skip_blanks();
                if self.cursor.is_at_end() {
                    return Some(LineCommand::JumpToLine(number));
                }
            }
            '$' => {
                self.cursor.advance();
                self.cursor.skip_blanks();
                if self.cursor.is_at_end() {
                    return Some(LineCommand::JumpToLastLine);
                }
            }
            _ => return None,
        }
        self.cursor.set_index(save);
        None
    }

    fn parse_command_arguments(
        &mut self,
        name: &str,
        range: Option<LineRange>,
    ) -> Result<LineCommand, ParseError> {
        match name {
            "close" => {
                Self::reject_range(&range)?;
                let bang = self.cursor.parse_bang();
                Ok(LineCommand::Close { bang })
            }
            "delete" => {
                self.cursor.skip_blanks();
                let register = self.parse_register();
                self.cursor.skip_blanks();
                let count = self.cursor.parse_number();
                Ok(LineCommand::Delete {
                    range,
                    register,
                    count,
                })
            }
            "yank" => {
                self.cursor.skip_blanks();
                let register = self.parse_register();
                self.cursor.skip_blanks();
                let count = self.cursor.parse_number();
                Ok(LineCommand::Yank {
                    range,
                    register,
                    count,
                })
            }
            "put" => {
                let bang = self.cursor.parse_bang();
                self.cursor.skip_blanks();
                let register = self.parse_register();
                if bang {
                    Ok(LineCommand::PutBefore { range, register })
                } else {
                    Ok(LineCommand::PutAfter { range, register })
                }
            }
            "join" => {
                self.cursor.skip_blanks();
                let count = self.cursor.parse_number();
                Ok(LineCommand::Join { range, count })
            }
            "fold" => Ok(LineCommand::Fold { range }),
            "edit" => {
                Self::reject_range(&range)?;
                let bang = self.cursor.parse_bang();
                self.cursor.skip_blanks();
                let file_options = self.parse_file_options();
                self.cursor.skip_blanks();
                let command_option = self.parse_command_option();
                self.cursor.skip_blanks();
                let file = self.cursor.parse_to_end_of_line();
                Ok(LineCommand::Edit {
                    bang,
                    file_options,
                    command_option,
                    file,
                })
            }
            "quit" => {
                Self::reject_range(&range)?;
                let bang = self.cursor.parse_bang();
                Ok(LineCommand::Quit { bang })
            }
            "qall" | "quitall" => {
                Self::reject_range(&range)?;
                let bang = self.cursor.parse_bang();
                Ok(LineCommand::QuitAll { bang })
            }
            "wq" | "xit" | "exit" => {
                let bang = self.cursor.parse_bang();
                self.cursor.skip_blanks();
                let file_options = self.parse_file_options();
                self.cursor.skip_blanks();
                let file = self.cursor.parse_word();
                Ok(LineCommand::QuitWithWrite {
                    range,
                    bang,
                    file_options,
                    file,
                })
            }
            "make" => {
                Self::reject_range(&range)?;
                let bang = self.cursor.parse_bang();
                self.cursor.skip_blanks();
                let arguments = self.cursor.parse_to_end_of_line();
                Ok(LineCommand::Make { bang, arguments })
            }
            "retab" => {
                let bang = self.cursor.parse_bang();
                self.cursor.skip_blanks();
                let new_tab_stop = self.cursor.parse_number();
                Ok(LineCommand::Retab {
                    range,
                    bang,
                    new_tab_stop,
                })
            }
            "source" => {
                Self::reject_range(&range)?;
                let bang = self.cursor.parse_bang();
                self.cursor.skip_blanks();
                let file = self.cursor.parse_to_end_of_line();
                Ok(LineCommand::Source { bang, file })
            }
            "split" => {
                self.cursor.skip_blanks();
                let file_options = self.parse_file_options();
                self.cursor.skip_blanks();
                let command_option = self.parse_command_option();
                Ok(LineCommand::Split {
                    range,
                    file_options,
                    command_option,
                })
            }
            "set" => {
                Self::reject_range(&range)?;
                self.parse_set_arguments()
            }
            "registers" | "display" => {
                Self::reject_range(&range)?;
                self.cursor.skip_blanks();
                let register = self.parse_register();
                Ok(LineCommand::DisplayRegisters { register })
            }
            "marks" => {
                Self::reject_range(&range)?;
                self.parse_display_marks()
            }
            "tabnext" => {
                Self::reject_range(&range)?;
                self.cursor.skip_blanks();
                let count = self.cursor.parse_number();
                Ok(LineCommand::GotoNextTab { count })
            }
            "tabprevious" | "tabNext" => {
                Self::reject_range(&range)?;
                self.cursor.skip_blanks();
                let count = self.cursor.parse_number();
                Ok(LineCommand::GotoPreviousTab { count })
            }
            "tabfirst" | "tabrewind" => {
                Self::reject_range(&range)?;
                Ok(LineCommand::GotoFirstTab)
            }
            "tablast" => {
                Self::reject_range(&range)?;
                Ok(LineCommand::GotoLastTab)
            }
            "nohlsearch" => {
                Self::reject_range(&range)?;
                Ok(LineCommand::NoHighlightSearch)
            }
            "redo" => {
                Self::reject_range(&range)?;
                Ok(LineCommand::Redo)
            }
            "undo" => {
                Self::reject_range(&range)?;
                Ok(LineCommand::Undo)
            }
            "substitute" => self.parse_substitute(range, SubstituteFlags::default()),
            "smagic" => {
                let mut forced = SubstituteFlags::default();
                forced.insert(SubstituteFlags::MAGIC);
                self.parse_substitute(range, forced)
            }
            "snomagic" => {
                let mut forced = SubstituteFlags::default();
                forced.insert(SubstituteFlags::NOMAGIC);
                self.parse_substitute(range, forced)
            }
            "&" => {
                let flags = self.parse_substitute_flags();
                self.cursor.skip_blanks();
                let count = self.cursor.parse_number();
                Ok(LineCommand::SubstituteRepeat {
                    range,
                    flags,
                    count,
                })
            }
            "~" => {
                let flags = self.parse_substitute_flags();
                self.cursor.skip_blanks();
                let count = self.cursor.parse_number();
                Ok(LineCommand::SubstituteRepeatWithSearch {
                    range,
                    flags,
                    count,
                })
            }
            "/" => {
                Self::reject_range(&range)?;
                Ok(LineCommand::Search {
                    path: SearchPath::Forward,
                    pattern: self.cursor.parse_to_end_of_line(),
                })
            }
            "?" => {
                Self::reject_range(&range)?;
                Ok(LineCommand::Search {
                    path: SearchPath::Backward,
                    pattern: self.cursor.parse_to_end_of_line(),
                })
            }
            "<" => {
                self.cursor.skip_blanks();
                let count = self.cursor.parse_number();
                Ok(LineCommand::ShiftLeft { range, count })
            }
            ">" => {
                self.cursor.skip_blanks();
                let count = self.cursor.parse_number();
                Ok(LineCommand::ShiftRight { range, count })
            }
            _ if Self::is_map_name(name) => {
                Self::reject_range(&range)?;
                self.parse_map_command(name)
            }
            _ if Self::is_unmap_name(name) => {
                Self::reject_range(&range)?;
                self.parse_unmap_command(name)
            }
            _ if Self::is_mapclear_name(name) => {
                Self::reject_range(&range)?;
                self.parse_mapclear_command(name)
            }
            "" => Err(ParseError::Generic("unknown command".to_string())),
            other => Err(ParseError::Generic(format!("unknown command: {other}"))),
        }
    }

    fn reject_range(range: &Option<LineRange>) -> Result<(), ParseError> {
        if range.is_some() {
            Err(ParseError::NoRangeAllowed)
        } else {
            Ok(())
        }
    }

    /// A single-letter register name. Digits are counts, never registers,
    /// so `delete 5` reads as a count.
    fn parse_register(&mut self) -> Option<RegisterName> {
        match self.cursor.peek() {
            Some(c) if c.is_ascii_alphabetic() => {
                self.cursor.advance();
                RegisterName::of(c)
            }
            _ => None,
        }
    }

    /// `++opt` file options are not recognized yet; always empty.
    fn parse_file_options(&mut self) -> Vec<FileOption> {
        Vec::new()
    }

    fn parse_command_option(&mut self) -> Option<CommandOption> {
        let plus_index = self.cursor.index();
        if !self.cursor.try_consume('+') {
            return None;
        }
        match self.cursor.peek() {
            None => Some(CommandOption::StartAtLastLine),
            Some(c) if c.is_ascii_digit() => self
                .cursor
                .parse_number()
                .map(CommandOption::StartAtLine),
            Some('/') => {
                self.cursor.advance();
                Some(CommandOption::StartAtPattern(
                    self.cursor.parse_to_end_of_line(),
                ))
            }
            Some(_) => {
                let rest = self.cursor.remaining();
                match Parser::new(&rest).parse_single_command() {
                    Ok(command) => {
                        self.cursor.parse_to_end_of_line();
                        Some(CommandOption::ExecuteLineCommand(Box::new(command)))
                    }
                    Err(_) => {
                        self.cursor.set_index(plus_index);
                        None
                    }
                }
            }
        }
    }

    fn parse_display_marks(&mut self) -> Result<LineCommand, ParseError> {
        self.cursor.skip_blanks();
        let mut marks = Vec::new();
        if let Some(word) = self.cursor.parse_word() {
            for c in word.chars() {
                match Mark::of(c) {
                    Some(mark) => marks.push(mark),
                    None => return Err(ParseError::NoMarksMatching(c)),
                }
            }
        }
        Ok(LineCommand::DisplayMarks { marks })
    }

    fn parse_set_arguments(&mut self) -> Result<LineCommand, ParseError> {
        let mut arguments = Vec::new();
        loop {
            self.cursor.skip_blanks();
            if self.cursor.is_at_end() {
                break;
            }
            arguments.push(self.parse_set_argument()?);
        }
        Ok(LineCommand::Set { arguments })
    }

    fn parse_set_argument(&mut self) -> Result<SetArgument, ParseError> {
        if self.cursor.try_parse_word("all&") {
            return Ok(SetArgument::ResetAllToDefault);
        }
        if self.cursor.try_parse_word("all") {
            return Ok(SetArgument::DisplayAllButTerminal);
        }
        if self.cursor.try_parse_word("termcap") {
            return Ok(SetArgument::DisplayAllTerminal);
        }

        let name = self.parse_setting_name();
        if name.is_empty() {
            return Err(ParseError::Generic(format!(
                "invalid :set argument: {}",
                self.cursor.remaining()
            )));
        }

        if let Some(stripped) = name.strip_prefix("no")
            && !stripped.is_empty()
        {
            return Ok(SetArgument::ToggleSetting(stripped.to_string()));
        }
        if let Some(stripped) = name.strip_prefix("inv")
            && !stripped.is_empty()
        {
            return Ok(SetArgument::InvertSetting(stripped.to_string()));
        }

        match self.cursor.peek() {
            Some('!') => {
                self.cursor.advance();
                Ok(SetArgument::InvertSetting(name))
            }
            Some(':' | '=') => {
                self.cursor.advance();
                let value = self.cursor.parse_word().unwrap_or_default();
                Ok(SetArgument::AssignSetting(name, value))
            }
            Some(op @ ('+' | '^' | '-')) => {
                let save = self.cursor.index();
                self.cursor.advance();
                if self.cursor.try_consume('=') {
                    let value = self.cursor.parse_word().unwrap_or_default();
                    Ok(match op {
                        '+' => SetArgument::AddSetting(name, value),
                        '^' => SetArgument::MultiplySetting(name, value),
                        _ => SetArgument::SubtractSetting(name, value),
                    })
                } else {
                    self.cursor.set_index(save);
                    Ok(SetArgument::DisplaySetting(name))
                }
            }
            _ => Ok(SetArgument::DisplaySetting(name)),
        }
    }

    fn parse_setting_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.cursor.peek() {
            if !(c.is_ascii_alphanumeric() || c == '_') {
                break;
            }
            name.push(c);
            self.cursor.advance();
        }
        name
    }

    fn is_valid_substitute_delimiter(c: char) -> bool {
        !c.is_alphanumeric() && !matches!(c, '\\' | '"' | '|' | ' ' | '\t')
    }

    fn parse_substitute(
        &mut self,
        range: Option<LineRange>,
        forced: SubstituteFlags,
    ) -> Result<LineCommand, ParseError> {
        self.cursor.skip_blanks();
        match self.cursor.peek() {
            Some(delimiter) if Self::is_valid_substitute_delimiter(delimiter) => {
                self.cursor.advance();
                let Some(pattern) = self.cursor.parse_pattern(delimiter) else {
                    // `:s/foo` with no closing delimiter: the pattern runs
                    // to end of line, nothing else follows.
                    let pattern = self.cursor.parse_to_end_of_line();
                    return Ok(LineCommand::Substitute {
                        range,
                        pattern,
                        replace: String::new(),
                        flags: Self::apply_forced_flags(SubstituteFlags::default(), forced),
                        count: None,
                    });
                };
                let replace = match self.cursor.parse_pattern(delimiter) {
                    Some(replace) => replace,
                    // `:s/foo/bar`: the replacement runs to end of line.
                    None => self.cursor.parse_to_end_of_line(),
                };
                let flags = Self::apply_forced_flags(self.parse_substitute_flags(), forced);
                self.cursor.skip_blanks();
                let count = self.cursor.parse_number();
                Ok(LineCommand::Substitute {
                    range,
                    pattern,
                    replace,
                    flags,
                    count,
                })
            }
            _ => {
                // Bare `:s [flags] [count]` repeats the last substitute.
                let flags = Self::apply_forced_flags(self.parse_substitute_flags(), forced);
                self.cursor.skip_blanks();
                let count = self.cursor.parse_number();
                Ok(LineCommand::Substitute {
                    range,
                    pattern: String::new(),
                    replace: String::new(),
                    flags,
                    count,
                })
            }
        }
    }

    /// `smagic` force-sets Magic and clears Nomagic; `snomagic` the
    /// reverse.
    fn apply_forced_flags(mut flags: SubstituteFlags, forced: SubstituteFlags) -> SubstituteFlags {
        if forced.contains(SubstituteFlags::MAGIC) {
            flags.insert(SubstituteFlags::MAGIC);
            flags.remove(SubstituteFlags::NOMAGIC);
        }
        if forced.contains(SubstituteFlags::NOMAGIC) {
            flags.insert(SubstituteFlags::NOMAGIC);
            flags.remove(SubstituteFlags::MAGIC);
        }
        flags
    }

    fn parse_substitute_flags(&mut self) -> SubstituteFlags {
        let mut flags = SubstituteFlags::default();
        while let Some(c) = self.cursor.peek() {
            let flag = match c {
                'c' => SubstituteFlags::CONFIRM,
                'r' => SubstituteFlags::USE_PREVIOUS_SEARCH_PATTERN,
                'e' => SubstituteFlags::SUPPRESS_ERROR,
                'g' => SubstituteFlags::REPLACE_ALL,
                'i' => SubstituteFlags::IGNORE_CASE,
                'I' => SubstituteFlags::ORDINAL_CASE,
                'n' => SubstituteFlags::REPORT_ONLY,
                'p' => SubstituteFlags::PRINT_LAST,
                'l' => SubstituteFlags::PRINT_LAST_WITH_LIST,
                '#' => SubstituteFlags::PRINT_LAST_WITH_NUMBER,
                '&' => SubstituteFlags::USE_PREVIOUS_FLAGS,
                _ => break,
            };
            flags.insert(flag);
            self.cursor.advance();
        }
        flags
    }

    fn is_map_name(name: &str) -> bool {
        matches!(
            name,
            "map" | "nmap" | "vmap" | "xmap" | "smap" | "omap" | "imap" | "cmap" | "lmap"
                | "noremap" | "nnoremap" | "vnoremap" | "xnoremap" | "snoremap" | "onoremap"
                | "inoremap" | "cnoremap" | "lnoremap"
        )
    }

    fn is_unmap_name(name: &str) -> bool {
        matches!(
            name,
            "unmap" | "nunmap" | "vunmap" | "xunmap" | "sunmap" | "ounmap" | "iunmap"
                | "cunmap" | "lunmap"
        )
    }

    fn is_mapclear_name(name: &str) -> bool {
        matches!(
            name,
            "mapclear" | "nmapclear" | "vmapclear" | "xmapclear" | "smapclear" | "omapclear"
                | "imapclear" | "cmapclear" | "lmapclear"
        )
    }

    /// True for the un-prefixed family members where `!` selects the
    /// Insert+Command mode pair.
    fn is_generic_map_name(name: &str) -> bool {
        matches!(name, "map" | "noremap" | "unmap" | "mapclear")
    }

    fn map_modes(name: &str, bang: bool) -> Vec<KeyRemapMode> {
        use KeyRemapMode::*;
        if Self::is_generic_map_name(name) {
            return if bang {
                vec![Insert, Command]
            } else {
                vec![Normal, Visual, Select, OperatorPending]
            };
        }
        match name.as_bytes()[0] {
            b'n' => vec![Normal],
            b'v' => vec![Visual, Select],
            b'x' => vec![Visual],
            b's' => vec![Select],
            b'o' => vec![OperatorPending],
            b'i' => vec![Insert],
            b'c' => vec![Command],
            _ => vec![Language],
        }
    }

    fn parse_map_bang(&mut self, name: &str) -> Result<bool, ParseError> {
        let bang = self.cursor.parse_bang();
        if bang && !Self::is_generic_map_name(name) {
            return Err(ParseError::NoBangAllowed);
        }
        Ok(bang)
    }

    fn parse_map_command(&mut self, name: &str) -> Result<LineCommand, ParseError> {
        let bang = self.parse_map_bang(name)?;
        let modes = Self::map_modes(name, bang);
        let allow_remap = !name.contains("nore");

        self.cursor.skip_blanks();
        let Some(left) = self.cursor.parse_word() else {
            return Ok(LineCommand::DisplayKeyMap {
                modes,
                key_notation: None,
            });
        };
        self.cursor.skip_blanks();
        if self.cursor.is_at_end() {
            return Ok(LineCommand::DisplayKeyMap {
                modes,
                key_notation: Some(left),
            });
        }
        let right = self.cursor.parse_to_end_of_line();
        Ok(LineCommand::MapKeys {
            left,
            right,
            modes,
            allow_remap,
        })
    }

    fn parse_unmap_command(&mut self, name: &str) -> Result<LineCommand, ParseError> {
        let bang = self.parse_map_bang(name)?;
        let modes = Self::map_modes(name, bang);
        self.cursor.skip_blanks();
        let Some(key_notation) = self.cursor.parse_word() else {
            return Err(ParseError::InvalidArgument(
                "unmap requires a key notation".to_string(),
            ));
        };
        Ok(LineCommand::UnmapKeys {
            key_notation,
            modes,
        })
    }

    fn parse_mapclear_command(&mut self, name: &str) -> Result<LineCommand, ParseError> {
        let bang = self.parse_map_bang(name)?;
        let modes = Self::map_modes(name, bang);
        Ok(LineCommand::ClearKeyMap { modes })
    }
}
