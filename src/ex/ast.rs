//! The abstract syntax tree produced by the line-command parser.
//!
//! Every node here is data for an external interpreter; parsing never
//! executes anything.

use crate::mode::KeyRemapMode;

/// A named mark, validated on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(char);

impl Mark {
    /// Accepts the local (`a`–`z`), global (`A`–`Z`), and numbered
    /// (`0`–`9`) marks plus the special marks Vim names.
    pub fn of(c: char) -> Option<Mark> {
        if c.is_ascii_alphanumeric() || matches!(c, '\'' | '`' | '<' | '>' | '[' | ']' | '^' | '.' | '"') {
            Some(Mark(c))
        } else {
            None
        }
    }

    pub fn char(&self) -> char {
        self.0
    }
}

/// A named register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterName(char);

impl RegisterName {
    pub fn of(c: char) -> Option<RegisterName> {
        if c.is_ascii_alphabetic() || matches!(c, '"' | '*' | '+' | '-' | '_' | '/') {
            Some(RegisterName(c))
        } else {
            None
        }
    }

    pub fn char(&self) -> char {
        self.0
    }
}

/// One element of a line range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineSpecifier {
    /// `.`
    CurrentLine,
    /// `$` (or `%` in specifier position)
    LastLine,
    /// `'c`
    MarkLine(Mark),
    /// A literal line number.
    Number(u32),
    /// `/pat/`
    NextLineWithPattern(String),
    /// `?pat?`
    PreviousLineWithPattern(String),
    /// `\/`
    NextLineWithPreviousPattern,
    /// `\?`
    PreviousLineWithPreviousPattern,
    /// `\&`
    NextLineWithPreviousSubstitutePattern,
    /// A bare `+N` / `-N` relative to the current line.
    AdjustmentOnCurrent(i32),
    /// A base specifier with a trailing `+N` / `-N`.
    WithAdjustment(Box<LineSpecifier>, i32),
}

/// One or two line specifiers plus their combinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineRange {
    /// `%`
    EntireBuffer,
    SingleLine(LineSpecifier),
    Range {
        left: LineSpecifier,
        right: LineSpecifier,
        /// True for the `;` combinator, where the right side is resolved
        /// with the cursor moved to the left line.
        includes_current_line: bool,
    },
}

bitflags::bitflags! {
    /// Flags accepted after the substitute replacement.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SubstituteFlags: u16 {
        /// `c`
        const CONFIRM = 1 << 0;
        /// `r`
        const USE_PREVIOUS_SEARCH_PATTERN = 1 << 1;
        /// `e`
        const SUPPRESS_ERROR = 1 << 2;
        /// `g`
        const REPLACE_ALL = 1 << 3;
        /// `i`
        const IGNORE_CASE = 1 << 4;
        /// `I`
        const ORDINAL_CASE = 1 << 5;
        /// `n`
        const REPORT_ONLY = 1 << 6;
        /// `p`
        const PRINT_LAST = 1 << 7;
        /// `l`
        const PRINT_LAST_WITH_LIST = 1 << 8;
        /// `#`
        const PRINT_LAST_WITH_NUMBER = 1 << 9;
        /// `&`
        const USE_PREVIOUS_FLAGS = 1 << 10;
        /// Forced by `smagic`.
        const MAGIC = 1 << 11;
        /// Forced by `snomagic`.
        const NOMAGIC = 1 << 12;
    }
}

/// One item in a `:set` argument chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetArgument {
    /// `all`
    DisplayAllButTerminal,
    /// `all&`
    ResetAllToDefault,
    /// `termcap`
    DisplayAllTerminal,
    /// A bare setting name.
    DisplaySetting(String),
    /// `no{name}`
    ToggleSetting(String),
    /// `inv{name}` or `{name}!`
    InvertSetting(String),
    /// `{name}={value}` or `{name}:{value}`
    AssignSetting(String, String),
    /// `{name}+={value}`
    AddSetting(String, String),
    /// `{name}^={value}`
    MultiplySetting(String, String),
    /// `{name}-={value}`
    SubtractSetting(String, String),
}

/// The `+…` option on `edit` and `split`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOption {
    /// Bare `+`
    StartAtLastLine,
    /// `+{num}`
    StartAtLine(u32),
    /// `+/{pat}`
    StartAtPattern(String),
    /// `+{command}`
    ExecuteLineCommand(Box<LineCommand>),
}

/// A `++…` file option. The grammar is not parsed yet; the type exists for
/// the interpreter surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOption(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPath {
    Forward,
    Backward,
}

/// A parsed line command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineCommand {
    /// `close[!]`
    Close { bang: bool },
    /// `[range]delete [reg] [count]`
    Delete {
        range: Option<LineRange>,
        register: Option<RegisterName>,
        count: Option<u32>,
    },
    /// `map`-family with no right-hand side: display mappings.
    DisplayKeyMap {
        modes: Vec<KeyRemapMode>,
        key_notation: Option<String>,
    },
    /// `marks [args]`
    DisplayMarks { marks: Vec<Mark> },
    /// `registers [reg]`
    DisplayRegisters { register: Option<RegisterName> },
    /// `edit[!] [+cmd] [file]`
    Edit {
        bang: bool,
        file_options: Vec<FileOption>,
        command_option: Option<CommandOption>,
        file: String,
    },
    /// `[range]fold`
    Fold { range: Option<LineRange> },
    /// `tabfirst`
    GotoFirstTab,
    /// `tablast`
    GotoLastTab,
    /// `tabnext [count]`
    GotoNextTab { count: Option<u32> },
    /// `tabprevious [count]`
    GotoPreviousTab { count: Option<u32> },
    /// `[range]join [count]`
    Join {
        range: Option<LineRange>,
        count: Option<u32>,
    },
    /// A bare `$`.
    JumpToLastLine,
    /// A bare line number.
    JumpToLine(u32),
    /// `map`-family with a right-hand side.
    MapKeys {
        left: String,
        right: String,
        modes: Vec<KeyRemapMode>,
        allow_remap: bool,
    },
    /// `mapclear`-family.
    ClearKeyMap { modes: Vec<KeyRemapMode> },
    /// `make[!] [args]`
    Make { bang: bool, arguments: String },
    /// `nohlsearch`
    NoHighlightSearch,
    /// `[range]put [reg]`
    PutAfter {
        range: Option<LineRange>,
        register: Option<RegisterName>,
    },
    /// `[range]put! [reg]`
    PutBefore {
        range: Option<LineRange>,
        register: Option<RegisterName>,
    },
    /// `quit[!]`
    Quit { bang: bool },
    /// `qall[!]`
    QuitAll { bang: bool },
    /// `wq[!] [file]`
    QuitWithWrite {
        range: Option<LineRange>,
        bang: bool,
        file_options: Vec<FileOption>,
        file: Option<String>,
    },
    /// `redo`
    Redo,
    /// `[range]retab[!] [tabstop]`
    Retab {
        range: Option<LineRange>,
        bang: bool,
        new_tab_stop: Option<u32>,
    },
    /// `/{pat}` or `?{pat}`
    Search { path: SearchPath, pattern: String },
    /// `set {args}`
    Set { arguments: Vec<SetArgument> },
    /// `[range]<[count]`
    ShiftLeft {
        range: Option<LineRange>,
        count: Option<u32>,
    },
    /// `[range]>[count]`
    ShiftRight {
        range: Option<LineRange>,
        count: Option<u32>,
    },
    /// `source[!] {file}`
    Source { bang: bool, file: String },
    /// `[range]split [+cmd]`
    Split {
        range: Option<LineRange>,
        file_options: Vec<FileOption>,
        command_option: Option<CommandOption>,
    },
    /// `[range]s/{pat}/{replace}/[flags] [count]`
    Substitute {
        range: Option<LineRange>,
        pattern: String,
        replace: String,
        flags: SubstituteFlags,
        count: Option<u32>,
    },
    /// `[range]&[flags] [count]`
    SubstituteRepeat {
        range: Option<LineRange>,
        flags: SubstituteFlags,
        count: Option<u32>,
    },
    /// `[range]~[flags] [count]`
    SubstituteRepeatWithSearch {
        range: Option<LineRange>,
        flags: SubstituteFlags,
        count: Option<u32>,
    },
    /// `unmap`-family.
    UnmapKeys {
        key_notation: String,
        modes: Vec<KeyRemapMode>,
    },
    /// `undo`
    Undo,
    /// `[range]yank [reg] [count]`
    Yank {
        range: Option<LineRange>,
        register: Option<RegisterName>,
        count: Option<u32>,
    },
}
