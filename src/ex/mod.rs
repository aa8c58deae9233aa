//! The ex (line) command parser.
//!
//! A single-pass, hand-written recursive parser that turns one textual
//! command line (`%s/foo/bar/gc`, `3,$d a 5`, `nnoremap <C-x> :echo<CR>`)
//! into a [`LineCommand`] AST node. Execution belongs to the host's
//! interpreter; nothing here touches text or editor state.

pub mod ast;
pub mod cursor;
pub mod names;
pub mod parse;
pub mod range;

pub use ast::{
    CommandOption, FileOption, LineCommand, LineRange, LineSpecifier, Mark, RegisterName,
    SearchPath, SetArgument, SubstituteFlags,
};
pub use cursor::CharCursor;
pub use names::expand;
pub use parse::{ParseError, Parser, parse_line_command};
pub use range::{parse_line_range, parse_line_specifier};
