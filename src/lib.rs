//! # vim_core - The modal input core of a Vim emulation layer
//!
//! `vim_core` is a platform-agnostic Rust library providing the two engines
//! at the heart of a Vim emulator embedded in a host editor: a per-buffer
//! input-processing engine and an ex (line) command parser. It interprets
//! keystrokes through user-configured remappings, tracks modal state, and
//! parses command lines into ASTs that host applications execute against
//! their own buffers.
//!
//! ## Design Philosophy
//!
//! This library follows a strict separation of concerns:
//! - **The library handles**: remap resolution and prefix buffering, mode
//!   transitions (including one-time commands), event ordering, and the full
//!   ex-command grammar
//! - **The host handles**: text storage, the concrete mode implementations,
//!   rendering, registers and marks, undo/redo, command execution
//!
//! ## Key Features
//!
//! - **Mode dispatch**: eleven mode kinds behind one [`Mode`](mode::Mode)
//!   trait; the engine routes each keystroke to the current mode and applies
//!   the switch directive it returns
//! - **Key remapping**: `noremap`-aware recursive expansion with cycle
//!   detection, and multi-key prefixes buffered across calls (`gg`, `jk`)
//! - **One-time commands**: `<C-o>`-style excursions from Insert/Replace to
//!   Normal and back after a single command
//! - **Ex parsing**: line ranges (`.`, `$`, `%`, marks, patterns, signed
//!   adjustments), abbreviated command names, substitute flags, map-key
//!   arguments, and set-option chains
//! - **Events as data**: everything observable lands in an ordered event
//!   queue the host drains after each call
//!
//! ## Quick Start
//!
//! ```no_run
//! use vim_core::{InputEngine, KeyInput, KeyMap};
//! use vim_core::ex::parse_line_command;
//! use vim_core::mode::{ModeArgument, ModeKind};
//!
//! // Build the engine, install the host's modes, start in Normal.
//! let mut engine = InputEngine::new();
//! // engine.register_mode(Box::new(MyNormalMode::new(...)));
//! engine.switch_mode(ModeKind::Normal, ModeArgument::None).unwrap();
//!
//! // Feed keystrokes through the host's mapping table.
//! let keymap = KeyMap::new();
//! let result = engine.process(&keymap, KeyInput::char('j')).unwrap();
//!
//! // Apply what happened to the host's UI.
//! for event in engine.drain_events() {
//!     // update status bar, mode line, buffer mode ...
//! }
//!
//! // Parse a typed command line into an AST for the host's interpreter.
//! let command = parse_line_command("%s/foo/bar/g").unwrap();
//! ```
//!
//! ## Integration Guide
//!
//! To integrate vim_core into your application:
//!
//! 1. **Implement the [`Mode`](mode::Mode) trait** for each mode your editor
//!    supports and register the modes with the engine
//! 2. **Map platform key events** to [`KeyInput`]
//! 3. **Keep a [`KeyMap`]** (or implement [`KeyMapTable`] over your own
//!    storage) and pass it to every `process` call
//! 4. **Drain and apply events** after each call
//! 5. **Execute parsed [`LineCommand`](ex::LineCommand) values** in your
//!    command interpreter
//!
//! ## What's NOT Included
//!
//! To keep the library focused on input processing and parsing:
//! - No text manipulation (modes drive the host's buffer directly)
//! - No rendering or window management
//! - No persisted state
//! - No concrete mode semantics (motions, operators, insertion)

pub mod engine;
pub mod ex;
pub mod key;
pub mod mode;
pub mod notation;
pub mod registry;
pub mod remap;
pub mod settings;

pub use crate::engine::{EngineError, EngineEvent, EngineSnapshot, InputEngine, InputEngineBuilder};
pub use crate::key::{KeyCode, KeyInput, KeyInputSet, Modifiers};
pub use crate::mode::{KeyRemapMode, Mode, ModeArgument, ModeKind, ModeSwitch, ProcessResult};
pub use crate::notation::{NotationError, parse_key_notation, to_notation};
pub use crate::registry::ModeRegistry;
pub use crate::remap::{KeyMap, KeyMapTable, KeyMappingResult};
pub use crate::settings::GlobalSettings;
