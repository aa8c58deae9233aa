use thiserror::Error;
use tracing::{debug, trace};

use crate::key::{KeyInput, KeyInputSet};
use crate::mode::{Mode, ModeArgument, ModeKind, ModeSwitch, ProcessResult};
use crate::registry::ModeRegistry;
use crate::remap::{KeyMapTable, KeyMappingResult};
use crate::settings::GlobalSettings;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("engine already closed")]
    AlreadyClosed,
    #[error("no mode registered for {0:?}")]
    UnregisteredMode(ModeKind),
}

/// Everything observable the engine does, in the order it happened.
///
/// The engine is the single authority on mode state; it records events into
/// an internal queue and the host drains them with
/// [`InputEngine::drain_events`], applying mode switches to its own buffer
/// and messages to its status bar. Within one `process` call the order is
/// fixed: `KeyInputStart`, any `SwitchedMode` events from dispatch, then
/// `KeyInputProcessed` (or `KeyInputBuffered` in its place), then
/// `KeyInputEnd`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    SwitchedMode { prev: ModeKind, current: ModeKind },
    KeyInputStart(KeyInput),
    KeyInputBuffered(KeyInput),
    KeyInputProcessed(KeyInput, ProcessResult),
    KeyInputEnd(KeyInput),
    ErrorMessage(String),
    WarningMessage(String),
    StatusMessage(String),
    StatusMessageLong(Vec<String>),
    Closed,
}

/// Point-in-time view of the engine's mutable state.
#[derive(Debug, Clone)]
pub struct EngineSnapshot {
    pub current_mode: ModeKind,
    pub previous_mode: Option<ModeKind>,
    pub buffered_keys: Option<KeyInputSet>,
    pub in_one_time_command: Option<ModeKind>,
}

pub struct InputEngineBuilder {
    settings: GlobalSettings,
    modes: Vec<Box<dyn Mode>>,
}

impl Default for InputEngineBuilder {
    fn default() -> Self {
        Self {
            settings: GlobalSettings::default(),
            modes: Vec::new(),
        }
    }
}

impl InputEngineBuilder {
    pub fn settings(mut self, settings: GlobalSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Pre-registers a mode; equivalent to calling
    /// [`InputEngine::register_mode`] after `build`.
    pub fn mode(mut self, mode: Box<dyn Mode>) -> Self {
        self.modes.push(mode);
        self
    }

    pub fn build(self) -> InputEngine {
        let mut registry = ModeRegistry::new();
        for mode in self.modes {
            registry.add(mode);
        }
        InputEngine {
            registry,
            settings: self.settings,
            buffered_remap_input: None,
            in_one_time_command: None,
            is_closed: false,
            processing_depth: 0,
            events: Vec::new(),
        }
    }
}

/// The per-buffer input-processing engine.
///
/// Feeds each keystroke through remap resolution (buffering multi-key
/// prefixes between calls), dispatches the resolved keys to the current
/// mode, and applies the mode's switch directives, including the
/// one-time-command bracket entered via `SwitchModeOneTimeCommand` and left
/// when the next command completes.
///
/// Collaborators are borrowed per call: the host passes its key-map table to
/// [`process`](Self::process), just as it passes its text buffer to the
/// concrete modes it installs.
pub struct InputEngine {
    registry: ModeRegistry,
    settings: GlobalSettings,
    buffered_remap_input: Option<KeyInputSet>,
    in_one_time_command: Option<ModeKind>,
    is_closed: bool,
    processing_depth: u32,
    events: Vec<EngineEvent>,
}

impl Default for InputEngine {
    fn default() -> Self {
        InputEngineBuilder::default().build()
    }
}

impl InputEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> InputEngineBuilder {
        InputEngineBuilder::default()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            current_mode: self.registry.current_kind(),
            previous_mode: self.registry.previous_kind(),
            buffered_keys: self.buffered_remap_input.clone(),
            in_one_time_command: self.in_one_time_command,
        }
    }

    pub fn register_mode(&mut self, mode: Box<dyn Mode>) {
        self.registry.add(mode);
    }

    pub fn remove_mode(&mut self, kind: ModeKind) -> Option<Box<dyn Mode>> {
        self.registry.remove(kind)
    }

    pub fn current_mode_kind(&self) -> ModeKind {
        self.registry.current_kind()
    }

    pub fn previous_mode_kind(&self) -> Option<ModeKind> {
        self.registry.previous_kind()
    }

    pub fn registered_modes(&self) -> Vec<ModeKind> {
        self.registry.kinds().collect()
    }

    pub fn in_one_time_command(&self) -> Option<ModeKind> {
        self.in_one_time_command
    }

    pub fn buffered_key_inputs(&self) -> Option<&KeyInputSet> {
        self.buffered_remap_input.as_ref()
    }

    pub fn is_processing_input(&self) -> bool {
        self.processing_depth > 0
    }

    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    /// Removes and returns every event recorded since the last drain, in
    /// order.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn post_status(&mut self, message: impl Into<String>) {
        self.events.push(EngineEvent::StatusMessage(message.into()));
    }

    pub fn post_status_long(&mut self, lines: Vec<String>) {
        self.events.push(EngineEvent::StatusMessageLong(lines));
    }

    pub fn post_warning(&mut self, message: impl Into<String>) {
        self.events
            .push(EngineEvent::WarningMessage(message.into()));
    }

    pub fn post_error(&mut self, message: impl Into<String>) {
        self.events.push(EngineEvent::ErrorMessage(message.into()));
    }

    fn ensure_open(&self) -> Result<(), EngineError> {
        if self.is_closed {
            Err(EngineError::AlreadyClosed)
        } else {
            Ok(())
        }
    }

    /// Makes `kind` current and records the `SwitchedMode` event. The host
    /// applies that event to its own buffer; inbound convergence goes
    /// through [`sync_mode`](Self::sync_mode) instead, so the two sides
    /// cannot feed back into each other.
    pub fn switch_mode(
        &mut self,
        kind: ModeKind,
        arg: ModeArgument,
    ) -> Result<ModeKind, EngineError> {
        self.ensure_open()?;
        let prev = self.registry.switch(kind, arg)?;
        self.events.push(EngineEvent::SwitchedMode {
            prev,
            current: kind,
        });
        Ok(kind)
    }

    /// Returns to the previously current mode. With no previous mode the
    /// current mode is returned unchanged.
    pub fn switch_previous_mode(&mut self) -> Result<ModeKind, EngineError> {
        self.ensure_open()?;
        match self.registry.previous_kind() {
            None => Ok(self.registry.current_kind()),
            Some(kind) => self.switch_mode(kind, ModeArgument::None),
        }
    }

    /// Converges on a mode change announced by the host's buffer. A no-op
    /// when `kind` already is the current mode; this same-kind guard is what
    /// keeps host and engine from ping-ponging switches.
    pub fn sync_mode(
        &mut self,
        kind: ModeKind,
        arg: ModeArgument,
    ) -> Result<ModeKind, EngineError> {
        self.ensure_open()?;
        if kind == self.registry.current_kind() {
            return Ok(kind);
        }
        self.switch_mode(kind, arg)
    }

    /// Whether `input` would be accepted right now, counting keystrokes that
    /// Insert/Replace would absorb as literal text.
    pub fn can_process<T: KeyMapTable + ?Sized>(&self, table: &T, input: KeyInput) -> bool {
        self.can_process_core(table, input, true)
    }

    /// Like [`can_process`](Self::can_process), but false for keystrokes
    /// Insert/Replace would treat as direct inserts. Hosts use this to ask
    /// whether the engine claims `input` as a command.
    pub fn can_process_as_command<T: KeyMapTable + ?Sized>(
        &self,
        table: &T,
        input: KeyInput,
    ) -> bool {
        self.can_process_core(table, input, false)
    }

    fn can_process_core<T: KeyMapTable + ?Sized>(
        &self,
        table: &T,
        input: KeyInput,
        allow_direct_insert: bool,
    ) -> bool {
        if self.is_closed {
            return false;
        }
        let (result, set) = self.resolve_with_buffer(table, input);
        match result {
            // The engine will at least buffer the prefix or report the cycle.
            KeyMappingResult::NeedsMoreInput | KeyMappingResult::Recursive => true,
            KeyMappingResult::NoMapping => self.can_process_one(set.first(), allow_direct_insert),
            KeyMappingResult::Mapped(mapped) => {
                self.can_process_one(mapped.first(), allow_direct_insert)
            }
        }
    }

    fn can_process_one(&self, key: KeyInput, allow_direct_insert: bool) -> bool {
        if key == self.settings.disable_command {
            return true;
        }
        if key.is_nop() {
            return true;
        }
        // Escape must force the return to Insert/Replace even when the
        // current mode would refuse it.
        if key.is_escape() && self.in_one_time_command.is_some() {
            return true;
        }
        let mode = self.registry.current();
        if !mode.can_process(key) {
            return false;
        }
        if allow_direct_insert {
            true
        } else {
            !(mode.mode_kind().is_direct_insert_kind() && mode.is_direct_insert(key))
        }
    }

    /// Feeds one keystroke through remapping and mode dispatch, consuming
    /// any buffered prefix.
    pub fn process<T: KeyMapTable + ?Sized>(
        &mut self,
        table: &T,
        input: KeyInput,
    ) -> Result<ProcessResult, EngineError> {
        self.ensure_open()?;
        self.processing_depth += 1;
        self.events.push(EngineEvent::KeyInputStart(input));
        debug!(?input, mode = ?self.registry.current_kind(), "processing key");

        let result = self.process_resolved(table, input);

        self.events.push(EngineEvent::KeyInputEnd(input));
        self.processing_depth -= 1;
        Ok(result)
    }

    /// Declares that `input` was already handled externally: clears any
    /// buffered prefix and records the start/processed/end events without
    /// remapping or dispatch.
    pub fn simulate_processed(&mut self, input: KeyInput) -> Result<(), EngineError> {
        self.ensure_open()?;
        self.buffered_remap_input = None;
        self.events.push(EngineEvent::KeyInputStart(input));
        self.events.push(EngineEvent::KeyInputProcessed(
            input,
            ProcessResult::Handled(ModeSwitch::NoSwitch),
        ));
        self.events.push(EngineEvent::KeyInputEnd(input));
        Ok(())
    }

    /// Tears the engine down: `on_leave` on the current mode, `on_close` on
    /// every registered mode, state cleared, `Closed` recorded. A second
    /// call fails with [`EngineError::AlreadyClosed`].
    pub fn close(&mut self) -> Result<(), EngineError> {
        self.ensure_open()?;
        self.registry.current_mut().on_leave();
        self.registry.close_all();
        self.buffered_remap_input = None;
        self.in_one_time_command = None;
        self.is_closed = true;
        self.events.push(EngineEvent::Closed);
        Ok(())
    }

    fn resolve_with_buffer<T: KeyMapTable + ?Sized>(
        &self,
        table: &T,
        input: KeyInput,
    ) -> (KeyMappingResult, KeyInputSet) {
        let set = match &self.buffered_remap_input {
            Some(buffered) => buffered.append(input),
            None => KeyInputSet::single(input),
        };
        match self.registry.current().key_remap_mode() {
            Some(mode) => (table.get_key_mapping(&set, mode), set),
            None => (KeyMappingResult::Mapped(set.clone()), set),
        }
    }

    fn process_resolved<T: KeyMapTable + ?Sized>(
        &mut self,
        table: &T,
        input: KeyInput,
    ) -> ProcessResult {
        let (result, set) = self.resolve_with_buffer(table, input);
        self.buffered_remap_input = None;

        match result {
            KeyMappingResult::NoMapping => {
                let last = self.dispatch_all(&set);
                self.events
                    .push(EngineEvent::KeyInputProcessed(input, last.clone()));
                last
            }
            KeyMappingResult::Mapped(mapped) => {
                let last = self.dispatch_all(&mapped);
                self.events
                    .push(EngineEvent::KeyInputProcessed(input, last.clone()));
                last
            }
            KeyMappingResult::NeedsMoreInput => {
                self.buffered_remap_input = Some(set);
                self.events.push(EngineEvent::KeyInputBuffered(input));
                ProcessResult::Handled(ModeSwitch::NoSwitch)
            }
            KeyMappingResult::Recursive => {
                self.post_error("recursive mapping");
                self.events
                    .push(EngineEvent::KeyInputProcessed(input, ProcessResult::Error));
                ProcessResult::Error
            }
        }
    }

    /// Dispatches every key in `set`; the reported result is the one from
    /// the last key.
    fn dispatch_all(&mut self, set: &KeyInputSet) -> ProcessResult {
        let mut last = ProcessResult::NotHandled;
        for &key in set.keys() {
            last = self.dispatch_one(key);
        }
        last
    }

    fn dispatch_one(&mut self, key: KeyInput) -> ProcessResult {
        trace!(?key, "dispatch");
        if key == self.settings.disable_command
            && self.registry.current_kind() != ModeKind::Disabled
        {
            return match self.switch_mode(ModeKind::Disabled, ModeArgument::None) {
                Ok(_) => ProcessResult::Handled(ModeSwitch::SwitchMode(ModeKind::Disabled)),
                Err(err) => {
                    self.post_error(err.to_string());
                    ProcessResult::Error
                }
            };
        }

        if key.is_nop() {
            return ProcessResult::Handled(ModeSwitch::NoSwitch);
        }

        // Escape ends a pending one-time command even when the current mode
        // refuses it.
        if key.is_escape()
            && let Some(target) = self.in_one_time_command
            && !self.registry.current().can_process(key)
        {
            self.in_one_time_command = None;
            return match self.switch_mode(target, ModeArgument::None) {
                Ok(_) => ProcessResult::Handled(ModeSwitch::SwitchMode(target)),
                Err(err) => {
                    self.post_error(err.to_string());
                    ProcessResult::Error
                }
            };
        }

        let result = self.registry.current_mut().process(key);
        self.apply_post_dispatch(result)
    }

    fn apply_post_dispatch(&mut self, result: ProcessResult) -> ProcessResult {
        match &result {
            ProcessResult::Handled(ModeSwitch::NoSwitch) => {
                // Visual preserves the one-time-command bracket across
                // intra-visual motion.
                if !self.registry.current_kind().is_visual() {
                    self.leave_one_time_command();
                }
                result
            }
            ProcessResult::Handled(ModeSwitch::SwitchMode(kind)) => {
                self.switch_or_error(*kind, ModeArgument::None, result.clone())
            }
            ProcessResult::Handled(ModeSwitch::SwitchModeWithArgument(kind, arg)) => {
                self.switch_or_error(*kind, arg.clone(), result.clone())
            }
            ProcessResult::Handled(ModeSwitch::SwitchPreviousMode) => {
                if let Some(target) = self.in_one_time_command.take() {
                    self.switch_or_error(target, ModeArgument::None, result.clone())
                } else {
                    match self.switch_previous_mode() {
                        Ok(_) => result,
                        Err(err) => {
                            self.post_error(err.to_string());
                            ProcessResult::Error
                        }
                    }
                }
            }
            ProcessResult::Handled(ModeSwitch::SwitchModeOneTimeCommand) => {
                self.in_one_time_command = Some(self.registry.current_kind());
                self.switch_or_error(ModeKind::Normal, ModeArgument::None, result.clone())
            }
            ProcessResult::HandledNeedMoreInput => result,
            ProcessResult::NotHandled | ProcessResult::Error => {
                self.leave_one_time_command();
                result
            }
        }
    }

    fn switch_or_error(
        &mut self,
        kind: ModeKind,
        arg: ModeArgument,
        result: ProcessResult,
    ) -> ProcessResult {
        match self.switch_mode(kind, arg) {
            Ok(_) => result,
            Err(err) => {
                self.post_error(err.to_string());
                ProcessResult::Error
            }
        }
    }

    fn leave_one_time_command(&mut self) {
        if let Some(target) = self.in_one_time_command.take()
            && let Err(err) = self.switch_mode(target, ModeArgument::None)
        {
            self.post_error(err.to_string());
        }
    }
}
