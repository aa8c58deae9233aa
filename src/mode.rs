use crate::key::KeyInput;

/// Every mode kind the engine can host.
///
/// `Uninitialized` is the registry's construction-time placeholder; a host
/// installs its concrete modes and switches away from it before feeding
/// input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeKind {
    Normal,
    Insert,
    Replace,
    VisualCharacter,
    VisualLine,
    VisualBlock,
    Command,
    SubstituteConfirm,
    Disabled,
    ExternalEdit,
    Uninitialized,
}

impl ModeKind {
    pub fn is_visual(&self) -> bool {
        matches!(
            self,
            ModeKind::VisualCharacter | ModeKind::VisualLine | ModeKind::VisualBlock
        )
    }

    /// True for the modes that absorb printable keystrokes as literal text.
    pub fn is_direct_insert_kind(&self) -> bool {
        matches!(self, ModeKind::Insert | ModeKind::Replace)
    }
}

/// The classifying tag under which the key-map table is consulted.
///
/// Distinct from [`ModeKind`]: Insert and Replace share `Insert`, the three
/// visual kinds share `Visual`, and some mode kinds have no remap mode at
/// all (Disabled, SubstituteConfirm, ExternalEdit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyRemapMode {
    Insert,
    Command,
    Normal,
    Visual,
    Select,
    OperatorPending,
    Language,
}

impl KeyRemapMode {
    /// The default projection from a mode kind. Normal-mode implementations
    /// override this through [`Mode::key_remap_mode`] while an operator is
    /// pending.
    pub fn of_mode_kind(kind: ModeKind) -> Option<KeyRemapMode> {
        match kind {
            ModeKind::Insert | ModeKind::Replace => Some(KeyRemapMode::Insert),
            ModeKind::Command => Some(KeyRemapMode::Command),
            ModeKind::Normal => Some(KeyRemapMode::Normal),
            ModeKind::VisualCharacter | ModeKind::VisualLine | ModeKind::VisualBlock => {
                Some(KeyRemapMode::Visual)
            }
            _ => None,
        }
    }
}

/// Context handed to a mode when it is entered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModeArgument {
    #[default]
    None,
    /// Entering from a visual selection that should be preserved.
    FromVisual,
    /// Insert entered with a repeat count (`3i`).
    InsertWithCount(u32),
}

/// Directive a mode returns alongside a handled keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeSwitch {
    NoSwitch,
    SwitchMode(ModeKind),
    SwitchModeWithArgument(ModeKind, ModeArgument),
    SwitchPreviousMode,
    /// Run one command in Normal mode, then return here (`<C-o>`).
    SwitchModeOneTimeCommand,
}

/// Outcome of dispatching one keystroke to a mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessResult {
    /// Input consumed; the engine applies the switch directive.
    Handled(ModeSwitch),
    /// Input consumed, the mode awaits more input. The one-time-command
    /// bracket stays open.
    HandledNeedMoreInput,
    /// The mode refused the input.
    NotHandled,
    /// Input consumed with a semantic failure.
    Error,
}

impl ProcessResult {
    pub fn is_handled(&self) -> bool {
        matches!(
            self,
            ProcessResult::Handled(_) | ProcessResult::HandledNeedMoreInput
        )
    }
}

/// A mode installed in the engine.
///
/// Concrete modes (Normal, Insert, Visual, ...) live in the host; the engine
/// only drives this contract. Implementors receive lifecycle callbacks on
/// every transition: `on_enter` when the mode becomes current, `on_leave`
/// when another mode takes over, `on_close` exactly once when the engine
/// shuts down.
///
/// # Examples
///
/// ```no_run
/// use vim_core::mode::{Mode, ModeKind, ProcessResult};
/// use vim_core::KeyInput;
///
/// struct MyNormalMode;
///
/// impl Mode for MyNormalMode {
///     fn mode_kind(&self) -> ModeKind {
///         ModeKind::Normal
///     }
///
///     fn can_process(&self, _key: KeyInput) -> bool {
///         true
///     }
///
///     fn process(&mut self, _key: KeyInput) -> ProcessResult {
///         // interpret the keystroke, drive the host's text view
///         ProcessResult::NotHandled
///     }
/// }
/// ```
pub trait Mode {
    /// The kind this mode is registered under.
    fn mode_kind(&self) -> ModeKind;

    /// Whether this mode would accept `key` right now.
    fn can_process(&self, key: KeyInput) -> bool;

    /// Interpret one keystroke.
    fn process(&mut self, key: KeyInput) -> ProcessResult;

    /// Called when this mode becomes current.
    fn on_enter(&mut self, _arg: ModeArgument) {}

    /// Called when another mode takes over.
    fn on_leave(&mut self) {}

    /// Called once when the engine closes.
    fn on_close(&mut self) {}

    /// For Insert/Replace: whether `key` would be placed literally into the
    /// text rather than interpreted as a command. Other modes keep the
    /// default.
    fn is_direct_insert(&self, _key: KeyInput) -> bool {
        false
    }

    /// The remap mode the key-map table is consulted under while this mode
    /// is current. Normal-mode implementations override this while an
    /// operator is pending.
    fn key_remap_mode(&self) -> Option<KeyRemapMode> {
        KeyRemapMode::of_mode_kind(self.mode_kind())
    }
}

/// The registry's construction-time placeholder mode.
///
/// Refuses all input and ignores lifecycle callbacks.
#[derive(Debug, Default, Clone, Copy)]
pub struct UninitializedMode;

impl Mode for UninitializedMode {
    fn mode_kind(&self) -> ModeKind {
        ModeKind::Uninitialized
    }

    fn can_process(&self, _key: KeyInput) -> bool {
        false
    }

    fn process(&mut self, _key: KeyInput) -> ProcessResult {
        ProcessResult::NotHandled
    }
}
