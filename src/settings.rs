use crate::key::{KeyCode, KeyInput, Modifiers};

/// Engine-wide settings supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalSettings {
    /// The keystroke that drops the engine into Disabled mode, handing
    /// input back to the host editor.
    pub disable_command: KeyInput,
    /// Default magic-ness of search patterns; `smagic`/`snomagic` override
    /// per command.
    pub magic: bool,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            disable_command: KeyInput::new(KeyCode::F(12), Modifiers::CTRL | Modifiers::SHIFT),
            magic: true,
        }
    }
}
