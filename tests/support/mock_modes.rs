use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use vim_core::mode::{Mode, ModeArgument, ModeKind, ProcessResult};
use vim_core::{KeyCode, KeyInput};

/// Shared handle into a [`FakeMode`] that stays usable after the mode is
/// boxed into the engine: scripted process results go in, lifecycle and
/// process calls come out.
#[derive(Clone, Default)]
pub struct ModeScript {
    responses: Rc<RefCell<VecDeque<ProcessResult>>>,
    log: Rc<RefCell<Vec<String>>>,
}

impl ModeScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the result the next `process` call returns. With an empty
    /// queue the mode answers `Handled(NoSwitch)`.
    pub fn push_response(&self, result: ProcessResult) {
        self.responses.borrow_mut().push_back(result);
    }

    pub fn take_log(&self) -> Vec<String> {
        std::mem::take(&mut self.log.borrow_mut())
    }

    fn record(&self, line: String) {
        self.log.borrow_mut().push(line);
    }

    fn next_response(&self) -> ProcessResult {
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or(ProcessResult::Handled(vim_core::ModeSwitch::NoSwitch))
    }
}

/// A scriptable mode for driving the engine in tests.
pub struct FakeMode {
    kind: ModeKind,
    script: ModeScript,
    refused: Vec<KeyInput>,
    direct_insert_chars: bool,
}

impl FakeMode {
    pub fn new(kind: ModeKind, script: &ModeScript) -> Self {
        Self {
            kind,
            script: script.clone(),
            refused: Vec::new(),
            direct_insert_chars: false,
        }
    }

    /// Keys `can_process` answers false for.
    pub fn refusing(mut self, keys: Vec<KeyInput>) -> Self {
        self.refused = keys;
        self
    }

    /// Treat unmodified character keys as direct inserts (Insert/Replace
    /// behavior).
    pub fn with_direct_inserts(mut self) -> Self {
        self.direct_insert_chars = true;
        self
    }
}

impl Mode for FakeMode {
    fn mode_kind(&self) -> ModeKind {
        self.kind
    }

    fn can_process(&self, key: KeyInput) -> bool {
        !self.refused.contains(&key)
    }

    fn process(&mut self, key: KeyInput) -> ProcessResult {
        self.script.record(format!("process:{:?}:{:?}", self.kind, key.code));
        self.script.next_response()
    }

    fn on_enter(&mut self, _arg: ModeArgument) {
        self.script.record(format!("enter:{:?}", self.kind));
    }

    fn on_leave(&mut self) {
        self.script.record(format!("leave:{:?}", self.kind));
    }

    fn on_close(&mut self) {
        self.script.record(format!("close:{:?}", self.kind));
    }

    fn is_direct_insert(&self, key: KeyInput) -> bool {
        self.direct_insert_chars
            && key.mods.is_empty()
            && matches!(key.code, KeyCode::Char(_))
    }
}
