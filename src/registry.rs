use std::collections::HashMap;

use tracing::debug;

use crate::engine::EngineError;
use crate::mode::{Mode, ModeArgument, ModeKind, UninitializedMode};

/// Owns the installed modes and tracks the current and previous mode.
///
/// Freshly constructed, the registry holds only [`UninitializedMode`] and
/// points `current` at it; `previous` is `None` until the first switch.
pub struct ModeRegistry {
    modes: HashMap<ModeKind, Box<dyn Mode>>,
    current: ModeKind,
    previous: Option<ModeKind>,
}

impl Default for ModeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeRegistry {
    pub fn new() -> Self {
        let mut modes: HashMap<ModeKind, Box<dyn Mode>> = HashMap::new();
        modes.insert(ModeKind::Uninitialized, Box::new(UninitializedMode));
        Self {
            modes,
            current: ModeKind::Uninitialized,
            previous: None,
        }
    }

    /// Installs a mode under its own kind, replacing any previous entry.
    pub fn add(&mut self, mode: Box<dyn Mode>) {
        self.modes.insert(mode.mode_kind(), mode);
    }

    /// Removes the mode registered under `kind`.
    pub fn remove(&mut self, kind: ModeKind) -> Option<Box<dyn Mode>> {
        self.modes.remove(&kind)
    }

    pub fn get(&self, kind: ModeKind) -> Option<&dyn Mode> {
        self.modes.get(&kind).map(|m| m.as_ref())
    }

    pub fn get_mut(&mut self, kind: ModeKind) -> Option<&mut (dyn Mode + 'static)> {
        self.modes.get_mut(&kind).map(|m| m.as_mut())
    }

    pub fn current_kind(&self) -> ModeKind {
        self.current
    }

    pub fn previous_kind(&self) -> Option<ModeKind> {
        self.previous
    }

    pub fn current(&self) -> &dyn Mode {
        match self.modes.get(&self.current) {
            Some(mode) => mode.as_ref(),
            None => &UninitializedMode,
        }
    }

    pub fn current_mut(&mut self) -> &mut (dyn Mode + 'static) {
        // Self-heals if the current mode was removed out from under us.
        self.modes
            .entry(self.current)
            .or_insert_with(|| Box::new(UninitializedMode))
            .as_mut()
    }

    /// Kinds of every installed mode, in no particular order.
    pub fn kinds(&self) -> impl Iterator<Item = ModeKind> + '_ {
        self.modes.keys().copied()
    }

    /// Makes `kind` current, running the lifecycle callbacks in order:
    /// `on_leave` on the outgoing mode, then `on_enter(arg)` on the incoming
    /// one. Returns the outgoing kind.
    ///
    /// Previous-mode tracking skips consecutive visual modes: switching
    /// between the visual kinds preserves the pre-visual mode, so a later
    /// switch-to-previous lands outside visual.
    pub fn switch(
        &mut self,
        kind: ModeKind,
        arg: ModeArgument,
    ) -> Result<ModeKind, EngineError> {
        if !self.modes.contains_key(&kind) {
            return Err(EngineError::UnregisteredMode(kind));
        }

        let prev = self.current;
        self.current = kind;

        if let Some(mode) = self.modes.get_mut(&prev) {
            mode.on_leave();
        }

        // An intra-visual switch keeps the pre-visual mode as previous, so
        // a later switch-to-previous lands outside visual.
        match self.previous {
            Some(_) if prev.is_visual() && kind.is_visual() => {}
            _ => self.previous = Some(prev),
        }

        if let Some(mode) = self.modes.get_mut(&kind) {
            mode.on_enter(arg);
        }
        debug!(?prev, current = ?kind, "mode switched");
        Ok(prev)
    }

    /// Runs `on_close` on every installed mode. Order is unspecified.
    pub fn close_all(&mut self) {
        for mode in self.modes.values_mut() {
            mode.on_close();
        }
    }
}
