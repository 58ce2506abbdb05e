//! The edit-focus arbiter.
//!
//! At most one inline editor (block body or section title) may be open at a
//! time. Switching targets flushes the outgoing edit through the
//! `on_request_save` hook rather than silently dropping it; `before_switch`
//! lets the caller clear any other UI-local editing flag before the swap.
//!
//! This is an owned state slice, not a process-global: each document session
//! carries its own `EditFocus`, so independent views cannot cross-talk.

use smol_str::SmolStr;

/// Current focus state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FocusState {
    #[default]
    Idle,
    Editing(SmolStr),
}

/// Hooks fired when focus moves away from a currently-editing entity.
///
/// Both are advisory, fire-and-forget: the arbiter does not wait for the
/// save intent to complete.
#[derive(Default)]
pub struct SwitchHooks<'a> {
    pub before_switch: Option<Box<dyn FnOnce() + 'a>>,
    pub on_request_save: Option<Box<dyn FnOnce(&str) + 'a>>,
}

impl<'a> SwitchHooks<'a> {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_before_switch(mut self, f: impl FnOnce() + 'a) -> Self {
        self.before_switch = Some(Box::new(f));
        self
    }

    pub fn with_on_request_save(mut self, f: impl FnOnce(&str) + 'a) -> Self {
        self.on_request_save = Some(Box::new(f));
        self
    }
}

/// Single-document edit-focus state: `Idle` or `Editing(id)`.
#[derive(Default)]
pub struct EditFocus {
    state: FocusState,
    unsaved: bool,
}

impl EditFocus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FocusState {
        &self.state
    }

    /// Id of the entity currently being edited, if any.
    pub fn current(&self) -> Option<&str> {
        match &self.state {
            FocusState::Idle => None,
            FocusState::Editing(id) => Some(id),
        }
    }

    pub fn is_editing(&self, id: &str) -> bool {
        self.current() == Some(id)
    }

    /// Move focus to `target`.
    ///
    /// If `target` is already in edit mode this is a no-op (returns true:
    /// "already switched"). If some other entity was editing, the
    /// `on_request_save` hook fires exactly once with the outgoing id, then
    /// `before_switch`, both before the swap.
    pub fn switch_to_edit(&mut self, target: &str, hooks: SwitchHooks<'_>) -> bool {
        if let FocusState::Editing(current) = &self.state {
            if current == target {
                return true;
            }
            let outgoing = current.clone();
            tracing::debug!(%outgoing, incoming = target, "edit focus switching");
            if let Some(save) = hooks.on_request_save {
                save(&outgoing);
            }
            if let Some(before) = hooks.before_switch {
                before();
            }
        }
        self.state = FocusState::Editing(SmolStr::new(target));
        true
    }

    /// Back to `Idle` unconditionally.
    pub fn clear(&mut self) {
        self.state = FocusState::Idle;
    }

    /// Editors call this when their local draft diverges from the committed
    /// value.
    pub fn mark_unsaved(&mut self) {
        self.unsaved = true;
    }

    /// Cleared on save confirmation.
    pub fn confirm_saved(&mut self) {
        self.unsaved = false;
    }

    /// Gates exit warnings in the host.
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }
}
