//! Keyboard shortcut registry.
//!
//! Shortcuts are keyed by an id such as `Ctrl+Shift+r`. A key press first
//! looks for a handler bound to its exact modifier set, then for one bound
//! to the bare key.

use std::collections::HashMap;

use bitflags::bitflags;

bitflags! {
    /// Modifier keys held during a key press.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const CTRL = 0b001;
        const SHIFT = 0b010;
        const ALT = 0b100;
    }
}

/// Canonical id for `key` under `modifiers`: `Ctrl+Shift+Alt+<key>` order.
pub fn key_id(key: &str, modifiers: Modifiers) -> String {
    let mut id = String::new();
    for (flag, name) in [
        (Modifiers::CTRL, "Ctrl+"),
        (Modifiers::SHIFT, "Shift+"),
        (Modifiers::ALT, "Alt+"),
    ] {
        if modifiers.contains(flag) {
            id.push_str(name);
        }
    }
    id.push_str(key);
    id
}

type Handler<C> = Box<dyn FnMut(&mut C)>;

/// Shortcut table dispatching to handlers over a caller context `C`.
pub struct ShortcutMap<C> {
    handlers: HashMap<String, Handler<C>>,
}

impl<C> Default for ShortcutMap<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ShortcutMap<C> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Bind `handler`, replacing any existing binding for the same id.
    pub fn on(&mut self, key: &str, modifiers: Modifiers, handler: impl FnMut(&mut C) + 'static) {
        self.handlers.insert(key_id(key, modifiers), Box::new(handler));
    }

    /// Remove a binding. Returns whether one existed.
    pub fn off(&mut self, key: &str, modifiers: Modifiers) -> bool {
        self.handlers.remove(&key_id(key, modifiers)).is_some()
    }

    pub fn is_bound(&self, key: &str, modifiers: Modifiers) -> bool {
        self.handlers.contains_key(&key_id(key, modifiers))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run the handler for a key press. Returns `true` if one ran.
    pub fn dispatch(&mut self, key: &str, modifiers: Modifiers, ctx: &mut C) -> bool {
        let exact = key_id(key, modifiers);
        if let Some(handler) = self.handlers.get_mut(&exact) {
            handler(ctx);
            return true;
        }
        if modifiers.is_empty() {
            return false;
        }
        match self.handlers.get_mut(key) {
            Some(handler) => {
                handler(ctx);
                true
            }
            None => false,
        }
    }
}
