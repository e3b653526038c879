//! Observer registry for tray widgets.
//!
//! Each (widget, event kind) slot holds at most one action. Registering a
//! second action on the same slot replaces the first.

use crate::menu::ItemKind;
use std::collections::HashMap;

/// Something an observer can be attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Widget {
    /// The tray icon itself
    Tray,
    /// A popup menu entry
    Item(ItemKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Show,
    Hide,
    /// Platform gesture asking for the popup menu (right-click on most desktops)
    MenuDetect,
    Selection,
}

/// What the tray does when an observed event fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayAction {
    LogShown,
    LogHidden,
    ShowMenu,
    Configure,
    Quit,
    OpenUpdate,
}

#[derive(Debug, Default)]
pub struct ListenerRegistry {
    slots: HashMap<(Widget, EventKind), TrayAction>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `action`, returning whatever was registered before.
    pub fn set(&mut self, widget: Widget, kind: EventKind, action: TrayAction) -> Option<TrayAction> {
        self.slots.insert((widget, kind), action)
    }

    pub fn get(&self, widget: Widget, kind: EventKind) -> Option<TrayAction> {
        self.slots.get(&(widget, kind)).copied()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_handler_per_slot() {
        let mut registry = ListenerRegistry::new();
        let quit = Widget::Item(ItemKind::Quit);

        assert_eq!(registry.set(quit, EventKind::Selection, TrayAction::Configure), None);
        assert_eq!(
            registry.set(quit, EventKind::Selection, TrayAction::Quit),
            Some(TrayAction::Configure)
        );
        assert_eq!(registry.get(quit, EventKind::Selection), Some(TrayAction::Quit));
        assert_eq!(registry.get(quit, EventKind::Show), None);
        assert_eq!(registry.get(Widget::Tray, EventKind::Selection), None);
    }

    #[test]
    fn test_clear_drops_every_slot() {
        let mut registry = ListenerRegistry::new();
        registry.set(Widget::Tray, EventKind::MenuDetect, TrayAction::ShowMenu);
        registry.set(Widget::Item(ItemKind::Quit), EventKind::Selection, TrayAction::Quit);

        registry.clear();
        assert_eq!(registry.get(Widget::Tray, EventKind::MenuDetect), None);
        assert_eq!(registry.get(Widget::Item(ItemKind::Quit), EventKind::Selection), None);
    }
}
