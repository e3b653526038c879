//! Popup menu model.
//!
//! The backend mirrors this model into the platform menu, so it is the
//! single source of truth for order and labels.

/// The fixed set of entries the tray menu can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Update,
    Configure,
    Separator,
    Quit,
}

impl ItemKind {
    /// Stable id used as the platform menu id
    pub fn id(self) -> &'static str {
        match self {
            ItemKind::Update => "lantern.update",
            ItemKind::Configure => "lantern.configure",
            ItemKind::Separator => "lantern.separator",
            ItemKind::Quit => "lantern.quit",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "lantern.update" => Some(ItemKind::Update),
            "lantern.configure" => Some(ItemKind::Configure),
            "lantern.separator" => Some(ItemKind::Separator),
            "lantern.quit" => Some(ItemKind::Quit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub kind: ItemKind,
    pub label: String,
}

impl MenuEntry {
    pub fn new(kind: ItemKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
        }
    }

    pub fn separator() -> Self {
        Self::new(ItemKind::Separator, "")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuModel {
    entries: Vec<MenuEntry>,
}

impl MenuModel {
    /// Configure, separator, Quit
    pub fn standard() -> Self {
        Self {
            entries: vec![
                MenuEntry::new(ItemKind::Configure, "Configure"),
                MenuEntry::separator(),
                MenuEntry::new(ItemKind::Quit, "Quit"),
            ],
        }
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn contains(&self, kind: ItemKind) -> bool {
        self.position(kind).is_some()
    }

    pub fn position(&self, kind: ItemKind) -> Option<usize> {
        self.entries.iter().position(|e| e.kind == kind)
    }

    pub fn label(&self, kind: ItemKind) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.kind == kind)
            .map(|e| e.label.as_str())
    }

    /// Insert at `index` (clamped to the end). Returns false if an entry of
    /// that kind already exists; separators may repeat.
    pub fn insert(&mut self, index: usize, entry: MenuEntry) -> bool {
        if entry.kind != ItemKind::Separator && self.contains(entry.kind) {
            return false;
        }
        let index = index.min(self.entries.len());
        self.entries.insert(index, entry);
        true
    }

    /// Returns false when no entry of that kind exists.
    pub fn set_label(&mut self, kind: ItemKind, label: impl Into<String>) -> bool {
        match self.entries.iter_mut().find(|e| e.kind == kind) {
            Some(entry) => {
                entry.label = label.into();
                true
            }
            None => false,
        }
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.label.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_layout() {
        let menu = MenuModel::standard();
        let kinds: Vec<_> = menu.entries().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![ItemKind::Configure, ItemKind::Separator, ItemKind::Quit]);
        assert!(!menu.contains(ItemKind::Update));
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut menu = MenuModel::standard();
        assert!(menu.insert(0, MenuEntry::new(ItemKind::Update, "Update to Lantern 1.0")));
        assert!(!menu.insert(0, MenuEntry::new(ItemKind::Update, "Update to Lantern 2.0")));
        assert_eq!(menu.position(ItemKind::Update), Some(0));
        assert_eq!(menu.label(ItemKind::Update), Some("Update to Lantern 1.0"));
    }

    #[test]
    fn test_set_label_missing_entry() {
        let mut menu = MenuModel::standard();
        assert!(!menu.set_label(ItemKind::Update, "nope"));
        assert!(menu.set_label(ItemKind::Quit, "Exit"));
        assert_eq!(menu.label(ItemKind::Quit), Some("Exit"));
    }

    #[test]
    fn test_ids_round_trip_every_kind() {
        for kind in [ItemKind::Update, ItemKind::Configure, ItemKind::Separator, ItemKind::Quit] {
            assert_eq!(ItemKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(ItemKind::from_id("something.else"), None);
    }
}
