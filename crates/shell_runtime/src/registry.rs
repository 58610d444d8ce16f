//! Static application registry: id → display metadata and renderer.

use shell_app_contract::{AppId, ApplicationDescriptor};
use tracing::debug;

/// Append-only table of application descriptors in declaration order.
///
/// Entries are idempotent on duplicate id: the first registration wins and
/// later ones are ignored, so re-registering a persisted folder or a
/// misconfigured duplicate never clobbers a live descriptor.
#[derive(Debug, Clone, Default)]
pub struct AppRegistry {
    entries: Vec<ApplicationDescriptor>,
}

impl AppRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_descriptors(descriptors: impl IntoIterator<Item = ApplicationDescriptor>) -> Self {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor);
        }
        registry
    }

    /// Adds a descriptor; returns `false` (and leaves the table unchanged)
    /// when the id is already present.
    pub fn register(&mut self, descriptor: ApplicationDescriptor) -> bool {
        if self.contains(&descriptor.id) {
            debug!(app_id = %descriptor.id, "ignoring duplicate app registration");
            return false;
        }
        self.entries.push(descriptor);
        true
    }

    pub fn lookup(&self, app_id: &AppId) -> Option<&ApplicationDescriptor> {
        self.entries.iter().find(|entry| &entry.id == app_id)
    }

    pub fn contains(&self, app_id: &AppId) -> bool {
        self.lookup(app_id).is_some()
    }

    /// Favourites in stable declaration order, for shortcut rendering.
    pub fn favourites(&self) -> impl Iterator<Item = &ApplicationDescriptor> {
        self.entries.iter().filter(|entry| entry.favourite)
    }

    pub fn desktop_shortcuts(&self) -> impl Iterator<Item = &ApplicationDescriptor> {
        self.entries.iter().filter(|entry| entry.desktop_shortcut)
    }

    /// Every registered descriptor, for the full app-grid overview.
    pub fn all(&self) -> impl Iterator<Item = &ApplicationDescriptor> {
        self.entries.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &AppId> {
        self.entries.iter().map(|entry| &entry.id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn descriptor(id: &str, title: &str) -> ApplicationDescriptor {
        ApplicationDescriptor::new(id, title, "/icons/generic.svg")
    }

    #[test]
    fn duplicate_registration_keeps_first_entry() {
        let mut registry = AppRegistry::new();
        assert!(registry.register(descriptor("calculator", "Calc")));
        assert!(!registry.register(descriptor("calculator", "Impostor")));

        assert_eq!(registry.len(), 1);
        let entry = registry.lookup(&AppId::from("calculator")).expect("entry");
        assert_eq!(entry.title, "Calc");
    }

    #[test]
    fn favourites_preserve_declaration_order() {
        let registry = AppRegistry::from_descriptors([
            descriptor("terminal", "Terminal").favourite(true),
            descriptor("trash", "Trash"),
            descriptor("calculator", "Calc").favourite(true),
        ]);

        let favourites: Vec<&str> = registry.favourites().map(|d| d.id.as_str()).collect();
        assert_eq!(favourites, vec!["terminal", "calculator"]);
    }

    #[test]
    fn lookup_of_unknown_id_is_none() {
        let registry = AppRegistry::new();
        assert!(registry.lookup(&AppId::from("missing")).is_none());
    }
}
