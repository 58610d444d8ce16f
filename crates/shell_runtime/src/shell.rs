//! Desktop/shell composition layer.
//!
//! Assembles registry, window manager, and event bus into the on-screen
//! shell: dispatches command-topic events into the reducer, broadcasts the
//! cached snapshot after every mutation, owns the top-overlay marker and
//! chrome-visibility policy, and runs the synthetic folder creation flow.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use platform_prefs::{load_pref_typed, save_pref_typed, PrefsStore};
use shell_app_contract::{AppId, ApplicationDescriptor};

use crate::bus::{EventBus, ShellEvent, Subscription, Topic};
use crate::model::{DesktopState, InteractionState, Viewport, WindowId};
use crate::reducer::{reduce_shell, RuntimeEffect, ShellAction};
use crate::registry::AppRegistry;
use crate::views::StateSnapshot;

/// Prefs key holding the persisted synthetic folder list.
pub const FOLDERS_KEY: &str = "new_folders";

const FOLDER_ICON: &str = "/system/folder.png";

/// Full-screen overlays; at most one is topmost at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    AllApps,
    Activities,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FolderCreationStatus {
    Success,
    Error,
}

/// Structured outcome of a folder creation request, routed back to the
/// initiating collaborator via its correlation id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderCreationResult {
    pub status: FolderCreationStatus,
    pub message: String,
    pub correlation_id: u64,
}

impl FolderCreationResult {
    pub fn success(correlation_id: u64, message: impl Into<String>) -> Self {
        Self {
            status: FolderCreationStatus::Success,
            message: message.into(),
            correlation_id,
        }
    }

    pub fn error(correlation_id: u64, message: impl Into<String>) -> Self {
        Self {
            status: FolderCreationStatus::Error,
            message: message.into(),
            correlation_id,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == FolderCreationStatus::Success
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct FolderEntry {
    id: String,
    name: String,
}

type ExternalOpener = Rc<dyn Fn(&str)>;

struct ShellCore {
    registry: AppRegistry,
    state: DesktopState,
    interaction: InteractionState,
    snapshot: StateSnapshot,
    viewport: Viewport,
    top_overlay: Option<Overlay>,
    prefs: Rc<dyn PrefsStore>,
    external_opener: Option<ExternalOpener>,
}

impl ShellCore {
    fn refresh_snapshot(&mut self) -> ShellEvent {
        self.snapshot = StateSnapshot::compute(&self.state, &self.registry);
        ShellEvent::WindowStateChanged {
            snapshot: self.snapshot.clone(),
        }
    }

    /// Applies an action and collects the notifications to publish once
    /// the core borrow has been released.
    fn apply(&mut self, action: ShellAction) -> (Vec<ShellEvent>, Vec<String>) {
        let effects = reduce_shell(&mut self.state, &mut self.interaction, &self.registry, action);
        let mut events = Vec::new();
        let mut urls = Vec::new();
        if effects.contains(&RuntimeEffect::StateChanged) {
            events.push(self.refresh_snapshot());
        }
        for effect in effects {
            if let RuntimeEffect::OpenExternalUrl(url) = effect {
                urls.push(url);
            }
        }
        (events, urls)
    }

    fn persisted_folders(&self) -> Vec<FolderEntry> {
        match load_pref_typed::<Vec<FolderEntry>>(self.prefs.as_ref(), FOLDERS_KEY) {
            Ok(folders) => folders.unwrap_or_default(),
            Err(err) => {
                warn!(%err, "persisted folder list unreadable, starting empty");
                Vec::new()
            }
        }
    }

    fn register_folder_descriptor(&mut self, id: &str, name: &str) -> bool {
        self.registry.register(
            ApplicationDescriptor::new(id, name, FOLDER_ICON)
                .disabled(true)
                .desktop_shortcut(true),
        )
    }

    fn create_folder(
        &mut self,
        name: &str,
        correlation_id: u64,
    ) -> (FolderCreationResult, Vec<ShellEvent>) {
        let name = name.trim();
        if name.is_empty() {
            return (
                FolderCreationResult::error(correlation_id, "mkdir: missing operand"),
                Vec::new(),
            );
        }

        let folder_id = folder_id_from_name(name);
        let mut folders = self.persisted_folders();
        let exists_in_registry = self.registry.contains(&AppId::from(folder_id.as_str()));
        let exists_in_storage = folders.iter().any(|folder| folder.id == folder_id);
        if exists_in_registry || exists_in_storage {
            return (
                FolderCreationResult::error(
                    correlation_id,
                    format!("mkdir: cannot create directory '{name}': Folder exists"),
                ),
                Vec::new(),
            );
        }

        self.register_folder_descriptor(&folder_id, name);
        folders.push(FolderEntry {
            id: folder_id,
            name: name.to_string(),
        });
        if let Err(err) = save_pref_typed(self.prefs.as_ref(), FOLDERS_KEY, &folders) {
            warn!(%err, "folder list persistence failed");
        }

        // The registry grew, so the closed map gains a key.
        let snapshot_event = self.refresh_snapshot();
        (
            FolderCreationResult::success(correlation_id, "Folder Created Successfully"),
            vec![snapshot_event],
        )
    }
}

/// Cloneable handle to the shell; clones share the same core, mirroring
/// the single shell instance of a desktop session.
#[derive(Clone)]
pub struct DesktopShell {
    inner: Rc<RefCell<ShellCore>>,
    bus: EventBus,
}

impl DesktopShell {
    /// Builds the shell around a populated registry, re-registering any
    /// folders persisted by earlier sessions.
    pub fn new(registry: AppRegistry, bus: EventBus, prefs: Rc<dyn PrefsStore>) -> Self {
        let mut core = ShellCore {
            registry,
            state: DesktopState::default(),
            interaction: InteractionState::default(),
            snapshot: StateSnapshot::default(),
            viewport: Viewport::default(),
            top_overlay: None,
            prefs,
            external_opener: None,
        };
        for folder in core.persisted_folders() {
            core.register_folder_descriptor(&folder.id, &folder.name);
        }
        core.snapshot = StateSnapshot::compute(&core.state, &core.registry);
        Self {
            inner: Rc::new(RefCell::new(core)),
            bus,
        }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Registers the host callback that opens external links.
    pub fn set_external_opener(&self, opener: impl Fn(&str) + 'static) {
        self.inner.borrow_mut().external_opener = Some(Rc::new(opener));
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.inner.borrow_mut().viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.inner.borrow().viewport
    }

    /// Applies an action, then broadcasts `WindowStateChanged` if state
    /// actually changed. Notifications are published after the core borrow
    /// ends, so handlers may call back into the shell.
    pub fn dispatch(&self, action: ShellAction) {
        let (events, urls) = self.inner.borrow_mut().apply(action);
        for event in &events {
            self.bus.publish(event);
        }
        if urls.is_empty() {
            return;
        }
        let opener = self.inner.borrow().external_opener.clone();
        for url in urls {
            match &opener {
                Some(opener) => opener(&url),
                None => debug!(%url, "no external opener installed"),
            }
        }
    }

    pub fn open_or_focus(&self, app_id: AppId) {
        self.dispatch(ShellAction::OpenApp { app_id });
    }

    pub fn switch_workspace(&self, index: usize) {
        self.dispatch(ShellAction::SwitchWorkspace { index });
    }

    /// Toggles maximize using the shell's current viewport geometry.
    pub fn toggle_maximize(&self, window_id: WindowId) {
        let viewport = self.viewport();
        self.dispatch(ShellAction::ToggleMaximize {
            window_id,
            viewport,
        });
    }

    /// Cached derived views; recomputed only on mutation.
    pub fn snapshot(&self) -> StateSnapshot {
        self.inner.borrow().snapshot.clone()
    }

    pub fn active_workspace(&self) -> usize {
        self.inner.borrow().state.active_workspace
    }

    /// Chrome (taskbar/top bar) auto-hides while a visible window in the
    /// active workspace is maximized.
    pub fn chrome_visible(&self) -> bool {
        !self.inner.borrow().snapshot.any_maximized_visible
    }

    pub fn descriptors(&self) -> Vec<ApplicationDescriptor> {
        self.inner.borrow().registry.all().cloned().collect()
    }

    pub fn favourites(&self) -> Vec<ApplicationDescriptor> {
        self.inner.borrow().registry.favourites().cloned().collect()
    }

    pub fn top_overlay(&self) -> Option<Overlay> {
        self.inner.borrow().top_overlay
    }

    /// Opens or closes the all-applications grid; opening raises it above
    /// the activities overview.
    pub fn toggle_all_apps(&self) {
        self.toggle_overlay(Overlay::AllApps);
    }

    /// Opens or closes the activities/workspace overview; opening raises
    /// it above the all-applications grid.
    pub fn toggle_activities(&self) {
        self.toggle_overlay(Overlay::Activities);
    }

    fn toggle_overlay(&self, overlay: Overlay) {
        let mut core = self.inner.borrow_mut();
        core.top_overlay = if core.top_overlay == Some(overlay) {
            None
        } else {
            Some(overlay)
        };
    }

    pub fn close_overlays(&self) {
        self.inner.borrow_mut().top_overlay = None;
    }

    /// Validates, registers, and persists a synthetic folder descriptor,
    /// broadcasting the structured result and (on success) the refreshed
    /// snapshot.
    pub fn create_folder(&self, name: &str, correlation_id: u64) -> FolderCreationResult {
        let (result, events) = self.inner.borrow_mut().create_folder(name, correlation_id);
        for event in &events {
            self.bus.publish(event);
        }
        self.bus.publish(&ShellEvent::FolderCreationResult {
            result: result.clone(),
        });
        result
    }

    /// Attaches the shell to its bus command topics. Dropping the returned
    /// guards detaches it.
    #[must_use = "dropping the subscriptions disconnects the shell from the bus"]
    pub fn connect(&self) -> Vec<Subscription> {
        let launch = {
            let shell = self.clone();
            self.bus.subscribe(Topic::LaunchApp, move |event| {
                if let ShellEvent::LaunchApp { app_id } = event {
                    shell.open_or_focus(app_id.clone());
                }
            })
        };
        let focus = {
            let shell = self.clone();
            self.bus.subscribe(Topic::FocusWindow, move |event| {
                if let ShellEvent::FocusWindow { window_id } = event {
                    shell.dispatch(ShellAction::FocusWindow {
                        window_id: window_id.clone(),
                    });
                }
            })
        };
        let close = {
            let shell = self.clone();
            self.bus.subscribe(Topic::CloseWindow, move |event| {
                if let ShellEvent::CloseWindow { window_id } = event {
                    shell.dispatch(ShellAction::CloseWindow {
                        window_id: window_id.clone(),
                    });
                }
            })
        };
        let restore = {
            let shell = self.clone();
            self.bus.subscribe(Topic::RestoreMinimized, move |event| {
                if let ShellEvent::RestoreMinimized { app_id } = event {
                    shell.dispatch(ShellAction::RestoreMinimized {
                        app_id: app_id.clone(),
                    });
                }
            })
        };
        let create_folder = {
            let shell = self.clone();
            self.bus.subscribe(Topic::CreateFolder, move |event| {
                if let ShellEvent::CreateFolder {
                    name,
                    correlation_id,
                } = event
                {
                    shell.create_folder(name, *correlation_id);
                }
            })
        };
        vec![launch, focus, close, restore, create_folder]
    }
}

/// Normalized synthetic descriptor id for a folder name.
pub fn folder_id_from_name(name: &str) -> String {
    let slug = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    format!("new-folder-{slug}")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use platform_prefs::MemoryPrefs;

    fn registry() -> AppRegistry {
        AppRegistry::from_descriptors([
            ApplicationDescriptor::new("calculator", "Calc", "/icons/calc.svg").favourite(true),
            ApplicationDescriptor::new("terminal", "Terminal", "/icons/bash.svg").favourite(true),
        ])
    }

    fn shell_with_prefs(prefs: MemoryPrefs) -> DesktopShell {
        DesktopShell::new(registry(), EventBus::new(), Rc::new(prefs))
    }

    #[test]
    fn folder_id_normalizes_whitespace_and_case() {
        assert_eq!(folder_id_from_name("My  New Notes"), "new-folder-my-new-notes");
        assert_eq!(folder_id_from_name("Notes"), "new-folder-notes");
    }

    #[test]
    fn duplicate_folder_yields_error_and_single_descriptor() {
        let shell = shell_with_prefs(MemoryPrefs::new());

        let first = shell.create_folder("Notes", 1);
        assert!(first.is_success());
        assert_eq!(first.message, "Folder Created Successfully");

        let second = shell.create_folder("Notes", 2);
        assert_eq!(second.status, FolderCreationStatus::Error);
        assert_eq!(
            second.message,
            "mkdir: cannot create directory 'Notes': Folder exists"
        );
        assert_eq!(second.correlation_id, 2);

        let folder_id = AppId::from("new-folder-notes");
        let matching = shell
            .descriptors()
            .into_iter()
            .filter(|d| d.id == folder_id)
            .count();
        assert_eq!(matching, 1);
    }

    #[test]
    fn empty_folder_name_is_rejected() {
        let shell = shell_with_prefs(MemoryPrefs::new());
        let result = shell.create_folder("   ", 7);
        assert_eq!(result.status, FolderCreationStatus::Error);
        assert_eq!(result.message, "mkdir: missing operand");
    }

    #[test]
    fn persisted_folders_rehydrate_into_a_new_shell() {
        let prefs = MemoryPrefs::new();
        {
            let shell = shell_with_prefs(prefs.clone());
            shell.create_folder("Projects", 1);
        }

        let reborn = shell_with_prefs(prefs);
        let folder_id = AppId::from("new-folder-projects");
        let descriptor = reborn
            .descriptors()
            .into_iter()
            .find(|d| d.id == folder_id)
            .expect("persisted folder registered");
        assert_eq!(descriptor.title, "Projects");
        assert!(descriptor.disabled);
        assert!(descriptor.desktop_shortcut);

        // the closed map covers the rehydrated folder id
        assert!(reborn.snapshot().is_closed(&folder_id));
    }

    #[test]
    fn overlays_are_mutually_exclusive_on_top() {
        let shell = shell_with_prefs(MemoryPrefs::new());
        assert_eq!(shell.top_overlay(), None);

        shell.toggle_all_apps();
        assert_eq!(shell.top_overlay(), Some(Overlay::AllApps));

        shell.toggle_activities();
        assert_eq!(shell.top_overlay(), Some(Overlay::Activities));

        shell.toggle_activities();
        assert_eq!(shell.top_overlay(), None);
    }

    #[test]
    fn chrome_hides_while_a_visible_window_is_maximized() {
        let shell = shell_with_prefs(MemoryPrefs::new());
        shell.open_or_focus(AppId::from("calculator"));
        assert!(shell.chrome_visible());

        let window_id = shell.snapshot().windows[0].id.clone();
        shell.toggle_maximize(window_id.clone());
        assert!(!shell.chrome_visible());

        shell.dispatch(ShellAction::ToggleMinimize {
            window_id: window_id.clone(),
        });
        assert!(shell.chrome_visible());

        shell.dispatch(ShellAction::RestoreMinimized {
            app_id: AppId::from("calculator"),
        });
        shell.toggle_maximize(window_id);
        assert!(shell.chrome_visible());
    }

    #[test]
    fn external_opener_receives_url_instead_of_window() {
        use std::cell::RefCell;

        let shell = shell_with_prefs(MemoryPrefs::new());
        {
            let mut core = shell.inner.borrow_mut();
            core.registry.register(
                ApplicationDescriptor::new("github", "GitHub", "/icons/github.svg")
                    .external("https://github.com/example"),
            );
        }
        let opened: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        {
            let opened = opened.clone();
            shell.set_external_opener(move |url| opened.borrow_mut().push(url.to_string()));
        }

        shell.open_or_focus(AppId::from("github"));
        assert_eq!(*opened.borrow(), vec!["https://github.com/example".to_string()]);
        assert!(shell.snapshot().windows.is_empty());
    }
}
