//! Derived read-only views of the workspace collection.
//!
//! The snapshot is recomputed once per mutating window-manager operation
//! and cached by the shell until the next mutation, so taskbar, overview,
//! and other consumers never rescan the workspaces themselves.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shell_app_contract::AppId;

use crate::model::{DesktopState, WindowId, WindowRect};
use crate::registry::AppRegistry;

/// Flattened, renderer-free description of one open window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSummary {
    pub id: WindowId,
    pub app_id: AppId,
    pub title: String,
    pub icon: String,
    pub workspace: usize,
    pub rect: WindowRect,
    pub z_order: u32,
    pub is_focused: bool,
    pub minimized: bool,
    pub maximized: bool,
}

/// Aggregate window state broadcast to taskbar and overview consumers.
///
/// The per-app maps cover every registered application id. A closed app
/// reports `focused = false` and `minimized = true`, the defaults taskbar
/// rendering expects for an app without a live instance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub active_workspace: usize,
    pub windows: Vec<WindowSummary>,
    pub closed: BTreeMap<AppId, bool>,
    pub focused: BTreeMap<AppId, bool>,
    pub minimized: BTreeMap<AppId, bool>,
    pub open_elsewhere: BTreeMap<AppId, bool>,
    pub any_maximized_visible: bool,
}

impl StateSnapshot {
    pub fn compute(state: &DesktopState, registry: &AppRegistry) -> Self {
        let windows: Vec<WindowSummary> = state
            .all_windows()
            .map(|(workspace, w)| WindowSummary {
                id: w.id.clone(),
                app_id: w.app_id.clone(),
                title: w.title.clone(),
                icon: w.icon.clone(),
                workspace,
                rect: w.rect,
                z_order: w.z_order,
                is_focused: w.is_focused,
                minimized: w.minimized,
                maximized: w.maximized,
            })
            .collect();

        let mut closed = BTreeMap::new();
        let mut focused = BTreeMap::new();
        let mut minimized = BTreeMap::new();
        let mut open_elsewhere = BTreeMap::new();
        for app_id in registry.ids() {
            let instance = windows.iter().find(|w| &w.app_id == app_id);
            closed.insert(app_id.clone(), instance.is_none());
            focused.insert(app_id.clone(), instance.map(|w| w.is_focused).unwrap_or(false));
            minimized.insert(app_id.clone(), instance.map(|w| w.minimized).unwrap_or(true));
            open_elsewhere.insert(
                app_id.clone(),
                instance
                    .map(|w| w.workspace != state.active_workspace)
                    .unwrap_or(false),
            );
        }

        let any_maximized_visible = state
            .active()
            .windows
            .iter()
            .any(|w| w.maximized && !w.minimized);

        Self {
            active_workspace: state.active_workspace,
            windows,
            closed,
            focused,
            minimized,
            open_elsewhere,
            any_maximized_visible,
        }
    }

    pub fn is_closed(&self, app_id: &AppId) -> bool {
        self.closed.get(app_id).copied().unwrap_or(true)
    }

    pub fn is_focused(&self, app_id: &AppId) -> bool {
        self.focused.get(app_id).copied().unwrap_or(false)
    }

    pub fn is_minimized(&self, app_id: &AppId) -> bool {
        self.minimized.get(app_id).copied().unwrap_or(true)
    }

    pub fn is_open_elsewhere(&self, app_id: &AppId) -> bool {
        self.open_elsewhere.get(app_id).copied().unwrap_or(false)
    }

    /// Windows of one workspace for the activities overview, in creation
    /// order.
    pub fn windows_in_workspace(&self, workspace: usize) -> impl Iterator<Item = &WindowSummary> {
        self.windows.iter().filter(move |w| w.workspace == workspace)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::WindowRecord;
    use shell_app_contract::ApplicationDescriptor;

    fn registry() -> AppRegistry {
        AppRegistry::from_descriptors([
            ApplicationDescriptor::new("calculator", "Calc", "/icons/calc.svg"),
            ApplicationDescriptor::new("terminal", "Terminal", "/icons/bash.svg"),
        ])
    }

    fn window(app: &str, serial: u64) -> WindowRecord {
        let app_id = AppId::from(app);
        WindowRecord {
            id: WindowId::derive(&app_id, serial),
            app_id,
            title: app.to_string(),
            icon: format!("/icons/{app}.svg"),
            rect: WindowRect::default(),
            restore_rect: None,
            z_order: 2,
            is_focused: true,
            minimized: false,
            maximized: false,
            renderer: None,
        }
    }

    #[test]
    fn closed_app_reports_taskbar_defaults() {
        let state = DesktopState::default();
        let snapshot = StateSnapshot::compute(&state, &registry());

        let terminal = AppId::from("terminal");
        assert!(snapshot.is_closed(&terminal));
        assert!(!snapshot.is_focused(&terminal));
        assert!(snapshot.is_minimized(&terminal));
        assert!(!snapshot.is_open_elsewhere(&terminal));
    }

    #[test]
    fn open_elsewhere_tracks_non_active_workspaces() {
        let mut state = DesktopState::default();
        state.workspaces[0].windows.push(window("calculator", 1));
        state.workspaces[1].windows.push(window("terminal", 2));
        state.active_workspace = 1;

        let snapshot = StateSnapshot::compute(&state, &registry());
        assert!(snapshot.is_open_elsewhere(&AppId::from("calculator")));
        assert!(!snapshot.is_open_elsewhere(&AppId::from("terminal")));
        assert_eq!(snapshot.windows.len(), 2);
        assert_eq!(snapshot.windows_in_workspace(1).count(), 1);
    }

    #[test]
    fn maximized_visibility_ignores_other_workspaces_and_minimized() {
        let mut state = DesktopState::default();
        let mut maximized_elsewhere = window("calculator", 1);
        maximized_elsewhere.maximized = true;
        state.workspaces[2].windows.push(maximized_elsewhere);

        let mut minimized_here = window("terminal", 2);
        minimized_here.maximized = true;
        minimized_here.minimized = true;
        state.workspaces[0].windows.push(minimized_here);

        let snapshot = StateSnapshot::compute(&state, &registry());
        assert!(!snapshot.any_maximized_visible);

        state.workspaces[0].windows[0].minimized = false;
        let snapshot = StateSnapshot::compute(&state, &registry());
        assert!(snapshot.any_maximized_visible);
    }
}
