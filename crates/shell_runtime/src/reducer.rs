//! Shell actions and the transition engine applying them to the workspace
//! collection.

use tracing::{debug, warn};

use crate::model::{
    DesktopState, DragSession, InteractionState, PointerPosition, ResizeEdge, ResizeSession,
    Viewport, WindowId, WindowRecord, WindowRect,
};
use crate::registry::AppRegistry;
use crate::window_manager::{self, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH};
use shell_app_contract::AppId;

/// Actions accepted by [`reduce_shell`] to mutate [`DesktopState`].
#[derive(Debug, Clone, PartialEq)]
pub enum ShellAction {
    /// Launch an application, or focus its existing instance.
    OpenApp { app_id: AppId },
    /// Close a window wherever it lives.
    CloseWindow { window_id: WindowId },
    /// Focus (and raise) a window wherever it lives.
    FocusWindow { window_id: WindowId },
    /// Flip the minimize flag of a window in the active workspace.
    ToggleMinimize { window_id: WindowId },
    /// Un-minimize an application's instance wherever it lives.
    RestoreMinimized { app_id: AppId },
    /// Toggle maximize for a window in the active workspace.
    ToggleMaximize {
        window_id: WindowId,
        viewport: Viewport,
    },
    /// Reposition a window in the active workspace.
    MoveWindow { window_id: WindowId, x: i32, y: i32 },
    /// Resize a window in the active workspace.
    ResizeWindow { window_id: WindowId, w: i32, h: i32 },
    /// Change the active workspace.
    SwitchWorkspace { index: usize },
    /// Begin dragging a window.
    BeginMove {
        window_id: WindowId,
        pointer: PointerPosition,
    },
    /// Update an in-progress window drag.
    UpdateMove { pointer: PointerPosition },
    /// End the active window drag.
    EndMove,
    /// Begin resizing a window from an edge or corner.
    BeginResize {
        window_id: WindowId,
        edge: ResizeEdge,
        pointer: PointerPosition,
    },
    /// Update an in-progress window resize.
    UpdateResize { pointer: PointerPosition },
    /// End the active window resize.
    EndResize,
}

/// Side effects the composition layer executes after a reduction.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeEffect {
    /// Workspace state changed; recompute the snapshot and broadcast it.
    StateChanged,
    /// Launch short-circuited to an external link; no window was created.
    OpenExternalUrl(String),
}

/// Applies a [`ShellAction`] to the workspace collection.
///
/// Stale or unknown ids degrade to no-ops: a delayed command arriving
/// after its target closed must never take the shell down. The returned
/// effects tell the caller whether anything actually changed.
pub fn reduce_shell(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    registry: &AppRegistry,
    action: ShellAction,
) -> Vec<RuntimeEffect> {
    let mut effects = Vec::new();
    match action {
        ShellAction::OpenApp { app_id } => {
            open_app(state, registry, &app_id, &mut effects);
        }
        ShellAction::CloseWindow { window_id } => {
            if window_manager::close_window(state, &window_id) {
                effects.push(RuntimeEffect::StateChanged);
            }
        }
        ShellAction::FocusWindow { window_id } => {
            if window_manager::focus_window(state, &window_id) {
                effects.push(RuntimeEffect::StateChanged);
            }
        }
        ShellAction::ToggleMinimize { window_id } => {
            if window_manager::toggle_minimize(state, &window_id) {
                effects.push(RuntimeEffect::StateChanged);
            }
        }
        ShellAction::RestoreMinimized { app_id } => {
            if window_manager::restore_app(state, &app_id) {
                effects.push(RuntimeEffect::StateChanged);
            }
        }
        ShellAction::ToggleMaximize {
            window_id,
            viewport,
        } => {
            if window_manager::toggle_maximize(state, &window_id, viewport) {
                effects.push(RuntimeEffect::StateChanged);
            }
        }
        ShellAction::MoveWindow { window_id, x, y } => {
            if window_manager::move_window(state, &window_id, x, y) {
                effects.push(RuntimeEffect::StateChanged);
            }
        }
        ShellAction::ResizeWindow { window_id, w, h } => {
            if window_manager::resize_window(state, &window_id, w, h) {
                effects.push(RuntimeEffect::StateChanged);
            }
        }
        ShellAction::SwitchWorkspace { index } => {
            if window_manager::switch_workspace(state, index) {
                effects.push(RuntimeEffect::StateChanged);
            }
        }
        ShellAction::BeginMove { window_id, pointer } => {
            let Some(window) = state.active().window(&window_id) else {
                debug!(%window_id, "drag start on unknown window");
                return effects;
            };
            let rect_start = window.rect;
            if window_manager::focus_window(state, &window_id) {
                effects.push(RuntimeEffect::StateChanged);
            }
            interaction.dragging = Some(DragSession {
                window_id,
                pointer_start: pointer,
                rect_start,
            });
        }
        ShellAction::UpdateMove { pointer } => {
            if let Some(session) = interaction.dragging.clone() {
                let dx = pointer.x - session.pointer_start.x;
                let dy = pointer.y - session.pointer_start.y;
                if let Some(window) = state.active_mut().window_mut(&session.window_id) {
                    if !window.maximized {
                        window.rect = session.rect_start.offset(dx, dy);
                        effects.push(RuntimeEffect::StateChanged);
                    }
                }
            }
        }
        ShellAction::EndMove => {
            interaction.dragging = None;
        }
        ShellAction::BeginResize {
            window_id,
            edge,
            pointer,
        } => {
            let Some(window) = state.active().window(&window_id) else {
                debug!(%window_id, "resize start on unknown window");
                return effects;
            };
            let rect_start = window.rect;
            if window_manager::focus_window(state, &window_id) {
                effects.push(RuntimeEffect::StateChanged);
            }
            interaction.resizing = Some(ResizeSession {
                window_id,
                edge,
                pointer_start: pointer,
                rect_start,
            });
        }
        ShellAction::UpdateResize { pointer } => {
            if let Some(session) = interaction.resizing.clone() {
                let dx = pointer.x - session.pointer_start.x;
                let dy = pointer.y - session.pointer_start.y;
                if let Some(window) = state.active_mut().window_mut(&session.window_id) {
                    if !window.maximized {
                        window.rect =
                            window_manager::resize_rect(session.rect_start, session.edge, dx, dy)
                                .clamped_min(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT);
                        effects.push(RuntimeEffect::StateChanged);
                    }
                }
            }
        }
        ShellAction::EndResize => {
            interaction.resizing = None;
        }
    }
    effects
}

/// Launch path: focus the singleton instance if one exists anywhere,
/// short-circuit external links, otherwise create a fresh window in the
/// active workspace.
fn open_app(
    state: &mut DesktopState,
    registry: &AppRegistry,
    app_id: &AppId,
    effects: &mut Vec<RuntimeEffect>,
) {
    if let Some(ws_index) = state.workspace_of_app(app_id) {
        let mut changed = false;
        if ws_index != state.active_workspace {
            changed |= window_manager::switch_workspace(state, ws_index);
        }
        changed |= window_manager::restore_app(state, app_id);
        let window_id = state.workspaces[ws_index]
            .windows
            .iter()
            .find(|w| &w.app_id == app_id)
            .map(|w| w.id.clone());
        if let Some(window_id) = window_id {
            changed |= window_manager::focus_window(state, &window_id);
        }
        if changed {
            effects.push(RuntimeEffect::StateChanged);
        }
        return;
    }

    let Some(descriptor) = registry.lookup(app_id) else {
        // Unregistered id is a static-configuration bug, never surfaced to
        // the user.
        warn!(%app_id, "launch requested for unregistered app");
        return;
    };

    if descriptor.is_external {
        match &descriptor.url {
            Some(url) => effects.push(RuntimeEffect::OpenExternalUrl(url.clone())),
            None => warn!(%app_id, "external app has no url"),
        }
        return;
    }

    let serial = state.take_instance_serial();
    let z_order = state.take_z_order();
    let record = WindowRecord {
        id: WindowId::derive(app_id, serial),
        app_id: app_id.clone(),
        title: descriptor.title.clone(),
        icon: descriptor.icon.clone(),
        rect: WindowRect::default(),
        restore_rect: None,
        z_order,
        is_focused: true,
        minimized: false,
        maximized: false,
        renderer: descriptor.renderer.clone(),
    };
    for window in &mut state.active_mut().windows {
        window.is_focused = false;
    }
    state.active_mut().windows.push(record);
    effects.push(RuntimeEffect::StateChanged);
}
