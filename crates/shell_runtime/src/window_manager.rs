//! Window-manager transition helpers used by the shell reducer.
//!
//! Every helper is a defensive no-op on a stale or foreign id and reports
//! whether it changed state, so the reducer can decide when to broadcast a
//! fresh snapshot.

use tracing::debug;

use crate::model::{DesktopState, ResizeEdge, Viewport, WindowId, WindowRect};
use shell_app_contract::AppId;

/// Minimum window size enforced by the interactive resize affordance.
/// The `ResizeWindow` operation itself applies sizes unconditionally.
pub const MIN_WINDOW_WIDTH: i32 = 400;
pub const MIN_WINDOW_HEIGHT: i32 = 300;

/// Focuses `window_id` in whichever workspace owns it and bumps it to the
/// top of that workspace's stacking order. Siblings in the same workspace
/// are defocused; other workspaces keep their own focused window.
///
/// Re-focusing the already-focused window is a no-op and does not consume
/// a z-order value, keeping stacking deterministic under repeated clicks.
pub fn focus_window(state: &mut DesktopState, window_id: &WindowId) -> bool {
    let Some(ws_index) = state.workspace_of(window_id) else {
        debug!(%window_id, "focus target not found");
        return false;
    };

    let already_focused = state.workspaces[ws_index]
        .window(window_id)
        .map(|w| w.is_focused)
        .unwrap_or(false);
    if already_focused {
        return false;
    }

    let z = state.take_z_order();
    for window in &mut state.workspaces[ws_index].windows {
        if &window.id == window_id {
            window.is_focused = true;
            window.z_order = z;
        } else {
            window.is_focused = false;
        }
    }
    true
}

/// Removes `window_id` from whichever workspace owns it.
///
/// No re-focus rule is applied here: surviving windows keep their focus
/// flags, and focus-on-close is left to the presentation layer.
pub fn close_window(state: &mut DesktopState, window_id: &WindowId) -> bool {
    let Some(ws_index) = state.workspace_of(window_id) else {
        debug!(%window_id, "close target not found");
        return false;
    };

    state.workspaces[ws_index]
        .windows
        .retain(|w| &w.id != window_id);
    true
}

/// Flips the minimize flag of `window_id`, scoped to the active workspace.
/// The maximize flag is left untouched so a later restore keeps the
/// window's maximize state.
pub fn toggle_minimize(state: &mut DesktopState, window_id: &WindowId) -> bool {
    let Some(window) = state.active_mut().window_mut(window_id) else {
        debug!(%window_id, "minimize target not in active workspace");
        return false;
    };
    window.minimized = !window.minimized;
    true
}

/// Clears the minimize flag of the (singleton) instance of `app_id`,
/// searched across all workspaces.
pub fn restore_app(state: &mut DesktopState, app_id: &AppId) -> bool {
    let Some(ws_index) = state.workspace_of_app(app_id) else {
        debug!(%app_id, "restore target not found");
        return false;
    };

    let Some(window) = state.workspaces[ws_index]
        .windows
        .iter_mut()
        .find(|w| &w.app_id == app_id)
    else {
        return false;
    };
    if !window.minimized {
        return false;
    }
    window.minimized = false;
    true
}

/// Toggles the maximize state of `window_id`, scoped to the active
/// workspace.
///
/// On maximize the current rect is stashed (only if no stash exists, so a
/// maximize while already stashed cannot lose the original geometry) and
/// the window fills the viewport below the chrome bar. On restore the
/// stash is written back, falling back to the default placement when no
/// stash was recorded, and cleared.
pub fn toggle_maximize(state: &mut DesktopState, window_id: &WindowId, viewport: Viewport) -> bool {
    let Some(window) = state.active_mut().window_mut(window_id) else {
        debug!(%window_id, "maximize target not in active workspace");
        return false;
    };

    if window.maximized {
        window.rect = window.restore_rect.take().unwrap_or_default();
        window.maximized = false;
    } else {
        if window.restore_rect.is_none() {
            window.restore_rect = Some(window.rect);
        }
        window.rect = viewport.maximized_rect();
        window.maximized = true;
    }
    true
}

/// Moves `window_id` to `position`, scoped to the active workspace. No
/// bounds validation; the interactive layer constrains what it feeds in.
pub fn move_window(state: &mut DesktopState, window_id: &WindowId, x: i32, y: i32) -> bool {
    let Some(window) = state.active_mut().window_mut(window_id) else {
        debug!(%window_id, "move target not in active workspace");
        return false;
    };
    window.rect.x = x;
    window.rect.y = y;
    true
}

/// Resizes `window_id`, scoped to the active workspace. Applied
/// unconditionally; the interactive affordance enforces the minimum floor.
pub fn resize_window(state: &mut DesktopState, window_id: &WindowId, w: i32, h: i32) -> bool {
    let Some(window) = state.active_mut().window_mut(window_id) else {
        debug!(%window_id, "resize target not in active workspace");
        return false;
    };
    window.rect.w = w;
    window.rect.h = h;
    true
}

/// Changes the active workspace; never mutates any window.
pub fn switch_workspace(state: &mut DesktopState, index: usize) -> bool {
    if index >= state.workspaces.len() {
        debug!(index, "workspace index out of range");
        return false;
    }
    if index == state.active_workspace {
        return false;
    }
    state.active_workspace = index;
    true
}

/// Applies resize deltas for a given edge/corner drag.
pub fn resize_rect(start: WindowRect, edge: ResizeEdge, dx: i32, dy: i32) -> WindowRect {
    match edge {
        ResizeEdge::East => WindowRect {
            w: start.w + dx,
            ..start
        },
        ResizeEdge::West => WindowRect {
            x: start.x + dx,
            w: start.w - dx,
            ..start
        },
        ResizeEdge::South => WindowRect {
            h: start.h + dy,
            ..start
        },
        ResizeEdge::North => WindowRect {
            y: start.y + dy,
            h: start.h - dy,
            ..start
        },
        ResizeEdge::NorthEast => WindowRect {
            y: start.y + dy,
            h: start.h - dy,
            w: start.w + dx,
            ..start
        },
        ResizeEdge::NorthWest => WindowRect {
            x: start.x + dx,
            y: start.y + dy,
            w: start.w - dx,
            h: start.h - dy,
        },
        ResizeEdge::SouthEast => WindowRect {
            w: start.w + dx,
            h: start.h + dy,
            ..start
        },
        ResizeEdge::SouthWest => WindowRect {
            x: start.x + dx,
            w: start.w - dx,
            h: start.h + dy,
            ..start
        },
    }
}
