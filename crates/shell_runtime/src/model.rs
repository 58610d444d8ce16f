//! Window entity model and workspace collection owned by the window manager.

use serde::{Deserialize, Serialize};
use shell_app_contract::{AppId, ContentFactory};

/// Number of virtual workspaces; fixed at startup, never resized.
pub const WORKSPACE_COUNT: usize = 4;

/// Default placement for a freshly opened window.
pub const DEFAULT_WINDOW_X: i32 = 120;
pub const DEFAULT_WINDOW_Y: i32 = 80;
pub const DEFAULT_WINDOW_WIDTH: i32 = 900;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 600;

/// Unique identifier of one running window instance.
///
/// Derived from the owning application id plus a monotonically increasing
/// creation serial, so an id is never reused even after its window closes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub String);

impl WindowId {
    pub fn derive(app_id: &AppId, serial: u64) -> Self {
        Self(format!("{}-{serial}", app_id.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl WindowRect {
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    pub fn clamped_min(self, min_w: i32, min_h: i32) -> Self {
        Self {
            w: self.w.max(min_w),
            h: self.h.max(min_h),
            ..self
        }
    }
}

impl Default for WindowRect {
    fn default() -> Self {
        Self {
            x: DEFAULT_WINDOW_X,
            y: DEFAULT_WINDOW_Y,
            w: DEFAULT_WINDOW_WIDTH,
            h: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

/// Desktop viewport geometry used to size maximized windows.
///
/// `chrome_height` is the height of the shell's own top bar; a maximized
/// window starts below it and fills the remaining area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
    pub chrome_height: i32,
}

impl Viewport {
    /// Rect a maximized window occupies within this viewport.
    pub fn maximized_rect(self) -> WindowRect {
        WindowRect {
            x: 0,
            y: self.chrome_height,
            w: self.width,
            h: self.height - self.chrome_height,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            chrome_height: 32,
        }
    }
}

/// One running, on-screen occurrence of an application.
///
/// `title` and `icon` are display-time snapshots of the descriptor, so a
/// later descriptor change never retroactively renames a running window.
/// `restore_rect` exists only between a maximize and its matching restore.
#[derive(Clone, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub app_id: AppId,
    pub title: String,
    pub icon: String,
    pub rect: WindowRect,
    pub restore_rect: Option<WindowRect>,
    pub z_order: u32,
    pub is_focused: bool,
    pub minimized: bool,
    pub maximized: bool,
    #[serde(skip)]
    pub renderer: Option<ContentFactory>,
}

impl std::fmt::Debug for WindowRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowRecord")
            .field("id", &self.id)
            .field("app_id", &self.app_id)
            .field("title", &self.title)
            .field("rect", &self.rect)
            .field("restore_rect", &self.restore_rect)
            .field("z_order", &self.z_order)
            .field("is_focused", &self.is_focused)
            .field("minimized", &self.minimized)
            .field("maximized", &self.maximized)
            .finish()
    }
}

impl PartialEq for WindowRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.app_id == other.app_id
            && self.title == other.title
            && self.icon == other.icon
            && self.rect == other.rect
            && self.restore_rect == other.restore_rect
            && self.z_order == other.z_order
            && self.is_focused == other.is_focused
            && self.minimized == other.minimized
            && self.maximized == other.maximized
    }
}

/// Ordered collection of windows in one virtual workspace.
///
/// Ordering is creation order; stacking is carried by each record's
/// `z_order`, not by position in this list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Workspace {
    pub windows: Vec<WindowRecord>,
}

impl Workspace {
    pub fn window(&self, window_id: &WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| &w.id == window_id)
    }

    pub fn window_mut(&mut self, window_id: &WindowId) -> Option<&mut WindowRecord> {
        self.windows.iter_mut().find(|w| &w.id == window_id)
    }
}

/// The workspace collection and counters exclusively owned by the window
/// manager. Everything else sees read-only derived snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesktopState {
    pub workspaces: Vec<Workspace>,
    pub active_workspace: usize,
    pub next_z_order: u32,
    pub next_instance_serial: u64,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self {
            workspaces: vec![Workspace::default(); WORKSPACE_COUNT],
            active_workspace: 0,
            next_z_order: 2,
            next_instance_serial: 1,
        }
    }
}

impl DesktopState {
    pub fn active(&self) -> &Workspace {
        &self.workspaces[self.active_workspace]
    }

    pub fn active_mut(&mut self) -> &mut Workspace {
        let index = self.active_workspace;
        &mut self.workspaces[index]
    }

    /// Workspace index holding `window_id`, searched across all workspaces.
    pub fn workspace_of(&self, window_id: &WindowId) -> Option<usize> {
        self.workspaces
            .iter()
            .position(|ws| ws.window(window_id).is_some())
    }

    /// Workspace index holding the (singleton) instance of `app_id`.
    pub fn workspace_of_app(&self, app_id: &AppId) -> Option<usize> {
        self.workspaces
            .iter()
            .position(|ws| ws.windows.iter().any(|w| &w.app_id == app_id))
    }

    pub fn all_windows(&self) -> impl Iterator<Item = (usize, &WindowRecord)> {
        self.workspaces
            .iter()
            .enumerate()
            .flat_map(|(index, ws)| ws.windows.iter().map(move |w| (index, w)))
    }

    pub fn take_z_order(&mut self) -> u32 {
        let z = self.next_z_order;
        self.next_z_order = self.next_z_order.saturating_add(1);
        z
    }

    pub fn take_instance_serial(&mut self) -> u64 {
        let serial = self.next_instance_serial;
        self.next_instance_serial = self.next_instance_serial.saturating_add(1);
        serial
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub window_id: WindowId,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeSession {
    pub window_id: WindowId,
    pub edge: ResizeEdge,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

/// Transient pointer-interaction state for the active drag or resize.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InteractionState {
    pub dragging: Option<DragSession>,
    pub resizing: Option<ResizeSession>,
}
