//! Contract types shared between the shell runtime and the applications it
//! hosts.
//!
//! Applications register an [`ApplicationDescriptor`] into the shell's
//! registry at startup and otherwise interact with the shell only through
//! its event protocol. The shell stores the descriptor's renderer as an
//! opaque capability and invokes it without inspecting the produced
//! content.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Stable application identifier (for example `"calculator"`).
///
/// Synthetic descriptors created at runtime (folders) derive their id from
/// the user-supplied name, so ids are open strings rather than a closed
/// enum.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppId(pub String);

impl AppId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AppId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Opaque content handle produced by an application renderer.
///
/// The shell never looks inside; presentation layers downcast to whatever
/// concrete content type they agreed on with the application.
#[derive(Clone)]
pub struct ContentHandle(Rc<dyn Any>);

impl ContentHandle {
    pub fn new<T: 'static>(content: T) -> Self {
        Self(Rc::new(content))
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl fmt::Debug for ContentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ContentHandle")
    }
}

/// Capability-typed factory for an application's window content.
pub type ContentFactory = Rc<dyn Fn() -> ContentHandle>;

/// Immutable metadata for one selectable application.
///
/// Created once at process start from static configuration; the only
/// runtime additions are synthetic folder descriptors, which carry no
/// renderer and are marked `disabled`.
#[derive(Clone)]
pub struct ApplicationDescriptor {
    pub id: AppId,
    pub title: String,
    pub icon: String,
    pub favourite: bool,
    pub desktop_shortcut: bool,
    pub disabled: bool,
    pub is_external: bool,
    pub url: Option<String>,
    pub renderer: Option<ContentFactory>,
}

impl ApplicationDescriptor {
    pub fn new(id: impl Into<AppId>, title: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            icon: icon.into(),
            favourite: false,
            desktop_shortcut: false,
            disabled: false,
            is_external: false,
            url: None,
            renderer: None,
        }
    }

    pub fn favourite(mut self, favourite: bool) -> Self {
        self.favourite = favourite;
        self
    }

    pub fn desktop_shortcut(mut self, desktop_shortcut: bool) -> Self {
        self.desktop_shortcut = desktop_shortcut;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Marks the descriptor as an external link; launching it opens the
    /// URL instead of creating a window.
    pub fn external(mut self, url: impl Into<String>) -> Self {
        self.is_external = true;
        self.url = Some(url.into());
        self
    }

    pub fn renderer(mut self, renderer: ContentFactory) -> Self {
        self.renderer = Some(renderer);
        self
    }
}

impl fmt::Debug for ApplicationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationDescriptor")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("icon", &self.icon)
            .field("favourite", &self.favourite)
            .field("desktop_shortcut", &self.desktop_shortcut)
            .field("disabled", &self.disabled)
            .field("is_external", &self.is_external)
            .field("url", &self.url)
            .field("has_renderer", &self.renderer.is_some())
            .finish()
    }
}

impl PartialEq for ApplicationDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.title == other.title
            && self.icon == other.icon
            && self.favourite == other.favourite
            && self.desktop_shortcut == other.desktop_shortcut
            && self.disabled == other.disabled
            && self.is_external == other.is_external
            && self.url == other.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_builder_sets_flags() {
        let descriptor = ApplicationDescriptor::new("github", "GitHub", "/icons/github.svg")
            .favourite(true)
            .external("https://github.com");

        assert!(descriptor.favourite);
        assert!(descriptor.is_external);
        assert_eq!(descriptor.url.as_deref(), Some("https://github.com"));
        assert!(descriptor.renderer.is_none());
    }

    #[test]
    fn content_handle_downcasts_to_registered_type() {
        let factory: ContentFactory = Rc::new(|| ContentHandle::new("hello".to_string()));
        let handle = factory();
        assert_eq!(handle.downcast_ref::<String>().map(String::as_str), Some("hello"));
        assert!(handle.downcast_ref::<u32>().is_none());
    }
}
