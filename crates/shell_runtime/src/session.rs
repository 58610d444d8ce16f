//! Session settings persisted by shell collaborators: boot/lock/shut-down
//! flags and the last-used wallpaper.
//!
//! These are plain key-value pairs; the window-manager core never reads or
//! writes them.

use std::rc::Rc;

use platform_prefs::{PrefsError, PrefsStore};

pub const WALLPAPER_KEY: &str = "backgroundImage";
pub const LOCK_KEY: &str = "screen-locked";
pub const SHUTDOWN_KEY: &str = "shut-down";
pub const BOOT_SEEN_KEY: &str = "booting_screen";

pub const DEFAULT_WALLPAPER: &str = "wall-14";

#[derive(Clone)]
pub struct SessionSettings {
    prefs: Rc<dyn PrefsStore>,
}

impl SessionSettings {
    pub fn new(prefs: Rc<dyn PrefsStore>) -> Self {
        Self { prefs }
    }

    pub fn wallpaper(&self) -> Result<String, PrefsError> {
        Ok(self
            .prefs
            .get(WALLPAPER_KEY)?
            .unwrap_or_else(|| DEFAULT_WALLPAPER.to_string()))
    }

    pub fn set_wallpaper(&self, name: &str) -> Result<(), PrefsError> {
        self.prefs.set(WALLPAPER_KEY, name)
    }

    pub fn is_locked(&self) -> Result<bool, PrefsError> {
        self.flag(LOCK_KEY)
    }

    pub fn set_locked(&self, locked: bool) -> Result<(), PrefsError> {
        self.set_flag(LOCK_KEY, locked)
    }

    pub fn is_shut_down(&self) -> Result<bool, PrefsError> {
        self.flag(SHUTDOWN_KEY)
    }

    pub fn set_shut_down(&self, shut_down: bool) -> Result<(), PrefsError> {
        self.set_flag(SHUTDOWN_KEY, shut_down)
    }

    /// The boot animation plays only on the first visit of a session.
    pub fn boot_screen_seen(&self) -> Result<bool, PrefsError> {
        Ok(self.prefs.get(BOOT_SEEN_KEY)?.is_some())
    }

    pub fn mark_boot_screen_seen(&self) -> Result<(), PrefsError> {
        self.prefs.set(BOOT_SEEN_KEY, "false")
    }

    fn flag(&self, key: &str) -> Result<bool, PrefsError> {
        Ok(self.prefs.get(key)?.as_deref() == Some("true"))
    }

    fn set_flag(&self, key: &str, value: bool) -> Result<(), PrefsError> {
        self.prefs.set(key, if value { "true" } else { "false" })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use platform_prefs::MemoryPrefs;

    fn settings() -> SessionSettings {
        SessionSettings::new(Rc::new(MemoryPrefs::new()))
    }

    #[test]
    fn wallpaper_defaults_until_set() {
        let session = settings();
        assert_eq!(session.wallpaper().unwrap(), DEFAULT_WALLPAPER);

        session.set_wallpaper("wall-2").unwrap();
        assert_eq!(session.wallpaper().unwrap(), "wall-2");
    }

    #[test]
    fn lock_flag_round_trips() {
        let session = settings();
        assert!(!session.is_locked().unwrap());
        session.set_locked(true).unwrap();
        assert!(session.is_locked().unwrap());
        session.set_locked(false).unwrap();
        assert!(!session.is_locked().unwrap());
    }

    #[test]
    fn boot_screen_plays_once_per_session_store() {
        let session = settings();
        assert!(!session.boot_screen_seen().unwrap());
        session.mark_boot_screen_seen().unwrap();
        assert!(session.boot_screen_seen().unwrap());
    }
}
