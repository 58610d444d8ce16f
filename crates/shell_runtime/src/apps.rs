//! Static default application table the site layer registers at startup.
//!
//! Content renderers are attached by the applications themselves when the
//! presentation layer boots; the entries here carry only id, display
//! metadata, and shortcut placement.

use shell_app_contract::ApplicationDescriptor;

pub fn default_descriptors() -> Vec<ApplicationDescriptor> {
    vec![
        ApplicationDescriptor::new("about", "About", "/system/user-home.png")
            .favourite(true)
            .desktop_shortcut(true),
        ApplicationDescriptor::new("browser", "Browser", "/icons/chrome.svg")
            .favourite(true)
            .desktop_shortcut(true),
        ApplicationDescriptor::new("calculator", "Calculator", "/icons/calc.svg").favourite(true),
        ApplicationDescriptor::new("terminal", "Terminal", "/icons/bash.svg").favourite(true),
        ApplicationDescriptor::new("settings", "Settings", "/icons/settings.svg").favourite(true),
        ApplicationDescriptor::new("calendar", "Calendar", "/icons/calendar.svg"),
        ApplicationDescriptor::new("contact", "Contact Me", "/icons/contact.svg")
            .desktop_shortcut(true),
        ApplicationDescriptor::new("trash", "Trash", "/system/user-trash-full.png")
            .desktop_shortcut(true),
        ApplicationDescriptor::new("github", "GitHub", "/icons/github.svg")
            .favourite(true)
            .external("https://github.com"),
    ]
}
