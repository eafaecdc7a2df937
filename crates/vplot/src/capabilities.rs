//! Optional capabilities, detected once at startup.

use std::sync::OnceLock;

/// What this process can do beyond headless rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Compiled with the `gui` feature and a display is reachable
    pub gui: bool,
    /// Blocking save dialogs for the enriched figure
    pub file_dialogs: bool,
}

static DETECTED: OnceLock<Capabilities> = OnceLock::new();

impl Capabilities {
    /// Process-wide capabilities.
    pub fn detect() -> Capabilities {
        *DETECTED.get_or_init(|| {
            let gui = cfg!(feature = "gui") && display_available();
            let caps = Capabilities {
                gui,
                file_dialogs: gui,
            };
            tracing::debug!("Detected capabilities: {:?}", caps);
            caps
        })
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn display_available() -> bool {
    ["DISPLAY", "WAYLAND_DISPLAY"]
        .iter()
        .any(|var| std::env::var_os(var).is_some_and(|v| !v.is_empty()))
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn display_available() -> bool {
    true
}
