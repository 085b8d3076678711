//! TodoDriver - Abstract Browser Interaction Trait
//!
//! The scenario runner only talks to this trait, so the same scenarios run
//! against a real Chromium page (`browser` feature) or the in-process
//! [`MemoryDriver`](crate::memory::MemoryDriver).
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │  ScenarioRunner                                        │
//! │        │                                               │
//! │        ▼                                               │
//! │  TodoDriver (trait)                                    │
//! │   ├── ChromiumDriver  CDP via chromiumoxide            │
//! │   └── MemoryDriver    in-process TodoMVC + mini DOM    │
//! └────────────────────────────────────────────────────────┘
//! ```

use crate::locator::Locator;
use crate::result::E2eResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Snapshot of one element's observable state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementState {
    /// Lower-case tag name
    pub tag: String,
    /// Text content (descendant text concatenated)
    pub text: String,
    /// Current value for form fields
    pub value: Option<String>,
    /// Class list
    pub classes: Vec<String>,
    /// Checked state for checkboxes
    pub checked: Option<bool>,
    /// Whether the element is rendered visibly
    pub visible: bool,
}

impl ElementState {
    /// Create a new element state
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            visible: true,
            ..Self::default()
        }
    }

    /// Check for a class
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Checked state, treating non-checkboxes as unchecked
    #[must_use]
    pub fn is_checked(&self) -> bool {
        self.checked.unwrap_or(false)
    }
}

/// Result of resolving a locator: match count plus the first match
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Number of matching elements
    pub count: usize,
    /// State of the first match
    pub first: Option<ElementState>,
}

impl Observation {
    /// Observation with no matches
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Observation of a single element
    #[must_use]
    pub fn single(state: ElementState) -> Self {
        Self {
            count: 1,
            first: Some(state),
        }
    }

    /// Whether anything matched
    #[must_use]
    pub const fn exists(&self) -> bool {
        self.count > 0
    }
}

/// Keys a scenario can press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Confirm
    Enter,
    /// Cancel
    Escape,
    /// Move focus
    Tab,
    /// Delete backwards
    Backspace,
}

impl Key {
    /// DOM `KeyboardEvent.key` name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Enter => "Enter",
            Self::Escape => "Escape",
            Self::Tab => "Tab",
            Self::Backspace => "Backspace",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.name().to_lowercase())
    }
}

/// Browser configuration for drivers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriverConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
    /// Timeout for navigation
    #[serde(rename = "navigation_timeout_ms", with = "crate::config::millis")]
    pub navigation_timeout: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 800,
            chromium_path: None,
            sandbox: true,
            navigation_timeout: Duration::from_secs(30),
        }
    }
}

impl DriverConfig {
    /// Create new config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set headless mode
    #[must_use]
    pub const fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

/// Abstract driver trait for browser interaction
///
/// Actions take a locator and act on its first match; the runner is
/// responsible for waiting until the target exists and for strictness.
#[async_trait]
pub trait TodoDriver: Send {
    /// Short name used in logs and reports
    fn name(&self) -> &'static str;

    /// Navigate to URL and start from a fresh application state
    ///
    /// Anything the app persisted for the origin on an earlier visit
    /// (local or session storage) must not survive the call.
    async fn navigate(&mut self, url: &str) -> E2eResult<()>;

    /// Reload the current page
    async fn reload(&mut self) -> E2eResult<()>;

    /// Resolve a locator and snapshot its first match
    async fn observe(&mut self, locator: &Locator) -> E2eResult<Observation>;

    /// Type text into the element, focusing it first
    async fn type_text(&mut self, locator: &Locator, text: &str) -> E2eResult<()>;

    /// Press a key with the element focused
    async fn press_key(&mut self, locator: &Locator, key: Key) -> E2eResult<()>;

    /// Click the element
    async fn click(&mut self, locator: &Locator) -> E2eResult<()>;

    /// Double-click the element
    async fn double_click(&mut self, locator: &Locator) -> E2eResult<()>;

    /// Clear a text field
    async fn clear(&mut self, locator: &Locator) -> E2eResult<()>;

    /// Remove focus from whatever element has it
    async fn blur_active(&mut self) -> E2eResult<()>;

    /// Close the browser
    async fn close(&mut self) -> E2eResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    mod element_state_tests {
        use super::*;

        #[test]
        fn test_new_is_visible() {
            let el = ElementState::new("li");
            assert_eq!(el.tag, "li");
            assert!(el.visible);
            assert!(el.classes.is_empty());
        }

        #[test]
        fn test_has_class() {
            let mut el = ElementState::new("li");
            el.classes = vec!["completed".to_string(), "editing".to_string()];
            assert!(el.has_class("completed"));
            assert!(!el.has_class("complete"));
        }

        #[test]
        fn test_is_checked_defaults_false() {
            let mut el = ElementState::new("input");
            assert!(!el.is_checked());
            el.checked = Some(true);
            assert!(el.is_checked());
        }
    }

    mod observation_tests {
        use super::*;

        #[test]
        fn test_empty() {
            let obs = Observation::empty();
            assert!(!obs.exists());
            assert!(obs.first.is_none());
        }

        #[test]
        fn test_single() {
            let obs = Observation::single(ElementState::new("label"));
            assert!(obs.exists());
            assert_eq!(obs.count, 1);
        }
    }

    mod key_tests {
        use super::*;

        #[test]
        fn test_key_names() {
            assert_eq!(Key::Enter.name(), "Enter");
            assert_eq!(Key::Escape.name(), "Escape");
        }

        #[test]
        fn test_key_display_matches_type_syntax() {
            assert_eq!(Key::Enter.to_string(), "{enter}");
        }
    }

    mod driver_config_tests {
        use super::*;

        #[test]
        fn test_config_default() {
            let config = DriverConfig::default();
            assert!(config.headless);
            assert!(config.sandbox);
            assert!(config.chromium_path.is_none());
        }

        #[test]
        fn test_config_builder() {
            let config = DriverConfig::new()
                .headless(false)
                .viewport(800, 600)
                .with_chromium_path("/usr/bin/chromium")
                .with_no_sandbox();

            assert!(!config.headless);
            assert_eq!(config.viewport_width, 800);
            assert_eq!(config.viewport_height, 600);
            assert_eq!(config.chromium_path.as_deref(), Some("/usr/bin/chromium"));
            assert!(!config.sandbox);
        }
    }
}
