//! Locator abstraction for element selection.
//!
//! A locator is a CSS root selector followed by refinements, mirroring the
//! chained queries a scenario reads naturally:
//! `.todo-list li` -> `nth(1)` -> `find("label")`.
//!
//! Locators are plain values. They are resolved again on every use, so a
//! locator kept in a local variable (or registered as an alias) always
//! reflects the current DOM rather than a detached node.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default timeout for locating an action target (4 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 4000;

/// Default polling interval while locating (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// A narrowing step applied after the root selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Refinement {
    /// Keep only the element at this zero-based index
    Nth(usize),
    /// Replace the set with matching descendants
    Find(String),
    /// Keep elements whose text content contains this string
    HasText(String),
}

impl fmt::Display for Refinement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nth(i) => write!(f, "nth={i}"),
            Self::Find(css) => write!(f, "find({css})"),
            Self::HasText(text) => write!(f, "has-text({text:?})"),
        }
    }
}

/// Locator options for customizing behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorOptions {
    /// Per-locator timeout overriding the runner's action timeout
    pub timeout: Option<Duration>,
    /// Whether actions require exactly one match
    pub strict: bool,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            strict: true,
        }
    }
}

/// A locator for finding elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    root: String,
    refinements: Vec<Refinement>,
    options: LocatorOptions,
}

impl Locator {
    /// Create a new locator with a CSS selector
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            root: selector.into(),
            refinements: Vec::new(),
            options: LocatorOptions::default(),
        }
    }

    /// Narrow to the element at `index`
    #[must_use]
    pub fn nth(mut self, index: usize) -> Self {
        self.refinements.push(Refinement::Nth(index));
        self
    }

    /// Narrow to the first element
    #[must_use]
    pub fn first(self) -> Self {
        self.nth(0)
    }

    /// Descend into matching children
    #[must_use]
    pub fn find(mut self, selector: impl Into<String>) -> Self {
        self.refinements.push(Refinement::Find(selector.into()));
        self
    }

    /// Filter by text content
    #[must_use]
    pub fn has_text(mut self, text: impl Into<String>) -> Self {
        self.refinements.push(Refinement::HasText(text.into()));
        self
    }

    /// Append a list of refinements
    #[must_use]
    pub fn refine(mut self, refinements: &[Refinement]) -> Self {
        self.refinements.extend_from_slice(refinements);
        self
    }

    /// Set a custom timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    /// Disable strict mode (allow multiple matches)
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.options.strict = strict;
        self
    }

    /// Root CSS selector
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Refinements applied after the root
    #[must_use]
    pub fn refinements(&self) -> &[Refinement] {
        &self.refinements
    }

    /// Get the options
    #[must_use]
    pub const fn options(&self) -> &LocatorOptions {
        &self.options
    }

    /// JavaScript expression evaluating to the array of matched elements
    #[must_use]
    pub fn to_js_collect(&self) -> String {
        let mut js = format!(
            "(() => {{ let els = Array.from(document.querySelectorAll({})); ",
            js_string(&self.root)
        );
        for refinement in &self.refinements {
            match refinement {
                Refinement::Nth(i) => {
                    js.push_str(&format!("els = els.length > {i} ? [els[{i}]] : []; "));
                }
                Refinement::Find(css) => {
                    js.push_str(&format!(
                        "els = Array.from(new Set(els.flatMap(el => Array.from(el.querySelectorAll({})))));",
                        js_string(css)
                    ));
                    js.push(' ');
                }
                Refinement::HasText(text) => {
                    js.push_str(&format!(
                        "els = els.filter(el => (el.textContent || '').includes({})); ",
                        js_string(text)
                    ));
                }
            }
        }
        js.push_str("return els; })()");
        js
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)?;
        for refinement in &self.refinements {
            write!(f, " >> {refinement}")?;
        }
        Ok(())
    }
}

/// Quote a string as a JavaScript literal
fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| String::from("\"\""))
}
