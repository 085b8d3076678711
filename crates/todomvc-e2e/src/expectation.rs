//! Predicates over observed DOM state.
//!
//! An [`Expectation`] is evaluated against an [`Observation`]; on a miss it
//! reports what was expected and what was seen, which the runner keeps as
//! the "last observed" value while polling.

use crate::driver::{ElementState, Observation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Expected state of a located element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expectation {
    /// At least one element matches
    Exist,
    /// Exactly this many elements match
    Count(usize),
    /// First match is rendered visibly
    Visible,
    /// First match's text content equals this
    HaveText(String),
    /// First match's text content contains this
    ContainText(String),
    /// First match's form value equals this
    HaveValue(String),
    /// First match carries this class
    HaveClass(String),
    /// First match is a checked checkbox
    Checked,
    /// Negation
    Not(Box<Expectation>),
}

/// Expected versus observed, for a failed evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// What the expectation wanted
    pub expected: String,
    /// What was observed
    pub actual: String,
}

impl Expectation {
    /// Text equality
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::HaveText(text.into())
    }

    /// Text containment
    #[must_use]
    pub fn contains(text: impl Into<String>) -> Self {
        Self::ContainText(text.into())
    }

    /// Value equality
    #[must_use]
    pub fn value(value: impl Into<String>) -> Self {
        Self::HaveValue(value.into())
    }

    /// Class membership
    #[must_use]
    pub fn class(class: impl Into<String>) -> Self {
        Self::HaveClass(class.into())
    }

    /// Negate this expectation
    #[must_use]
    pub fn not(self) -> Self {
        match self {
            Self::Not(inner) => *inner,
            other => Self::Not(Box::new(other)),
        }
    }

    /// Evaluate against an observation
    pub fn evaluate(&self, observation: &Observation) -> Result<(), Mismatch> {
        if self.holds(observation) {
            Ok(())
        } else {
            Err(Mismatch {
                expected: self.to_string(),
                actual: self.observed(observation),
            })
        }
    }

    /// Whether the predicate is true for this observation
    #[must_use]
    pub fn holds(&self, observation: &Observation) -> bool {
        let first = observation.first.as_ref();
        match self {
            Self::Exist => observation.exists(),
            Self::Count(n) => observation.count == *n,
            Self::Visible => first.is_some_and(|el| el.visible),
            Self::HaveText(t) => first.is_some_and(|el| el.text == *t),
            Self::ContainText(t) => first.is_some_and(|el| el.text.contains(t.as_str())),
            Self::HaveValue(v) => first.is_some_and(|el| el.value.as_deref() == Some(v.as_str())),
            Self::HaveClass(c) => first.is_some_and(|el| el.has_class(c)),
            Self::Checked => first.is_some_and(ElementState::is_checked),
            Self::Not(inner) => match inner.as_ref() {
                // absence satisfies these negations
                Self::Exist | Self::Count(_) | Self::Visible => !inner.holds(observation),
                // property negations still need an element to inspect
                _ => observation.exists() && !inner.holds(observation),
            },
        }
    }

    /// Describe the part of the observation this expectation looks at
    #[must_use]
    pub fn observed(&self, observation: &Observation) -> String {
        match self {
            Self::Not(inner) => inner.observed(observation),
            Self::Exist | Self::Count(_) => match observation.count {
                1 => "1 match".to_string(),
                n => format!("{n} matches"),
            },
            _ => observation
                .first
                .as_ref()
                .map_or_else(|| "no element".to_string(), |el| self.observed_property(el)),
        }
    }

    fn observed_property(&self, el: &ElementState) -> String {
        match self {
            Self::Visible => if el.visible { "visible" } else { "hidden" }.to_string(),
            Self::HaveText(_) | Self::ContainText(_) => format!("text {:?}", el.text),
            Self::HaveValue(_) => match &el.value {
                Some(v) => format!("value {v:?}"),
                None => format!("<{}> without a value", el.tag),
            },
            Self::HaveClass(_) => format!("classes {:?}", el.classes),
            Self::Checked => if el.is_checked() { "checked" } else { "unchecked" }.to_string(),
            Self::Exist | Self::Count(_) | Self::Not(_) => format!("<{}>", el.tag),
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exist => write!(f, "exist"),
            Self::Count(n) => write!(f, "have length {n}"),
            Self::Visible => write!(f, "be visible"),
            Self::HaveText(t) => write!(f, "have text {t:?}"),
            Self::ContainText(t) => write!(f, "contain {t:?}"),
            Self::HaveValue(v) => write!(f, "have value {v:?}"),
            Self::HaveClass(c) => write!(f, "have class {c:?}"),
            Self::Checked => write!(f, "be checked"),
            Self::Not(inner) => write!(f, "not {inner}"),
        }
    }
}
