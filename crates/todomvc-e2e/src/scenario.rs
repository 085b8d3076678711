//! Scenario model: steps, contexts and suites.
//!
//! A scenario is an ordered list of [`Step`]s. Contexts group scenarios
//! that share setup steps; a suite is the list of contexts. Nothing here
//! touches a driver; see [`crate::runner`] for execution.

use crate::driver::Key;
use crate::expectation::Expectation;
use crate::fixture::TodoFixture;
use crate::locator::{Locator, Refinement};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Input field for new items
pub const NEW_TODO: &str = ".new-todo";
/// Rows of the list
pub const TODO_ITEMS: &str = ".todo-list li";

/// Where a step applies: a locator, or a remembered alias plus refinements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    /// Resolve this locator
    Locator(Locator),
    /// Recall a remembered locator, then refine it
    Alias {
        /// Alias name (without `@`)
        name: String,
        /// Refinements applied to the recalled locator
        refinements: Vec<Refinement>,
    },
}

impl Target {
    /// Target a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Locator(Locator::new(selector))
    }

    /// Target a remembered alias
    #[must_use]
    pub fn alias(name: impl Into<String>) -> Self {
        Self::Alias {
            name: name.into(),
            refinements: Vec::new(),
        }
    }

    fn push(self, refinement: Refinement) -> Self {
        match self {
            Self::Locator(locator) => Self::Locator(locator.refine(&[refinement])),
            Self::Alias {
                name,
                mut refinements,
            } => {
                refinements.push(refinement);
                Self::Alias { name, refinements }
            }
        }
    }

    /// Narrow to the element at `index`
    #[must_use]
    pub fn nth(self, index: usize) -> Self {
        self.push(Refinement::Nth(index))
    }

    /// Descend into matching children
    #[must_use]
    pub fn find(self, selector: impl Into<String>) -> Self {
        self.push(Refinement::Find(selector.into()))
    }

    /// Filter by text content
    #[must_use]
    pub fn has_text(self, text: impl Into<String>) -> Self {
        self.push(Refinement::HasText(text.into()))
    }
}

impl From<Locator> for Target {
    fn from(locator: Locator) -> Self {
        Self::Locator(locator)
    }
}

impl From<&str> for Target {
    fn from(selector: &str) -> Self {
        Self::css(selector)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locator(locator) => write!(f, "{locator}"),
            Self::Alias { name, refinements } => {
                write!(f, "@{name}")?;
                for refinement in refinements {
                    write!(f, " >> {refinement}")?;
                }
                Ok(())
            }
        }
    }
}

/// Simulated user input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Type text
    Type(String),
    /// Press a key
    Press(Key),
    /// Click
    Click,
    /// Double-click
    DoubleClick,
    /// Click only if not already checked
    Check,
    /// Click only if currently checked
    Uncheck,
    /// Empty a text field
    Clear,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(text) => write!(f, "type {text:?}"),
            Self::Press(key) => write!(f, "press {key}"),
            Self::Click => write!(f, "click"),
            Self::DoubleClick => write!(f, "dblclick"),
            Self::Check => write!(f, "check"),
            Self::Uncheck => write!(f, "uncheck"),
            Self::Clear => write!(f, "clear"),
        }
    }
}

/// One step of a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    /// Navigate to a path or URL (relative paths join the base URL)
    Visit(String),
    /// Perform an action on a target
    Act {
        /// Element to act on
        target: Target,
        /// Input to simulate
        action: Action,
    },
    /// Bind a name to a target for later recall
    Remember {
        /// Alias name (without `@`)
        name: String,
        /// Target to remember
        target: Target,
    },
    /// Poll until the target satisfies the expectation
    Expect {
        /// Element to observe
        target: Target,
        /// Predicate that must become true
        expectation: Expectation,
    },
}

impl Step {
    /// Whether this step is an assertion
    #[must_use]
    pub const fn is_assertion(&self) -> bool {
        matches!(self, Self::Expect { .. })
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Visit(url) => write!(f, "visit {url}"),
            Self::Act { target, action } => write!(f, "{action} {target}"),
            Self::Remember { name, target } => write!(f, "{target} as @{name}"),
            Self::Expect {
                target,
                expectation,
            } => write!(f, "expect {target} to {expectation}"),
        }
    }
}

/// Fluent step construction shared by scenarios and context setup
pub trait StepSequence: Sized {
    /// Append a step
    #[must_use]
    fn step(self, step: Step) -> Self;

    /// Navigate
    #[must_use]
    fn visit(self, url: impl Into<String>) -> Self {
        self.step(Step::Visit(url.into()))
    }

    /// Append an action
    #[must_use]
    fn act(self, target: impl Into<Target>, action: Action) -> Self {
        self.step(Step::Act {
            target: target.into(),
            action,
        })
    }

    /// Type text
    #[must_use]
    fn type_text(self, target: impl Into<Target>, text: impl Into<String>) -> Self {
        self.act(target, Action::Type(text.into()))
    }

    /// Press a key
    #[must_use]
    fn press(self, target: impl Into<Target>, key: Key) -> Self {
        self.act(target, Action::Press(key))
    }

    /// Click
    #[must_use]
    fn click(self, target: impl Into<Target>) -> Self {
        self.act(target, Action::Click)
    }

    /// Double-click
    #[must_use]
    fn double_click(self, target: impl Into<Target>) -> Self {
        self.act(target, Action::DoubleClick)
    }

    /// Check a checkbox
    #[must_use]
    fn check(self, target: impl Into<Target>) -> Self {
        self.act(target, Action::Check)
    }

    /// Uncheck a checkbox
    #[must_use]
    fn uncheck(self, target: impl Into<Target>) -> Self {
        self.act(target, Action::Uncheck)
    }

    /// Clear a text field
    #[must_use]
    fn clear(self, target: impl Into<Target>) -> Self {
        self.act(target, Action::Clear)
    }

    /// Remember a target under an alias
    #[must_use]
    fn remember(self, name: impl Into<String>, target: impl Into<Target>) -> Self {
        self.step(Step::Remember {
            name: name.into(),
            target: target.into(),
        })
    }

    /// Assert (with polling)
    #[must_use]
    fn expect(self, target: impl Into<Target>, expectation: Expectation) -> Self {
        self.step(Step::Expect {
            target: target.into(),
            expectation,
        })
    }

    /// Submit one item through the new-item input and wait until it renders
    /// as row `position`. With an alias, that row is remembered by position
    /// so a label contained in another label cannot capture it.
    #[must_use]
    fn create_todo(self, text: &str, position: usize, alias: Option<&str>) -> Self {
        let row = Locator::new(TODO_ITEMS).nth(position);
        let rendered = Expectation::contains(text.trim());
        let submitted = self
            .type_text(NEW_TODO, text)
            .press(NEW_TODO, Key::Enter);
        match alias {
            Some(name) => submitted
                .remember(name, row)
                .expect(Target::alias(name), rendered),
            None => submitted.expect(row, rendered),
        }
    }

    /// Submit every fixture item in order onto an empty list; optionally
    /// remember the rows
    #[must_use]
    fn create_default_todos(self, fixture: &TodoFixture, alias: Option<&str>) -> Self {
        let created = fixture
            .items()
            .iter()
            .enumerate()
            .fold(self, |seq, (position, item)| seq.create_todo(item, position, None));
        let rows = Locator::new(TODO_ITEMS).with_strict(false);
        let counted = created.expect(rows.clone(), Expectation::Count(fixture.len()));
        match alias {
            Some(name) => counted.remember(name, rows),
            None => counted,
        }
    }
}

/// A named, independently runnable sequence of steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name
    pub name: String,
    /// Steps in order
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Create an empty scenario
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Number of steps
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether there are no steps
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl StepSequence for Scenario {
    fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }
}

/// Steps run before every scenario of a context
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setup {
    /// Steps in order
    pub steps: Vec<Step>,
}

impl Setup {
    /// Create empty setup
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StepSequence for Setup {
    fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }
}

/// Scenarios sharing setup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// Context name
    pub name: String,
    /// Shared setup
    pub setup: Setup,
    /// Scenarios in order
    pub scenarios: Vec<Scenario>,
}

impl Context {
    /// Create an empty context
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            setup: Setup::new(),
            scenarios: Vec::new(),
        }
    }

    /// Set shared setup
    #[must_use]
    pub fn with_setup(mut self, setup: Setup) -> Self {
        self.setup = setup;
        self
    }

    /// Add a scenario
    #[must_use]
    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenarios.push(scenario);
        self
    }
}

/// A complete suite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suite {
    /// Suite name
    pub name: String,
    /// Contexts in order
    pub contexts: Vec<Context>,
}

impl Suite {
    /// Create an empty suite
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contexts: Vec::new(),
        }
    }

    /// Add a context
    #[must_use]
    pub fn with_context(mut self, context: Context) -> Self {
        self.contexts.push(context);
        self
    }

    /// Total scenarios across contexts
    #[must_use]
    pub fn scenario_count(&self) -> usize {
        self.contexts.iter().map(|c| c.scenarios.len()).sum()
    }

    /// Every scenario with its context, in run order
    pub fn iter(&self) -> impl Iterator<Item = (&Context, &Scenario)> {
        self.contexts
            .iter()
            .flat_map(|c| c.scenarios.iter().map(move |s| (c, s)))
    }

    /// Names in "context > scenario" form
    #[must_use]
    pub fn full_names(&self) -> Vec<String> {
        self.iter().map(|(c, s)| full_name(c, s)).collect()
    }
}

/// "context > scenario"
#[must_use]
pub fn full_name(context: &Context, scenario: &Scenario) -> String {
    format!("{} > {}", context.name, scenario.name)
}
