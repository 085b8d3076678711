//! The TodoMVC behavioral suite.
//!
//! Three contexts of scenarios covering item creation, the toggle-all
//! control and per-item completion and editing. Seed labels come from a
//! [`TodoFixture`].

use crate::driver::Key;
use crate::expectation::Expectation;
use crate::fixture::TodoFixture;
use crate::scenario::{Context, Scenario, Setup, StepSequence, Suite, Target, NEW_TODO, TODO_ITEMS};

/// Suite name
pub const SUITE_NAME: &str = "TodoMVC - React";

const TOGGLE_ALL: &str = ".toggle-all";
const TODO_COUNT: &str = ".todo-count";
const MAIN: &str = ".main";
const FOOTER: &str = ".footer";

/// Label typed over the second item when editing
pub const EDITED_LABEL: &str = "buy some sausages";

fn rows() -> Target {
    Target::css(TODO_ITEMS)
}

/// Build the full suite around a fixture
#[must_use]
pub fn todomvc_suite(fixture: &TodoFixture) -> Suite {
    Suite::new(SUITE_NAME)
        .with_context(new_todo(fixture))
        .with_context(mark_all_as_completed(fixture))
        .with_context(item(fixture))
}

fn new_todo(fixture: &TodoFixture) -> Context {
    let (first, second) = (fixture.item(0), fixture.item(1));

    Context::new("New Todo")
        .with_scenario(
            Scenario::new("should allow me to add todo items")
                .type_text(NEW_TODO, first)
                .press(NEW_TODO, Key::Enter)
                .expect(rows().nth(0).find("label"), Expectation::contains(first))
                .type_text(NEW_TODO, second)
                .press(NEW_TODO, Key::Enter)
                .expect(rows().nth(1).find("label"), Expectation::contains(second)),
        )
        .with_scenario(
            Scenario::new("should clear text input field when an item is added")
                .type_text(NEW_TODO, first)
                .press(NEW_TODO, Key::Enter)
                .expect(NEW_TODO, Expectation::value("")),
        )
        .with_scenario(append_to_bottom(fixture))
        .with_scenario(
            Scenario::new("should trim entered text")
                .create_todo(&format!("    {first}    "), 0, None)
                .expect(rows().nth(0), Expectation::text(first)),
        )
        .with_scenario(
            Scenario::new("should show #main and #footer when items added")
                .expect(MAIN, Expectation::Visible.not())
                .expect(FOOTER, Expectation::Visible.not())
                .create_todo(first, 0, None)
                .expect(MAIN, Expectation::Visible)
                .expect(FOOTER, Expectation::Visible),
        )
}

fn append_to_bottom(fixture: &TodoFixture) -> Scenario {
    let scenario = Scenario::new("should append new items to the bottom of the list")
        .create_default_todos(fixture, Some("todos"))
        .expect(TODO_COUNT, Expectation::contains(fixture.items_left_text()));

    fixture
        .items()
        .iter()
        .enumerate()
        .fold(scenario, |scenario, (i, label)| {
            scenario.expect(
                Target::alias("todos").nth(i).find("label"),
                Expectation::contains(label.as_str()),
            )
        })
}

fn mark_all_as_completed(fixture: &TodoFixture) -> Context {
    let every_row = |scenario: Scenario, expectation: &Expectation| {
        (0..fixture.len()).fold(scenario, |scenario, i| {
            scenario.expect(Target::alias("todos").nth(i), expectation.clone())
        })
    };
    let completed = Expectation::class("completed");

    Context::new("Mark all as completed")
        .with_setup(Setup::new().create_default_todos(fixture, Some("todos")))
        .with_scenario(every_row(
            Scenario::new("should allow me to mark all items as completed").check(TOGGLE_ALL),
            &completed,
        ))
        .with_scenario(every_row(
            Scenario::new("should allow me to clear the complete state of all items")
                .check(TOGGLE_ALL)
                .uncheck(TOGGLE_ALL),
            &completed.clone().not(),
        ))
        .with_scenario(
            Scenario::new(
                "complete all checkbox should update state when items are completed / cleared",
            )
            .remember("toggleAll", TOGGLE_ALL)
            .check(Target::alias("toggleAll"))
            .expect(Target::alias("toggleAll"), Expectation::Checked)
            .remember("firstTodo", rows().nth(0))
            .uncheck(Target::alias("firstTodo").find(".toggle"))
            .expect(Target::alias("toggleAll"), Expectation::Checked.not())
            .check(Target::alias("firstTodo").find(".toggle"))
            .expect(Target::alias("toggleAll"), Expectation::Checked),
        )
}

fn item(fixture: &TodoFixture) -> Context {
    let (first, second) = (fixture.item(0), fixture.item(1));
    let completed = Expectation::class("completed");
    let first_todo = || Target::alias("firstTodo");
    let second_todo = || Target::alias("secondTodo");

    Context::new("Item")
        .with_scenario(
            Scenario::new("should allow me to mark items as complete")
                .create_todo(first, 0, Some("firstTodo"))
                .create_todo(second, 1, Some("secondTodo"))
                .check(first_todo().find(".toggle"))
                .expect(first_todo(), completed.clone())
                .expect(second_todo(), completed.clone().not())
                .check(second_todo().find(".toggle"))
                .expect(first_todo(), completed.clone())
                .expect(second_todo(), completed.clone()),
        )
        .with_scenario(
            Scenario::new("should allow me to un-mark items as complete")
                .create_todo(first, 0, Some("firstTodo"))
                .create_todo(second, 1, Some("secondTodo"))
                .check(first_todo().find(".toggle"))
                .expect(first_todo(), completed.clone())
                .expect(second_todo(), completed.clone().not())
                .uncheck(first_todo().find(".toggle"))
                .expect(first_todo(), completed.clone().not())
                .expect(second_todo(), completed.clone().not()),
        )
        .with_scenario(
            Scenario::new("should allow me to edit an item")
                .create_default_todos(fixture, Some("todos"))
                .remember("secondTodo", Target::alias("todos").nth(1))
                .double_click(second_todo().find("label"))
                .clear(second_todo().find(".edit"))
                .type_text(second_todo().find(".edit"), EDITED_LABEL)
                .press(second_todo().find(".edit"), Key::Enter)
                .expect(Target::alias("todos").nth(0), Expectation::contains(first))
                .expect(second_todo(), Expectation::contains(EDITED_LABEL))
                .expect(
                    Target::alias("todos").nth(2),
                    Expectation::contains(fixture.item(2)),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Step;

    #[test]
    fn test_suite_shape() {
        let suite = todomvc_suite(&TodoFixture::default());
        assert_eq!(suite.name, SUITE_NAME);
        let sizes: Vec<usize> = suite.contexts.iter().map(|c| c.scenarios.len()).collect();
        assert_eq!(sizes, vec![5, 3, 3]);
        assert_eq!(suite.scenario_count(), 11);
    }

    #[test]
    fn test_names_are_unique() {
        let mut names = todomvc_suite(&TodoFixture::default()).full_names();
        let before = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), before);
    }

    #[test]
    fn test_fixture_labels_flow_into_steps() {
        let fixture = TodoFixture::new(["walk the dog", "water plants", "call mom", "pay rent"])
            .unwrap();
        let suite = todomvc_suite(&fixture);
        let append = &suite.contexts[0].scenarios[2];
        let last = append.steps.last().unwrap();
        assert_eq!(
            last.to_string(),
            "expect @todos >> nth=3 >> find(label) to contain \"pay rent\""
        );
        assert!(append
            .steps
            .iter()
            .any(|s| s.to_string().contains("4 items left")));
    }

    #[test]
    fn test_mark_all_context_has_setup() {
        let suite = todomvc_suite(&TodoFixture::default());
        let setup = &suite.contexts[1].setup;
        assert!(matches!(
            setup.steps.last(),
            Some(Step::Remember { name, .. }) if name == "todos"
        ));
    }

    #[test]
    fn test_trim_scenario_pads_input() {
        let suite = todomvc_suite(&TodoFixture::default());
        let trim = &suite.contexts[0].scenarios[3];
        assert_eq!(
            trim.steps[0].to_string(),
            "type \"    buy some cheese    \" .new-todo"
        );
    }
}
