//! In-process TodoMVC application.
//!
//! Follows the React TodoMVC reference behavior and renders the same
//! markup, so the scenarios that drive a real page drive this one too.

use super::dom::{Document, Node};
use crate::driver::Key;
use crate::fixture::items_left_text;
use serde::{Deserialize, Serialize};

/// One list item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Stable id
    pub id: u64,
    /// Label
    pub title: String,
    /// Completion state
    pub completed: bool,
}

/// Which rows the list shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Filter {
    /// Every item
    #[default]
    All,
    /// Items not completed
    Active,
    /// Completed items
    Completed,
}

impl Filter {
    const ALL: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    const fn href(self) -> &'static str {
        match self {
            Self::All => "#/",
            Self::Active => "#/active",
            Self::Completed => "#/completed",
        }
    }

    const fn shows(self, item: &TodoItem) -> bool {
        match self {
            Self::All => true,
            Self::Active => !item.completed,
            Self::Completed => item.completed,
        }
    }
}

/// Deliberate bugs for exercising failure reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppDefect {
    /// Submitted labels keep their surrounding whitespace
    NoTrim,
    /// The new-item input keeps its text after submit
    KeepInput,
    /// Toggle-all only changes when clicked, not when rows change
    StaleToggleAll,
}

/// Element a DOM node routes events to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    /// `.new-todo`
    NewTodo,
    /// `.toggle-all` and its label
    ToggleAll,
    /// Row checkbox
    Toggle(u64),
    /// Row label
    Label(u64),
    /// Row delete button
    Destroy(u64),
    /// Row edit field
    Edit(u64),
    /// `.clear-completed`
    ClearCompleted,
    /// Filter link
    Filter(Filter),
}

impl Binding {
    /// Whether clicking moves focus to this element
    #[must_use]
    pub const fn is_focusable(self) -> bool {
        !matches!(self, Self::Label(_) | Self::Filter(_))
    }
}

/// Application state
#[derive(Debug, Clone, Default)]
pub struct TodoApp {
    items: Vec<TodoItem>,
    next_id: u64,
    new_todo: String,
    editing: Option<u64>,
    edit_text: String,
    filter: Filter,
    toggle_all_clicked: bool,
    defects: Vec<AppDefect>,
}

impl TodoApp {
    /// Fresh, empty application
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh application carrying defects
    #[must_use]
    pub fn with_defects(defects: &[AppDefect]) -> Self {
        Self {
            defects: defects.to_vec(),
            ..Self::default()
        }
    }

    fn has(&self, defect: AppDefect) -> bool {
        self.defects.contains(&defect)
    }

    /// Items in list order
    #[must_use]
    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    /// Labels in list order
    #[must_use]
    pub fn titles(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.title.as_str()).collect()
    }

    /// Current text of the new-item input
    #[must_use]
    pub fn new_todo_text(&self) -> &str {
        &self.new_todo
    }

    /// Item being edited
    #[must_use]
    pub const fn editing(&self) -> Option<u64> {
        self.editing
    }

    /// Items not yet completed
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.items.iter().filter(|i| !i.completed).count()
    }

    /// Checked state of the toggle-all control
    #[must_use]
    pub fn toggle_all_checked(&self) -> bool {
        if self.has(AppDefect::StaleToggleAll) {
            self.toggle_all_clicked
        } else {
            !self.items.is_empty() && self.items.iter().all(|i| i.completed)
        }
    }

    fn item_mut(&mut self, id: u64) -> Option<&mut TodoItem> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    fn field_mut(&mut self, binding: Binding) -> Option<&mut String> {
        match binding {
            Binding::NewTodo => Some(&mut self.new_todo),
            Binding::Edit(id) if self.editing == Some(id) => Some(&mut self.edit_text),
            _ => None,
        }
    }

    /// Whether the element accepts typed text right now
    #[must_use]
    pub fn is_typeable(&self, binding: Binding) -> bool {
        match binding {
            Binding::NewTodo => true,
            Binding::Edit(id) => self.editing == Some(id),
            _ => false,
        }
    }

    /// Append typed text; returns false when the element is not a field
    pub fn type_text(&mut self, binding: Binding, text: &str) -> bool {
        self.field_mut(binding)
            .map(|field| field.push_str(text))
            .is_some()
    }

    /// Empty a field; returns false when the element is not a field
    pub fn clear(&mut self, binding: Binding) -> bool {
        self.field_mut(binding).map(String::clear).is_some()
    }

    /// Key pressed while `binding` has focus
    pub fn key(&mut self, binding: Binding, key: Key) {
        match (binding, key) {
            (Binding::NewTodo, Key::Enter) => self.submit(),
            (Binding::Edit(id), Key::Enter) => self.commit_edit(id),
            (Binding::Edit(id), Key::Escape) if self.editing == Some(id) => {
                self.editing = None;
            }
            (_, Key::Backspace) => {
                if let Some(field) = self.field_mut(binding) {
                    field.pop();
                }
            }
            _ => {}
        }
    }

    /// Click on an element
    pub fn click(&mut self, binding: Binding) {
        match binding {
            Binding::ToggleAll => {
                let target = !self.toggle_all_checked();
                self.toggle_all_clicked = target;
                for item in &mut self.items {
                    item.completed = target;
                }
            }
            Binding::Toggle(id) => {
                if let Some(item) = self.item_mut(id) {
                    item.completed = !item.completed;
                }
            }
            Binding::Destroy(id) => self.items.retain(|i| i.id != id),
            Binding::ClearCompleted => self.items.retain(|i| !i.completed),
            Binding::Filter(filter) => self.filter = filter,
            Binding::NewTodo | Binding::Label(_) | Binding::Edit(_) => {}
        }
    }

    /// Double-click on an element
    pub fn double_click(&mut self, binding: Binding) {
        if let Binding::Label(id) = binding {
            if let Some(title) = self.items.iter().find(|i| i.id == id).map(|i| i.title.clone()) {
                self.editing = Some(id);
                self.edit_text = title;
            }
        }
    }

    /// Focus left an element
    pub fn blur(&mut self, binding: Binding) {
        if let Binding::Edit(id) = binding {
            self.commit_edit(id);
        }
    }

    fn submit(&mut self) {
        let trimmed = self.new_todo.trim();
        if trimmed.is_empty() {
            return;
        }
        let title = if self.has(AppDefect::NoTrim) {
            self.new_todo.clone()
        } else {
            trimmed.to_string()
        };
        self.items.push(TodoItem {
            id: self.next_id,
            title,
            completed: false,
        });
        self.next_id += 1;
        if !self.has(AppDefect::KeepInput) {
            self.new_todo.clear();
        }
    }

    fn commit_edit(&mut self, id: u64) {
        if self.editing != Some(id) {
            return;
        }
        self.editing = None;
        let title = self.edit_text.trim().to_string();
        if title.is_empty() {
            self.items.retain(|i| i.id != id);
        } else if let Some(item) = self.item_mut(id) {
            item.title = title;
        }
    }

    /// Render the page
    #[must_use]
    pub fn render(&self) -> Document {
        let mut doc = Document::new();
        let app = doc.append(doc.body(), Node::element("section").class("todoapp"));

        let header = doc.append(app, Node::element("header").class("header"));
        let h1 = doc.append(header, Node::element("h1"));
        doc.append_text(h1, "todos");
        doc.append(
            header,
            Node::element("input")
                .class("new-todo")
                .attr("placeholder", "What needs to be done?")
                .attr("autofocus", "")
                .value(self.new_todo.clone())
                .bind(Binding::NewTodo),
        );

        if self.items.is_empty() {
            return doc;
        }

        let main = doc.append(app, Node::element("section").class("main"));
        doc.append(
            main,
            Node::element("input")
                .id("toggle-all")
                .class("toggle-all")
                .checkbox(self.toggle_all_checked())
                .bind(Binding::ToggleAll),
        );
        let label = doc.append(
            main,
            Node::element("label")
                .attr("for", "toggle-all")
                .bind(Binding::ToggleAll),
        );
        doc.append_text(label, "Mark all as complete");

        let list = doc.append(main, Node::element("ul").class("todo-list"));
        for item in self.items.iter().filter(|i| self.filter.shows(i)) {
            let editing = self.editing == Some(item.id);
            let li = doc.append(
                list,
                Node::element("li")
                    .class_if("completed", item.completed)
                    .class_if("editing", editing),
            );
            let view = doc.append(li, Node::element("div").class("view").hidden(editing));
            doc.append(
                view,
                Node::element("input")
                    .class("toggle")
                    .checkbox(item.completed)
                    .bind(Binding::Toggle(item.id)),
            );
            let label = doc.append(view, Node::element("label").bind(Binding::Label(item.id)));
            doc.append_text(label, item.title.clone());
            doc.append(
                view,
                Node::element("button")
                    .class("destroy")
                    .bind(Binding::Destroy(item.id)),
            );
            let edit_value = if editing {
                self.edit_text.clone()
            } else {
                item.title.clone()
            };
            doc.append(
                li,
                Node::element("input")
                    .class("edit")
                    .value(edit_value)
                    .hidden(!editing)
                    .bind(Binding::Edit(item.id)),
            );
        }

        let footer = doc.append(app, Node::element("footer").class("footer"));
        let count = doc.append(footer, Node::element("span").class("todo-count"));
        let active = self.active_count();
        let strong = doc.append(count, Node::element("strong"));
        doc.append_text(strong, active.to_string());
        let left = items_left_text(active);
        doc.append_text(count, left.trim_start_matches(|c: char| c.is_ascii_digit()));

        let filters = doc.append(footer, Node::element("ul").class("filters"));
        for filter in Filter::ALL {
            let li = doc.append(filters, Node::element("li"));
            let link = doc.append(
                li,
                Node::element("a")
                    .attr("href", filter.href())
                    .class_if("selected", filter == self.filter)
                    .bind(Binding::Filter(filter)),
            );
            doc.append_text(link, filter.label());
        }

        if self.items.iter().any(|i| i.completed) {
            let clear = doc.append(
                footer,
                Node::element("button")
                    .class("clear-completed")
                    .bind(Binding::ClearCompleted),
            );
            doc.append_text(clear, "Clear completed");
        }
        doc
    }
}
