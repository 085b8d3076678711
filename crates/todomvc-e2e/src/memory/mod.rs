//! MemoryDriver - in-process TodoMVC behind the [`TodoDriver`] trait.
//!
//! Runs the whole suite without a browser. Mutations are applied to the
//! application at once. Clicks re-render the page immediately; typed text
//! and key presses only show up after the configured render latency, so
//! polling is exercised the same way it is against a real page.

mod app;
mod dom;

pub use app::{AppDefect, Binding, Filter, TodoApp, TodoItem};
pub use dom::{Document, Node, NodeId, Selector};

use crate::driver::{Key, Observation, TodoDriver};
use crate::locator::Locator;
use crate::result::{E2eError, E2eResult};
use async_trait::async_trait;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Page {
    url: String,
    rendered: Document,
    dirty_since: Option<Instant>,
    focused: Option<Binding>,
}

/// Driver backed by an in-process application model
#[derive(Debug, Default)]
pub struct MemoryDriver {
    app: TodoApp,
    defects: Vec<AppDefect>,
    render_latency: Duration,
    page: Option<Page>,
    closed: bool,
}

impl MemoryDriver {
    /// Create a driver with no latency and no defects
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay between a mutation and its appearance in observations
    #[must_use]
    pub const fn with_render_latency(mut self, latency: Duration) -> Self {
        self.render_latency = latency;
        self
    }

    /// Inject an application defect (applies from the next navigation)
    #[must_use]
    pub fn with_defect(mut self, defect: AppDefect) -> Self {
        self.defects.push(defect);
        self
    }

    /// Live application state
    #[must_use]
    pub const fn app(&self) -> &TodoApp {
        &self.app
    }

    /// URL of the loaded page
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.page.as_ref().map(|p| p.url.as_str())
    }

    fn page_mut(&mut self) -> E2eResult<&mut Page> {
        if self.closed {
            return Err(E2eError::PageError {
                message: "driver is closed".to_string(),
            });
        }
        self.page.as_mut().ok_or_else(|| E2eError::PageError {
            message: "no page loaded".to_string(),
        })
    }

    fn load(&mut self, url: &str) -> E2eResult<()> {
        if self.closed {
            return Err(E2eError::PageError {
                message: "driver is closed".to_string(),
            });
        }
        if url.trim().is_empty() {
            return Err(E2eError::NavigationError {
                url: url.to_string(),
                message: "empty URL".to_string(),
            });
        }
        self.app = TodoApp::with_defects(&self.defects);
        self.page = Some(Page {
            url: url.to_string(),
            rendered: self.app.render(),
            dirty_since: None,
            focused: None,
        });
        tracing::debug!(url, "memory page loaded");
        Ok(())
    }

    /// Current page, re-rendered once the latency has passed
    fn document(&mut self) -> E2eResult<&Document> {
        let latency = self.render_latency;
        let render = {
            let page = self.page_mut()?;
            page.dirty_since.is_some_and(|t| t.elapsed() >= latency)
        };
        if render {
            let rendered = self.app.render();
            let page = self.page_mut()?;
            page.rendered = rendered;
            page.dirty_since = None;
        }
        Ok(&self.page_mut()?.rendered)
    }

    fn render_now(&mut self) -> E2eResult<()> {
        let rendered = self.app.render();
        let page = self.page_mut()?;
        page.rendered = rendered;
        page.dirty_since = None;
        Ok(())
    }

    /// Schedule a render after the latency
    fn mutated(&mut self) -> E2eResult<()> {
        if self.render_latency.is_zero() {
            self.render_now()
        } else {
            self.page_mut()?.dirty_since = Some(Instant::now());
            Ok(())
        }
    }

    /// Binding of the first element the locator matches
    fn target(&mut self, locator: &Locator) -> E2eResult<Option<Binding>> {
        let doc = self.document()?;
        let ids = doc.resolve(locator)?;
        let first = ids.first().copied().ok_or_else(|| E2eError::InputError {
            selector: locator.to_string(),
            message: "no matching element".to_string(),
        })?;
        Ok(doc.node(first).binding)
    }

    fn focus(&mut self, next: Option<Binding>) -> E2eResult<()> {
        let page = self.page_mut()?;
        let previous = page.focused;
        if previous == next {
            return Ok(());
        }
        page.focused = next;
        if let Some(previous) = previous {
            self.app.blur(previous);
        }
        Ok(())
    }

    fn field(&mut self, locator: &Locator) -> E2eResult<Binding> {
        let binding = self.target(locator)?;
        match binding {
            Some(b) if self.app.is_typeable(b) => Ok(b),
            _ => Err(E2eError::InputError {
                selector: locator.to_string(),
                message: "element is not a text field".to_string(),
            }),
        }
    }
}

#[async_trait]
impl TodoDriver for MemoryDriver {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn navigate(&mut self, url: &str) -> E2eResult<()> {
        self.load(url)
    }

    async fn reload(&mut self) -> E2eResult<()> {
        let url = self.page_mut()?.url.clone();
        self.load(&url)
    }

    async fn observe(&mut self, locator: &Locator) -> E2eResult<Observation> {
        let doc = self.document()?;
        let ids = doc.resolve(locator)?;
        Ok(Observation {
            count: ids.len(),
            first: ids.first().map(|&id| doc.snapshot(id)),
        })
    }

    async fn type_text(&mut self, locator: &Locator, text: &str) -> E2eResult<()> {
        let binding = self.field(locator)?;
        self.focus(Some(binding))?;
        self.app.type_text(binding, text);
        self.mutated()
    }

    async fn press_key(&mut self, locator: &Locator, key: Key) -> E2eResult<()> {
        let binding = self.target(locator)?;
        self.focus(binding)?;
        match (binding, key) {
            (_, Key::Tab) => self.focus(None)?,
            (Some(b), key) => self.app.key(b, key),
            (None, _) => {}
        }
        self.mutated()
    }

    async fn click(&mut self, locator: &Locator) -> E2eResult<()> {
        let binding = self.target(locator)?;
        self.focus(binding.filter(|b| b.is_focusable()))?;
        if let Some(b) = binding {
            self.app.click(b);
        }
        self.render_now()
    }

    async fn double_click(&mut self, locator: &Locator) -> E2eResult<()> {
        let binding = self.target(locator)?;
        self.focus(binding.filter(|b| b.is_focusable()))?;
        if let Some(b) = binding {
            self.app.click(b);
            self.app.click(b);
            self.app.double_click(b);
            // the edit field takes focus when editing starts
            if let (Binding::Label(id), Some(editing)) = (b, self.app.editing()) {
                if id == editing {
                    self.focus(Some(Binding::Edit(id)))?;
                }
            }
        }
        self.render_now()
    }

    async fn clear(&mut self, locator: &Locator) -> E2eResult<()> {
        let binding = self.field(locator)?;
        self.focus(Some(binding))?;
        self.app.clear(binding);
        self.mutated()
    }

    async fn blur_active(&mut self) -> E2eResult<()> {
        self.focus(None)?;
        self.render_now()
    }

    async fn close(&mut self) -> E2eResult<()> {
        self.page = None;
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://localhost:8888";

    async fn loaded() -> MemoryDriver {
        let mut driver = MemoryDriver::new();
        driver.navigate(URL).await.unwrap();
        driver
    }

    async fn add(driver: &mut MemoryDriver, text: &str) {
        let input = Locator::new(".new-todo");
        driver.type_text(&input, text).await.unwrap();
        driver.press_key(&input, Key::Enter).await.unwrap();
    }

    mod lifecycle_tests {
        use super::*;

        #[tokio::test]
        async fn test_observe_before_navigate_fails() {
            let mut driver = MemoryDriver::new();
            let err = driver.observe(&Locator::new("body")).await.unwrap_err();
            assert!(matches!(err, E2eError::PageError { .. }));
        }

        #[tokio::test]
        async fn test_navigate_resets_state() {
            let mut driver = loaded().await;
            add(&mut driver, "a").await;
            assert_eq!(driver.app().items().len(), 1);
            driver.reload().await.unwrap();
            assert!(driver.app().items().is_empty());
            assert_eq!(driver.url(), Some(URL));
        }

        #[tokio::test]
        async fn test_empty_url_rejected() {
            let mut driver = MemoryDriver::new();
            let err = driver.navigate(" ").await.unwrap_err();
            assert!(matches!(err, E2eError::NavigationError { .. }));
        }

        #[tokio::test]
        async fn test_close() {
            let mut driver = loaded().await;
            driver.close().await.unwrap();
            assert!(driver.observe(&Locator::new("body")).await.is_err());
            assert!(driver.navigate(URL).await.is_err());
        }
    }

    mod input_tests {
        use super::*;

        #[tokio::test]
        async fn test_type_and_submit() {
            let mut driver = loaded().await;
            add(&mut driver, "buy some cheese").await;
            let obs = driver
                .observe(&Locator::new(".todo-list li").nth(0).find("label"))
                .await
                .unwrap();
            assert_eq!(obs.first.unwrap().text, "buy some cheese");
            let input = driver.observe(&Locator::new(".new-todo")).await.unwrap();
            assert_eq!(input.first.unwrap().value.as_deref(), Some(""));
        }

        #[tokio::test]
        async fn test_typing_into_checkbox_fails() {
            let mut driver = loaded().await;
            add(&mut driver, "a").await;
            let err = driver
                .type_text(&Locator::new(".toggle"), "x")
                .await
                .unwrap_err();
            assert!(matches!(err, E2eError::InputError { .. }));
        }

        #[tokio::test]
        async fn test_action_without_match_fails() {
            let mut driver = loaded().await;
            let err = driver.click(&Locator::new(".toggle-all")).await.unwrap_err();
            assert!(err.to_string().contains(".toggle-all"));
        }

        #[tokio::test]
        async fn test_toggle_all_label_click() {
            let mut driver = loaded().await;
            add(&mut driver, "a").await;
            driver
                .click(&Locator::new("label[for=toggle-all]"))
                .await
                .unwrap();
            assert!(driver.app().items()[0].completed);
        }
    }

    mod edit_tests {
        use super::*;

        #[tokio::test]
        async fn test_double_click_focuses_edit_field() {
            let mut driver = loaded().await;
            add(&mut driver, "a").await;
            add(&mut driver, "b").await;
            let row = Locator::new(".todo-list li").nth(1);
            driver.double_click(&row.clone().find("label")).await.unwrap();
            let edit = row.find(".edit");
            driver.clear(&edit).await.unwrap();
            driver.type_text(&edit, "c").await.unwrap();
            // blurring commits the edit
            driver.blur_active().await.unwrap();
            assert_eq!(driver.app().titles(), vec!["a", "c"]);
        }

        #[tokio::test]
        async fn test_focus_change_commits_edit() {
            let mut driver = loaded().await;
            add(&mut driver, "a").await;
            driver
                .double_click(&Locator::new(".todo-list li label"))
                .await
                .unwrap();
            driver
                .type_text(&Locator::new(".new-todo"), "next")
                .await
                .unwrap();
            assert_eq!(driver.app().editing(), None);
        }
    }

    mod latency_tests {
        use super::*;

        #[tokio::test]
        async fn test_observation_lags_mutation() {
            let mut driver = MemoryDriver::new().with_render_latency(Duration::from_millis(30));
            driver.navigate(URL).await.unwrap();
            add(&mut driver, "a").await;
            let rows = Locator::new(".todo-list li");
            assert_eq!(driver.observe(&rows).await.unwrap().count, 0);
            tokio::time::sleep(Duration::from_millis(40)).await;
            assert_eq!(driver.observe(&rows).await.unwrap().count, 1);
        }

        #[tokio::test]
        async fn test_click_renders_immediately() {
            let mut driver = MemoryDriver::new().with_render_latency(Duration::from_millis(500));
            driver.navigate(URL).await.unwrap();
            add(&mut driver, "a").await;
            tokio::time::sleep(Duration::from_millis(510)).await;
            let toggle = Locator::new(".toggle");
            driver.click(&toggle).await.unwrap();
            let obs = driver.observe(&toggle).await.unwrap();
            assert!(obs.first.unwrap().is_checked());
            let row = driver.observe(&Locator::new(".todo-list li")).await.unwrap();
            assert!(row.first.unwrap().has_class("completed"));
        }
    }

    mod defect_tests {
        use super::*;

        #[tokio::test]
        async fn test_defect_survives_navigation() {
            let mut driver = MemoryDriver::new().with_defect(AppDefect::KeepInput);
            driver.navigate(URL).await.unwrap();
            add(&mut driver, "a").await;
            assert_eq!(driver.app().new_todo_text(), "a");
        }
    }
}
