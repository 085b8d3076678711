//! ChromiumDriver - real browser control over CDP.
//!
//! Only built with the `browser` feature. Locators are resolved by
//! evaluating the JavaScript produced by [`Locator::to_js_collect`];
//! actions mark the first match with a one-off attribute and hand that
//! element to chromiumoxide for trusted input events.

use crate::driver::{DriverConfig, Key, Observation, TodoDriver};
use crate::locator::Locator;
use crate::result::{E2eError, E2eResult};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::task::JoinHandle;

/// Attribute used to hand a located element to CDP
const TARGET_ATTR: &str = "data-e2e-target";

/// Drops everything the app persisted for the current origin
const RESET_STORAGE_SCRIPT: &str =
    "(() => { window.localStorage.clear(); window.sessionStorage.clear(); return true; })()";

/// Driver backed by a Chromium page
#[derive(Debug)]
pub struct ChromiumDriver {
    config: DriverConfig,
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromiumDriver {
    /// Launch Chromium and open a blank page
    ///
    /// # Errors
    ///
    /// Returns error if the executable is missing or the browser cannot start
    pub async fn launch(config: DriverConfig) -> E2eResult<Self> {
        let mut builder = BrowserConfig::builder()
            .window_size(config.viewport_width, config.viewport_height);

        if !config.headless {
            builder = builder.with_head();
        }
        if !config.sandbox {
            builder = builder.no_sandbox();
        }

        let executable = config
            .chromium_path
            .clone()
            .or_else(|| std::env::var("CHROMIUM_PATH").ok());
        if let Some(path) = executable {
            if !Path::new(&path).exists() {
                return Err(E2eError::BrowserNotFound);
            }
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder
            .build()
            .map_err(|message| E2eError::BrowserLaunchError { message })?;

        let (browser, mut handler) =
            Browser::launch(cdp_config)
                .await
                .map_err(|e| E2eError::BrowserLaunchError {
                    message: e.to_string(),
                })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!(error = %e, "cdp handler stopped");
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| E2eError::PageError {
                message: e.to_string(),
            })?;

        tracing::info!(
            headless = config.headless,
            width = config.viewport_width,
            height = config.viewport_height,
            "chromium launched"
        );

        Ok(Self {
            config,
            browser,
            page,
            handler,
        })
    }

    /// Get the driver configuration
    #[must_use]
    pub const fn config(&self) -> &DriverConfig {
        &self.config
    }

    async fn eval<T: DeserializeOwned>(&self, js: String) -> E2eResult<T> {
        let result = self
            .page
            .evaluate(js)
            .await
            .map_err(|e| E2eError::ScriptError {
                message: e.to_string(),
            })?;
        result.into_value().map_err(|e| E2eError::ScriptError {
            message: e.to_string(),
        })
    }

    async fn goto(&self, url: &str) -> E2eResult<()> {
        let timeout = self.config.navigation_timeout;
        tokio::time::timeout(timeout, self.page.goto(url))
            .await
            .map_err(|_| E2eError::NavigationError {
                url: url.to_string(),
                message: format!("timed out after {}ms", timeout.as_millis()),
            })?
            .map_err(|e| E2eError::NavigationError {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    /// Mark the first match and fetch it as a CDP element
    async fn element(&self, locator: &Locator) -> E2eResult<Element> {
        let token = uuid::Uuid::new_v4().to_string();
        let js = format!(
            "(() => {{ \
               document.querySelectorAll('[{TARGET_ATTR}]').forEach(e => e.removeAttribute('{TARGET_ATTR}')); \
               const el = {collect}[0]; \
               if (!el) return false; \
               el.setAttribute('{TARGET_ATTR}', '{token}'); \
               return true; \
             }})()",
            collect = locator.to_js_collect(),
        );
        if !self.eval::<bool>(js).await? {
            return Err(E2eError::InputError {
                selector: locator.to_string(),
                message: "no matching element".to_string(),
            });
        }
        self.page
            .find_element(format!("[{TARGET_ATTR}=\"{token}\"]"))
            .await
            .map_err(|e| input_error(locator, &e))
    }

    /// Run a script against the first match (`el` in scope)
    async fn with_first(&self, locator: &Locator, body: &str) -> E2eResult<()> {
        let js = format!(
            "(() => {{ const el = {collect}[0]; if (!el) return false; {body} return true; }})()",
            collect = locator.to_js_collect(),
        );
        if self.eval::<bool>(js).await? {
            Ok(())
        } else {
            Err(E2eError::InputError {
                selector: locator.to_string(),
                message: "no matching element".to_string(),
            })
        }
    }
}

fn input_error(locator: &Locator, e: &impl std::fmt::Display) -> E2eError {
    E2eError::InputError {
        selector: locator.to_string(),
        message: e.to_string(),
    }
}

/// Snapshot script: match count plus the first element's state
fn observe_script(locator: &Locator) -> String {
    format!(
        "(() => {{ \
           const els = {collect}; \
           const el = els[0]; \
           if (!el) return {{ count: 0, first: null }}; \
           const style = window.getComputedStyle(el); \
           return {{ \
             count: els.length, \
             first: {{ \
               tag: el.tagName.toLowerCase(), \
               text: el.textContent || '', \
               value: typeof el.value === 'string' ? el.value : null, \
               classes: Array.from(el.classList), \
               checked: el.type === 'checkbox' || el.type === 'radio' ? el.checked : null, \
               visible: el.getClientRects().length > 0 && style.visibility !== 'hidden' \
             }} \
           }}; \
         }})()",
        collect = locator.to_js_collect(),
    )
}

#[async_trait]
impl TodoDriver for ChromiumDriver {
    fn name(&self) -> &'static str {
        "chromium"
    }

    async fn navigate(&mut self, url: &str) -> E2eResult<()> {
        self.goto(url).await?;
        // storage is per origin, so clear it once the page is there and load again
        self.eval::<bool>(RESET_STORAGE_SCRIPT.to_string()).await?;
        self.goto(url).await?;
        tracing::debug!(url, "navigated with cleared storage");
        Ok(())
    }

    async fn reload(&mut self) -> E2eResult<()> {
        self.page.reload().await.map_err(|e| E2eError::PageError {
            message: e.to_string(),
        })?;
        Ok(())
    }

    async fn observe(&mut self, locator: &Locator) -> E2eResult<Observation> {
        self.eval(observe_script(locator)).await
    }

    async fn type_text(&mut self, locator: &Locator, text: &str) -> E2eResult<()> {
        let element = self.element(locator).await?;
        element.focus().await.map_err(|e| input_error(locator, &e))?;
        element
            .type_str(text)
            .await
            .map_err(|e| input_error(locator, &e))?;
        Ok(())
    }

    async fn press_key(&mut self, locator: &Locator, key: Key) -> E2eResult<()> {
        let element = self.element(locator).await?;
        element.focus().await.map_err(|e| input_error(locator, &e))?;
        element
            .press_key(key.name())
            .await
            .map_err(|e| input_error(locator, &e))?;
        Ok(())
    }

    async fn click(&mut self, locator: &Locator) -> E2eResult<()> {
        let element = self.element(locator).await?;
        element.click().await.map_err(|e| input_error(locator, &e))?;
        Ok(())
    }

    async fn double_click(&mut self, locator: &Locator) -> E2eResult<()> {
        self.with_first(
            locator,
            "el.dispatchEvent(new MouseEvent('dblclick', { bubbles: true, cancelable: true, view: window }));",
        )
        .await
    }

    async fn clear(&mut self, locator: &Locator) -> E2eResult<()> {
        // native setter so React-controlled inputs see the change
        self.with_first(
            locator,
            "el.focus(); \
             const proto = Object.getPrototypeOf(el); \
             const desc = Object.getOwnPropertyDescriptor(proto, 'value'); \
             if (!desc || !desc.set) return false; \
             desc.set.call(el, ''); \
             el.dispatchEvent(new Event('input', { bubbles: true }));",
        )
        .await
    }

    async fn blur_active(&mut self) -> E2eResult<()> {
        self.eval::<bool>(
            "(() => { const el = document.activeElement; if (el && el !== document.body) el.blur(); return true; })()"
                .to_string(),
        )
        .await?;
        Ok(())
    }

    async fn close(&mut self) -> E2eResult<()> {
        self.browser
            .close()
            .await
            .map_err(|e| E2eError::BrowserLaunchError {
                message: e.to_string(),
            })?;
        self.handler.abort();
        tracing::info!("chromium closed");
        Ok(())
    }
}
