use crate::errors::{Result, VerifyError};
use crate::types::BrowserConfig;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

const POLL_INTERVAL_MS: u64 = 100;

/// Owns a headless Chrome process and a single tab for the lifetime of one
/// verification run. Dropping the session kills the Chrome process, so the
/// browser is released on every exit path, including early returns on error.
pub struct BrowserSession {
    _browser: Browser,
    tab: Arc<Tab>,
}

impl BrowserSession {
    pub async fn new(config: BrowserConfig) -> Result<Self> {
        // Argument strings must outlive the OsStr slice handed to the builder
        let window_size_arg = format!(
            "--window-size={},{}",
            config.viewport.width, config.viewport.height
        );
        let user_agent_arg = config
            .user_agent
            .as_ref()
            .map(|ua| format!("--user-agent={}", ua));

        let mut args = vec![
            OsStr::new("--no-sandbox"),
            OsStr::new("--disable-dev-shm-usage"),
            OsStr::new(&window_size_arg),
        ];
        if let Some(ref ua_arg) = user_agent_arg {
            args.push(OsStr::new(ua_arg));
        }

        let launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .args(args)
            .build()
            .map_err(|e| VerifyError::LaunchFailed(e.to_string()))?;

        let browser =
            Browser::new(launch_options).map_err(|e| VerifyError::LaunchFailed(e.to_string()))?;

        let tab = browser
            .new_tab()
            .map_err(|e| VerifyError::LaunchFailed(e.to_string()))?;

        Ok(Self {
            _browser: browser,
            tab,
        })
    }

    pub async fn navigate(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| VerifyError::NavigationFailed(e.to_string()))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| VerifyError::NavigationFailed(e.to_string()))?;

        Ok(())
    }

    /// Rendered text of the first element matching `css_selector`, trimmed of
    /// layout whitespace. `None` if the selector matches nothing.
    pub async fn element_text(&self, css_selector: &str) -> Result<Option<String>> {
        let js_code = format!(
            r#"
            (function() {{
                const element = document.querySelector('{}');
                if (element) {{
                    return (element.textContent || '').trim();
                }}
                return null;
            }})()
        "#,
            js_escape(css_selector)
        );

        let result = self
            .tab
            .evaluate(&js_code, false)
            .map_err(|e| VerifyError::JavaScriptFailed(e.to_string()))?;

        Ok(result.value.and_then(|v| v.as_str().map(|s| s.to_string())))
    }

    /// Clicks the first element matching `css_selector` whose rendered text
    /// contains `text`. Zero matches is an error, not a no-op.
    pub async fn click_with_text(&self, css_selector: &str, text: &str) -> Result<()> {
        let js_code = format!(
            r#"
            (function() {{
                const candidates = document.querySelectorAll('{}');
                for (const element of candidates) {{
                    if ((element.textContent || '').includes('{}')) {{
                        element.click();
                        return true;
                    }}
                }}
                return false;
            }})()
        "#,
            js_escape(css_selector),
            js_escape(text)
        );

        let result = self
            .tab
            .evaluate(&js_code, false)
            .map_err(|e| VerifyError::JavaScriptFailed(e.to_string()))?;

        if let Some(value) = result.value {
            if value.as_bool() == Some(true) {
                return Ok(());
            }
        }

        Err(VerifyError::ElementNotFound(format!(
            "no '{}' element with text containing '{}'",
            css_selector, text
        )))
    }

    /// Polls the DOM until the element matching `css_selector` reads exactly
    /// `expected`, or the wait budget elapses.
    pub async fn wait_for_text(
        &self,
        css_selector: &str,
        expected: &str,
        timeout_ms: u64,
    ) -> Result<()> {
        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(timeout_ms);

        while start.elapsed() < timeout {
            if let Some(text) = self.element_text(css_selector).await? {
                if text == expected {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
        }

        Err(VerifyError::WaitTimeout {
            timeout_ms,
            condition: format!("'{}' to read {:?}", css_selector, expected),
        })
    }

    pub async fn capture_screenshot(&self) -> Result<Vec<u8>> {
        self.tab
            .capture_screenshot(
                headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption::Png,
                None,
                None,
                true,
            )
            .map_err(|e| VerifyError::JavaScriptFailed(e.to_string()))
    }

    /// Captures a full-page PNG and writes it to `path`, overwriting any
    /// prior file and creating parent directories as needed.
    pub async fn save_screenshot(&self, path: &Path) -> Result<()> {
        let bytes = self.capture_screenshot().await?;
        write_png(path, &bytes).await
    }

    /// Shuts the browser down. Dropping the session has the same effect; this
    /// exists so the release point reads explicitly in the driver script.
    pub fn close(self) {}
}

pub(crate) async fn write_png(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

fn js_escape(input: &str) -> String {
    input.replace('\\', "\\\\").replace('\'', "\\'")
}
