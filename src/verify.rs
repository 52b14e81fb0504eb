use crate::browser::BrowserSession;
use crate::errors::{Result, VerifyError};
use std::path::Path;
use tracing::info;

pub const TARGET_URL: &str = "http://localhost:8080/page/test-page";
pub const COUNT_SELECTOR: &str = ".vote-count";
pub const UPVOTE_SELECTOR: &str = ".vote-btn";
pub const UPVOTE_GLYPH: &str = "▲";
pub const INITIAL_COUNT: &str = "0";
pub const UPDATED_COUNT: &str = "1";
pub const WAIT_BUDGET_MS: u64 = 30_000;
pub const SCREENSHOT_PATH: &str = "jules-scratch/verification/verification.png";

/// The fixed upvote scenario: assert the count starts at 0, click the upvote
/// control, wait for the count to become 1, and capture a screenshot.
///
/// Every failure propagates to the caller; nothing is retried. The caller
/// owns the session and is responsible for closing it afterwards.
pub async fn run(browser: &BrowserSession) -> Result<()> {
    info!("Navigating to {}", TARGET_URL);
    browser.navigate(TARGET_URL).await?;
    info!("Page loaded");

    info!("Checking initial vote count");
    let count = read_count(browser).await?;
    info!("Initial vote count: {}", count);
    assert_text("initial vote count", &count, INITIAL_COUNT)?;

    info!("Clicking upvote button");
    browser.click_with_text(UPVOTE_SELECTOR, UPVOTE_GLYPH).await?;

    info!("Waiting for vote count to update");
    browser
        .wait_for_text(COUNT_SELECTOR, UPDATED_COUNT, WAIT_BUDGET_MS)
        .await?;

    let updated = read_count(browser).await?;
    info!("Updated vote count: {}", updated);
    assert_text("updated vote count", &updated, UPDATED_COUNT)?;

    info!("Saving screenshot to {}", SCREENSHOT_PATH);
    browser.save_screenshot(Path::new(SCREENSHOT_PATH)).await?;

    Ok(())
}

async fn read_count(browser: &BrowserSession) -> Result<String> {
    browser
        .element_text(COUNT_SELECTOR)
        .await?
        .ok_or_else(|| VerifyError::ElementNotFound(COUNT_SELECTOR.to_string()))
}

fn assert_text(step: &str, actual: &str, expected: &str) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(VerifyError::AssertionFailed {
            step: step.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_url_is_well_formed() {
        let url = url::Url::parse(TARGET_URL).unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.host_str(), Some("localhost"));
        assert_eq!(url.port(), Some(8080));
        assert_eq!(url.path(), "/page/test-page");
    }

    #[test]
    fn selectors_are_class_selectors() {
        assert!(COUNT_SELECTOR.starts_with('.'));
        assert!(UPVOTE_SELECTOR.starts_with('.'));
    }

    #[test]
    fn assert_text_accepts_exact_match() {
        assert!(assert_text("initial vote count", "0", INITIAL_COUNT).is_ok());
    }

    #[test]
    fn assert_text_rejects_mismatch() {
        let err = assert_text("updated vote count", "2", UPDATED_COUNT).unwrap_err();
        match err {
            VerifyError::AssertionFailed {
                step,
                expected,
                actual,
            } => {
                assert_eq!(step, "updated vote count");
                assert_eq!(expected, "1");
                assert_eq!(actual, "2");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn screenshot_path_is_fixed_png() {
        let path = Path::new(SCREENSHOT_PATH);
        assert!(path.is_relative());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
    }
}
