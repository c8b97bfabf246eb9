use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotParams;
use chromiumoxide::page::Page;
use futures::StreamExt;
use tempfile::TempDir;

use super::launcher;
use crate::config::Config;
use crate::error::{HarnessError, Result};

/// One isolated browser instance plus the single page a scenario runs on.
/// A scenario owns its session exclusively; `close` releases everything.
pub struct Session {
    browser: Browser,
    handler_task: tokio::task::JoinHandle<()>,
    page: Page,
    // Isolated profile; removed from disk when the session drops.
    user_data: TempDir,
}

impl Session {
    /// Launch a browser and open the page the scenario will drive.
    pub async fn launch(config: &Config) -> Result<Self> {
        let user_data = TempDir::new()?;

        let mut builder = BrowserConfig::builder()
            .user_data_dir(user_data.path())
            .window_size(config.window_width, config.window_height);

        if config.headless {
            builder = builder.arg("--headless=new");
        }
        for arg in launcher::launch_args(config) {
            builder = builder.arg(arg);
        }
        if let Some(path) = launcher::find_chrome_binary() {
            builder = builder.chrome_executable(path);
        }

        let browser_config = builder.build().map_err(HarnessError::Launch)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| HarnessError::Launch(e.to_string()))?;

        // Drain CDP events for the lifetime of the session.
        let handler_task = tokio::spawn(async move {
            while handler.next().await.is_some() {}
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| HarnessError::Launch(format!("Failed to open initial page: {}", e)))?;

        tracing::info!(headless = config.headless, "Browser session started");

        Ok(Self {
            browser,
            handler_task,
            page,
            user_data,
        })
    }

    /// The single page this session's scenario drives.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Filesystem location of this session's isolated profile. Gone once
    /// the session is released.
    pub fn profile_path(&self) -> &std::path::Path {
        self.user_data.path()
    }

    /// Capture a full-page PNG of the current page state.
    pub async fn screenshot_png(&self) -> Result<Vec<u8>> {
        let bytes = self
            .page
            .screenshot(CaptureScreenshotParams::builder().build())
            .await?;
        Ok(bytes)
    }

    /// Tear down page, browser process, and event handler, in that order.
    /// Cleanup is best-effort: failures are logged, never raised.
    pub async fn close(mut self) {
        if let Err(e) = self.page.clone().close().await {
            tracing::warn!("Failed to close page: {}", e);
        }
        if let Err(e) = self.browser.close().await {
            tracing::warn!("Failed to close browser: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            tracing::warn!("Failed to reap browser process: {}", e);
        }
        self.handler_task.abort();
        tracing::info!("Browser session released");
    }
}
