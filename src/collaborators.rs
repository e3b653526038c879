/// Components the tray hands menu selections to
use std::sync::Arc;

/// Opens the configuration UI
pub trait BrowserLauncher {
    fn install(&self);
}

/// Opens a URI in the user's default browser
pub trait UriOpener: Send + Sync {
    fn open(&self, uri: &str);
}

/// Builds a fresh launcher for every Configure click
pub type LauncherFactory = Arc<dyn Fn() -> Box<dyn BrowserLauncher> + Send + Sync>;

#[derive(Clone)]
pub struct Collaborators {
    pub launcher: LauncherFactory,
    pub uri_opener: Arc<dyn UriOpener>,
}

impl Collaborators {
    pub fn new(launcher: LauncherFactory, uri_opener: Arc<dyn UriOpener>) -> Self {
        Self {
            launcher,
            uri_opener,
        }
    }

    /// Default desktop wiring: Configure opens `configure_url` in the browser
    pub fn desktop(configure_url: &str) -> Self {
        let url = configure_url.to_string();
        Self::new(
            Arc::new(move || Box::new(ConfigPageLauncher::new(url.clone())) as Box<dyn BrowserLauncher>),
            Arc::new(SystemUriOpener),
        )
    }
}

/// `UriOpener` backed by the OS default handler
pub struct SystemUriOpener;

impl UriOpener for SystemUriOpener {
    fn open(&self, uri: &str) {
        tracing::info!("Opening {}", uri);
        if let Err(e) = open::that(uri) {
            tracing::error!("Failed to open {}: {}", uri, e);
        }
    }
}

/// Shows the local configuration page in the default browser
pub struct ConfigPageLauncher {
    url: String,
}

impl ConfigPageLauncher {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl BrowserLauncher for ConfigPageLauncher {
    fn install(&self) {
        tracing::info!("Launching configuration page at {}", self.url);
        if let Err(e) = open::that(&self.url) {
            tracing::error!("Failed to launch configuration page: {}", e);
        }
    }
}
