// Application state module
// Read-only state shared by every connection

use super::types::Config;
use crate::site::{PageRegistry, PageShell, SiteError};

/// Application state
pub struct AppState {
    pub config: Config,
    pub registry: PageRegistry,
    pub shell: PageShell,
}

impl AppState {
    /// Build the page allow-list and the page shell from configuration
    pub fn new(config: &Config) -> Result<Self, SiteError> {
        let registry = PageRegistry::from_config(&config.site)?;
        let shell = PageShell::new(&config.site.chrome);

        Ok(Self {
            config: config.clone(),
            registry,
            shell,
        })
    }
}
