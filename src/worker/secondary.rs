//! Optional secondary tool installed after the framework files

use std::path::Path;
use std::thread;
use std::time::Duration;

use crate::error::Result;

/// Installs the companion tool; only success or failure is observable
pub trait SecondaryToolInstaller: Send + Sync {
    fn name(&self) -> &str;

    fn install(&self, install_path: &Path) -> Result<()>;
}

/// Stand-in for the PicoFlasher download: waits, then reports success
#[derive(Debug, Clone)]
pub struct PicoFlasherPlaceholder {
    delay: Duration,
}

impl PicoFlasherPlaceholder {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl SecondaryToolInstaller for PicoFlasherPlaceholder {
    fn name(&self) -> &str {
        "PicoFlasher"
    }

    fn install(&self, install_path: &Path) -> Result<()> {
        // TODO: fetch and verify the PicoFlasher release once its download location is published
        tracing::debug!(path = %install_path.display(), "PicoFlasher placeholder step");
        thread::sleep(self.delay);
        Ok(())
    }
}
