//! Deploy command implementation

use anyhow::Context;
use davsync_core::{ProgressCallback, SyncEngine, SyncReporter, WebDavStore};

use super::common::{SyncOptions, reported};

pub struct Deploy;

impl Deploy {
    pub async fn execute(options: &SyncOptions<'_>) -> anyhow::Result<()> {
        let settings = options.settings()?;

        let store =
            WebDavStore::from_settings(&settings).context("Failed to create WebDAV client")?;
        let engine = SyncEngine::new(settings).context("Failed to initialize sync engine")?;

        let narrate: ProgressCallback = Box::new(|event| {
            if let Some(line) = SyncReporter::narrate(event) {
                println!("{line}");
            }
        });

        let result = engine
            .sync_with_progress(&store, Some(narrate))
            .await
            .map_err(|e| reported(e, "Deployment"))?;

        println!("{}", SyncReporter::generate_summary(&result));

        Ok(())
    }
}
