//! Status command implementation

use anyhow::Context;
use davsync_core::{SyncEngine, SyncReporter, WebDavStore};

use super::common::{SyncOptions, reported};

pub struct Status;

impl Status {
    pub async fn execute(options: &SyncOptions<'_>) -> anyhow::Result<()> {
        let settings = options.settings()?;

        let store =
            WebDavStore::from_settings(&settings).context("Failed to create WebDAV client")?;
        let engine = SyncEngine::new(settings).context("Failed to initialize sync engine")?;

        let plan = engine
            .plan(&store)
            .await
            .map_err(|e| reported(e, "Planning"))?;

        print!("{}", SyncReporter::describe_plan(&plan));

        Ok(())
    }
}
