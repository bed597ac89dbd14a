use std::env;

use anyhow::Context;
use chrono::Utc;
use lora_desktop::{
    logging,
    version_sync::{self, VersionSyncPaths},
};

fn main() -> anyhow::Result<()> {
    logging::init_tracing();

    let project_root = env::current_dir().context("failed to resolve project root")?;
    let paths = VersionSyncPaths::for_project_root(&project_root);
    let info = version_sync::sync_versions(&paths, Utc::now(), |line| println!("{line}"))
        .with_context(|| format!("version sync failed in {}", project_root.display()))?;

    tracing::debug!(version = %info.version, last_sync = %info.last_sync, "version sync finished");
    Ok(())
}
