use clap::Subcommand;

use super::open_coordinator;

#[derive(Subcommand)]
pub enum SyncAction {
    /// Push the current state to the remote store
    Now,
    /// Print sync status as JSON
    Status,
}

pub async fn run(action: SyncAction) -> Result<(), Box<dyn std::error::Error>> {
    let (mut coordinator, _config) = open_coordinator()?;
    let state = coordinator.initialize().await;

    match action {
        SyncAction::Now => {
            coordinator.persist(&state);
            coordinator.flush().await;
            println!("{}", serde_json::to_string_pretty(&coordinator.status())?);
        }
        SyncAction::Status => {
            println!("{}", serde_json::to_string_pretty(&coordinator.status())?);
        }
    }
    coordinator.shutdown();
    Ok(())
}
