//! Build and deploy the backend to render, railway, or heroku.

use anyhow::Result;
use shipway_core::TargetKind;

#[tokio::main]
async fn main() -> Result<()> {
    shipway_cli::run(TargetKind::Backend).await
}
