//! Build and deploy the frontend to vercel, netlify, or github-pages.

use anyhow::Result;
use shipway_core::TargetKind;

#[tokio::main]
async fn main() -> Result<()> {
    shipway_cli::run(TargetKind::Frontend).await
}
