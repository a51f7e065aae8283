use anyhow::Result;
use recycle::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
