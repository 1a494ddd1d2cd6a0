use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    moleterm::cli::run_cli().await
}
