use blockscout_service_launcher::launcher::ConfigSettings;
use chain_metrics_server::{run, Settings};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let settings = Settings::build()?;
    run(settings).await
}
