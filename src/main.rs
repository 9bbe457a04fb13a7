use thresher::app::run;
use thresher::config::Config;
use thresher::error::Result;
use thresher::logging::init;

#[tokio::main]
async fn main() -> Result<()> {
    init();

    let config = Config::from_env()?;

    run(config).await
}
