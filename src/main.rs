use clap::Parser;
use gss_dashboard::app;
use gss_dashboard::config::Config;
use gss_dashboard::context::DashboardContext;

/// Main entry point for the dashboard server
///
/// Loads the survey once, derives the summary views, then serves the page
/// until interrupted. A dataset that cannot be loaded stops startup.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    let dataset = config.load_dataset().await?;
    let ctx = DashboardContext::new(dataset);

    app::run(&config, ctx).await
}
