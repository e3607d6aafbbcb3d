use tracing::warn;
use tracing_subscriber::fmt::format::FmtSpan;

use campaign_analytics::config::Config;
use campaign_analytics::error::Error;

#[actix_web::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_span_events(FmtSpan::NEW)
        .compact()
        .init();

    for key in &config.ignored {
        warn!("ignoring invalid value for {}, using default", key);
    }

    campaign_analytics::run(config).await
}
