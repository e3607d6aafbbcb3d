use std::sync::Arc;

use actix_web::web::{self, Data, JsonConfig, PathConfig, QueryConfig, ServiceConfig};
use actix_web::{App, HttpServer, ResponseError};
use mongodb::{bson, Client};
use tracing::info;
use tracing_actix_web::TracingLogger;

pub mod campaign;
pub mod config;
pub mod database;
pub mod error;
pub mod seed;
pub mod typedid;
pub mod utils;
pub mod violations;

use crate::config::{Config, Storage};
use crate::database::{Database, MemoryDatabase, MongoDatabase};
use crate::error::Error;

/// Registers the campaign routes and the custom extractor error formats.
///
/// The database must be registered separately as `Data<dyn Database>`.
pub fn configure(cfg: &mut ServiceConfig) {
    cfg.app_data(JsonConfig::default().error_handler(|err, _req| {
        // format json errors with custom format
        Error::InvalidJson(err).into()
    }))
    .app_data(PathConfig::default().error_handler(|err, _req| {
        // format path errors with custom format
        Error::InvalidPath(err).into()
    }))
    .app_data(QueryConfig::default().error_handler(|err, _req| {
        // format query errors with custom format
        Error::InvalidQuery(err).into()
    }))
    .service(campaign::endpoints::get_campaigns)
    // must precede the `{campaign_id}` routes
    .service(campaign::endpoints::get_campaign_summary)
    .service(campaign::endpoints::get_campaign_by_id)
    .service(campaign::endpoints::create_campaign)
    .service(campaign::endpoints::update_campaign)
    .service(campaign::endpoints::delete_campaign)
    .default_service(web::to(|| async { Error::PathDoesNotExist.error_response() }));
}

pub async fn connect(config: &Config) -> Result<Arc<dyn Database>, Error> {
    match config.storage {
        Storage::MongoDb => {
            info!("connecting to db: {}", config.mongodb_uri);
            let db = Client::with_uri_str(&config.mongodb_uri)
                .await?
                .database(&config.database_name);

            // ping the database to ensure connection is established
            db.run_command(bson::doc! { "ping": 1 }, None).await?;

            Ok(Arc::new(MongoDatabase::initialize(db).await?))
        }
        Storage::Memory => {
            info!("using in-memory storage");
            Ok(Arc::new(MemoryDatabase::new()))
        }
    }
}

pub async fn run(config: Config) -> Result<(), Error> {
    let db = connect(&config).await?;

    if config.seed_database {
        seed::seed(&*db).await?;
    }

    let db = Data::from(db);

    info!("listening on {}", config.bind_address);
    HttpServer::new(move || {
        App::new()
            .app_data(db.clone())
            .wrap(TracingLogger::default())
            .configure(configure)
    })
    .bind(config.bind_address.as_str())?
    .run()
    .await?;

    Ok(())
}
