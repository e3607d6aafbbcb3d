use async_trait::async_trait;
use mongodb::Collection;

use crate::campaign::db::{self as campaign_db, CampaignStore, CAMPAIGNS};
use crate::campaign::Campaign;
use crate::error::Error;

pub mod memory;

pub use memory::MemoryDatabase;

pub type MongoCampaignStore = Collection<Campaign>;

#[async_trait]
pub trait Database: Send + Sync {
    fn campaigns(&self) -> &dyn CampaignStore;

    async fn drop(&self) -> Result<(), Error>;
}

#[derive(Debug, Clone)]
pub struct MongoDatabase {
    campaigns: MongoCampaignStore,
    db: mongodb::Database,
}

impl MongoDatabase {
    pub async fn initialize(db: mongodb::Database) -> Result<MongoDatabase, Error> {
        campaign_db::initialize(&db).await?;

        Ok(MongoDatabase {
            campaigns: db.collection(CAMPAIGNS),
            db,
        })
    }
}

#[async_trait]
impl Database for MongoDatabase {
    fn campaigns(&self) -> &dyn CampaignStore {
        &self.campaigns
    }

    async fn drop(&self) -> Result<(), Error> {
        self.db.drop(None).await?;
        campaign_db::initialize(&self.db).await?;
        Ok(())
    }
}
