use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::options::FindOptions;
use mongodb::{bson, Database};

use crate::database::MongoCampaignStore;
use crate::error::Error;

use super::filter::CampaignFilter;
use super::pagination::Pagination;
use super::summary::{self, CampaignSummary};
use super::{Campaign, CampaignId};

pub const CAMPAIGNS: &str = "campaigns";

pub async fn initialize(db: &Database) -> Result<(), Error> {
    db.run_command(
        bson::doc! {
            "createIndexes": CAMPAIGNS,
            "indexes": [
                { "key": { "channel": 1 }, "name": "by_channel" },
                { "key": { "startDate": 1, "endDate": 1 }, "name": "by_schedule" },
                { "key": { "createdAt": -1 }, "name": "by_created_at" }
            ]
        },
        None,
    )
    .await?;

    Ok(())
}

#[async_trait]
pub trait CampaignStore: Send + Sync {
    async fn insert_campaign(&self, campaign: &Campaign) -> Result<(), Error>;

    async fn fetch_campaign_by_id(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error>;

    /// Newest first; ties broken by id so pages are stable.
    async fn fetch_campaigns(
        &self,
        filter: &CampaignFilter,
        pagination: &Pagination,
    ) -> Result<Vec<Campaign>, Error>;

    async fn count_campaigns(&self, filter: &CampaignFilter) -> Result<u64, Error>;

    /// Returns `false` if no campaign with that id exists.
    async fn update_campaign(&self, campaign: &Campaign) -> Result<bool, Error>;

    /// Returns `false` if no campaign with that id exists.
    async fn delete_campaign_by_id(&self, campaign_id: CampaignId) -> Result<bool, Error>;

    async fn summarize_campaigns(&self, filter: &CampaignFilter)
        -> Result<CampaignSummary, Error>;
}

#[async_trait]
impl CampaignStore for MongoCampaignStore {
    #[tracing::instrument(skip(self))]
    async fn insert_campaign(&self, campaign: &Campaign) -> Result<(), Error> {
        self.insert_one(campaign, None).await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaign_by_id(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error> {
        let campaign: Option<Campaign> = self
            .find_one(bson::doc! { "_id": campaign_id }, None)
            .await?;

        Ok(campaign)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaigns(
        &self,
        filter: &CampaignFilter,
        pagination: &Pagination,
    ) -> Result<Vec<Campaign>, Error> {
        let options = FindOptions::builder()
            .sort(bson::doc! { "createdAt": -1, "_id": -1 })
            .skip(pagination.offset())
            .limit(pagination.count() as i64)
            .build();

        let campaigns: Vec<Campaign> = self
            .find(filter.to_document(), options)
            .await?
            .try_collect()
            .await?;

        Ok(campaigns)
    }

    #[tracing::instrument(skip(self))]
    async fn count_campaigns(&self, filter: &CampaignFilter) -> Result<u64, Error> {
        let total = self.count_documents(filter.to_document(), None).await?;

        Ok(total)
    }

    #[tracing::instrument(skip(self))]
    async fn update_campaign(&self, campaign: &Campaign) -> Result<bool, Error> {
        let result = self
            .replace_one(bson::doc! { "_id": campaign.id }, campaign, None)
            .await?;

        Ok(result.matched_count > 0)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_campaign_by_id(&self, campaign_id: CampaignId) -> Result<bool, Error> {
        let result = self
            .delete_one(bson::doc! { "_id": campaign_id }, None)
            .await?;

        Ok(result.deleted_count > 0)
    }

    #[tracing::instrument(skip(self))]
    async fn summarize_campaigns(
        &self,
        filter: &CampaignFilter,
    ) -> Result<CampaignSummary, Error> {
        let groups: Vec<bson::Document> = self
            .aggregate(summary::pipeline(filter), None)
            .await?
            .try_collect()
            .await?;

        let summary = match groups.into_iter().next() {
            Some(group) => bson::from_document::<CampaignSummary>(group)?.rounded(),
            None => CampaignSummary::default(),
        };

        Ok(summary)
    }
}
