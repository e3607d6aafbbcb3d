//! In-process store used by the HTTP tests and by `STORAGE=memory`.

use std::cmp::Reverse;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::campaign::db::CampaignStore;
use crate::campaign::filter::CampaignFilter;
use crate::campaign::pagination::Pagination;
use crate::campaign::summary::{self, CampaignSummary};
use crate::campaign::{Campaign, CampaignId};
use crate::error::Error;

use super::Database;

#[derive(Debug, Default)]
pub struct MemoryCampaignStore {
    campaigns: DashMap<CampaignId, Campaign>,
}

impl MemoryCampaignStore {
    fn matching(&self, filter: &CampaignFilter) -> Vec<Campaign> {
        self.campaigns
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }
}

#[async_trait]
impl CampaignStore for MemoryCampaignStore {
    #[tracing::instrument(skip(self))]
    async fn insert_campaign(&self, campaign: &Campaign) -> Result<(), Error> {
        self.campaigns.insert(campaign.id, campaign.clone());

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaign_by_id(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error> {
        let campaign = self
            .campaigns
            .get(&campaign_id)
            .map(|entry| entry.value().clone());

        Ok(campaign)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaigns(
        &self,
        filter: &CampaignFilter,
        pagination: &Pagination,
    ) -> Result<Vec<Campaign>, Error> {
        let mut campaigns = self.matching(filter);
        campaigns.sort_by_key(|campaign| Reverse((campaign.created_at, campaign.id)));

        let campaigns = campaigns
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.count() as usize)
            .collect();

        Ok(campaigns)
    }

    #[tracing::instrument(skip(self))]
    async fn count_campaigns(&self, filter: &CampaignFilter) -> Result<u64, Error> {
        let total = self
            .campaigns
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .count();

        Ok(total as u64)
    }

    #[tracing::instrument(skip(self))]
    async fn update_campaign(&self, campaign: &Campaign) -> Result<bool, Error> {
        match self.campaigns.get_mut(&campaign.id) {
            Some(mut entry) => {
                *entry = campaign.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn delete_campaign_by_id(&self, campaign_id: CampaignId) -> Result<bool, Error> {
        Ok(self.campaigns.remove(&campaign_id).is_some())
    }

    #[tracing::instrument(skip(self))]
    async fn summarize_campaigns(
        &self,
        filter: &CampaignFilter,
    ) -> Result<CampaignSummary, Error> {
        let campaigns = self.matching(filter);

        Ok(summary::summarize(&campaigns))
    }
}

#[derive(Debug, Default)]
pub struct MemoryDatabase {
    campaigns: MemoryCampaignStore,
}

impl MemoryDatabase {
    pub fn new() -> MemoryDatabase {
        MemoryDatabase::default()
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    fn campaigns(&self) -> &dyn CampaignStore {
        &self.campaigns
    }

    async fn drop(&self) -> Result<(), Error> {
        self.campaigns.campaigns.clear();
        Ok(())
    }
}
