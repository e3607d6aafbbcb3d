use chrono::Utc;

use crate::database::Database;
use crate::error::Error;
use crate::violations::{Field, Violation};

use super::filter::CampaignFilter;
use super::pagination::Pagination;
use super::summary::CampaignSummary;
use super::{Campaign, CampaignId, CreateCampaignBody, UpdateCampaignBody};

#[derive(Clone, Debug)]
pub struct CampaignPage {
    pub campaigns: Vec<Campaign>,
    pub total: u64,
}

#[tracing::instrument(skip(db))]
pub async fn create_campaign(
    db: &dyn Database,
    body: CreateCampaignBody,
) -> Result<Campaign, Error> {
    let now = Utc::now();

    let mut missing = vec![];
    if body.budget.is_none() {
        missing.push(Field::Budget);
    }
    if body.start_date.is_none() {
        missing.push(Field::StartDate);
    }
    if body.end_date.is_none() {
        missing.push(Field::EndDate);
    }

    let start_date = body.start_date.unwrap_or(now);
    let campaign = Campaign {
        id: CampaignId::new(),
        campaign_name: body
            .campaign_name
            .map(|name| name.trim().to_string())
            .unwrap_or_default(),
        channel: body.channel.unwrap_or_default(),
        budget: body.budget.unwrap_or(0.0),
        start_date,
        end_date: body.end_date.unwrap_or(start_date),
        clicks: body.clicks.unwrap_or(0),
        impressions: body.impressions.unwrap_or(0),
        conversions: body.conversions.unwrap_or(0),
        created_at: now,
        updated_at: now,
    };

    // placeholder values for missing fields must not produce violations of their own
    let dates_missing = missing.contains(&Field::StartDate) || missing.contains(&Field::EndDate);
    let mut violations: Vec<Violation> = missing
        .iter()
        .map(|field| Violation::FieldIsRequired { field: *field })
        .collect();
    violations.extend(campaign.violations().into_iter().filter(|violation| {
        match violation {
            Violation::EndDateNotAfterStartDate { .. } => !dates_missing,
            violation => !missing.contains(&violation.field()),
        }
    }));

    if !violations.is_empty() {
        return Err(Error::CampaignViolatesConstraints { violations });
    }

    db.campaigns().insert_campaign(&campaign).await?;

    Ok(campaign)
}

#[tracing::instrument(skip(db))]
pub async fn get_campaigns(
    db: &dyn Database,
    filter: &CampaignFilter,
    pagination: &Pagination,
) -> Result<CampaignPage, Error> {
    let campaigns = db.campaigns().fetch_campaigns(filter, pagination).await?;
    let total = db.campaigns().count_campaigns(filter).await?;

    tracing::debug!(count = campaigns.len(), total, "fetched campaign page");

    Ok(CampaignPage { campaigns, total })
}

#[tracing::instrument(skip(db))]
pub async fn get_campaign_by_id(
    db: &dyn Database,
    campaign_id: CampaignId,
) -> Result<Campaign, Error> {
    let campaign = db
        .campaigns()
        .fetch_campaign_by_id(campaign_id)
        .await?
        .ok_or(Error::CampaignDoesNotExist { campaign_id })?;

    Ok(campaign)
}

/// Applies the given fields over the stored campaign and re-validates the
/// whole record before writing it back.
#[tracing::instrument(skip(db))]
pub async fn update_campaign(
    db: &dyn Database,
    campaign_id: CampaignId,
    body: UpdateCampaignBody,
) -> Result<Campaign, Error> {
    let mut campaign = get_campaign_by_id(db, campaign_id).await?;

    if let Some(campaign_name) = body.campaign_name {
        campaign.campaign_name = campaign_name.trim().to_string();
    }
    if let Some(channel) = body.channel {
        campaign.channel = channel;
    }
    if let Some(budget) = body.budget {
        campaign.budget = budget;
    }
    if let Some(start_date) = body.start_date {
        campaign.start_date = start_date;
    }
    if let Some(end_date) = body.end_date {
        campaign.end_date = end_date;
    }
    if let Some(clicks) = body.clicks {
        campaign.clicks = clicks;
    }
    if let Some(impressions) = body.impressions {
        campaign.impressions = impressions;
    }
    if let Some(conversions) = body.conversions {
        campaign.conversions = conversions;
    }
    campaign.updated_at = Utc::now();

    campaign.validate()?;

    let updated = db.campaigns().update_campaign(&campaign).await?;
    if !updated {
        return Err(Error::CampaignDoesNotExist { campaign_id });
    }

    Ok(campaign)
}

#[tracing::instrument(skip(db))]
pub async fn delete_campaign(db: &dyn Database, campaign_id: CampaignId) -> Result<(), Error> {
    let deleted = db.campaigns().delete_campaign_by_id(campaign_id).await?;
    if !deleted {
        return Err(Error::CampaignDoesNotExist { campaign_id });
    }

    Ok(())
}

#[tracing::instrument(skip(db))]
pub async fn get_campaign_summary(
    db: &dyn Database,
    filter: &CampaignFilter,
) -> Result<CampaignSummary, Error> {
    let summary = db.campaigns().summarize_campaigns(filter).await?;

    Ok(summary)
}
