use actix_web::web::{Data, Json, Path, Query};
use actix_web::{delete, get, post, put, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Error;
use crate::utils::{deserialize_optional_datetime, deserialize_optional_i64, EmptyBody, SuccessBody};

use super::filter::{deserialize_optional_channel, CampaignFilter};
use super::pagination::Pagination;
use super::summary::CampaignSummary;
use super::{manager, Campaign, CampaignId, Channel};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignBody {
    pub campaign_name: Option<String>,
    pub channel: Option<Channel>,
    pub budget: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub end_date: Option<DateTime<Utc>>,
    pub clicks: Option<i64>,
    pub impressions: Option<i64>,
    pub conversions: Option<i64>,
}

/// Any subset of the campaign's fields; absent or null fields are left as-is.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaignBody {
    pub campaign_name: Option<String>,
    pub channel: Option<Channel>,
    pub budget: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub end_date: Option<DateTime<Utc>>,
    pub clicks: Option<i64>,
    pub impressions: Option<i64>,
    pub conversions: Option<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignBody {
    pub id: CampaignId,
    pub campaign_name: String,
    pub channel: Channel,
    pub budget: f64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub clicks: i64,
    pub impressions: i64,
    pub conversions: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub ctr: f64,
    pub cpc: f64,
    pub roi: f64,
}

impl CampaignBody {
    pub fn render(campaign: Campaign) -> CampaignBody {
        CampaignBody {
            ctr: campaign.ctr(),
            cpc: campaign.cpc(),
            roi: campaign.roi(),
            id: campaign.id,
            campaign_name: campaign.campaign_name,
            channel: campaign.channel,
            budget: campaign.budget,
            start_date: campaign.start_date,
            end_date: campaign.end_date,
            clicks: campaign.clicks,
            impressions: campaign.impressions,
            conversions: campaign.conversions,
            created_at: campaign.created_at,
            updated_at: campaign.updated_at,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCampaignsQuery {
    #[serde(default, deserialize_with = "deserialize_optional_channel")]
    pub channel: Option<Channel>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
}

impl ListCampaignsQuery {
    pub fn filter(&self) -> CampaignFilter {
        CampaignFilter {
            channel: self.channel,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaginationBody {
    pub page: u64,
    pub limit: u64,
    pub pages: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CampaignListBody {
    pub success: bool,
    pub count: usize,
    pub total: u64,
    pub pagination: PaginationBody,
    pub data: Vec<CampaignBody>,
}

#[get("/api/campaigns")]
#[tracing::instrument(skip(db))]
pub async fn get_campaigns(
    db: Data<dyn Database>,
    query: Query<ListCampaignsQuery>,
) -> Result<Json<CampaignListBody>, Error> {
    let query = query.into_inner();
    let filter = query.filter();
    let pagination = Pagination::new(query.page, query.limit)?;

    let page = manager::get_campaigns(&**db, &filter, &pagination).await?;

    let data: Vec<CampaignBody> = page.campaigns.into_iter().map(CampaignBody::render).collect();

    Ok(Json(CampaignListBody {
        success: true,
        count: data.len(),
        total: page.total,
        pagination: PaginationBody {
            page: pagination.page,
            limit: pagination.limit,
            pages: pagination.pages(page.total),
        },
        data,
    }))
}

#[get("/api/campaigns/analytics/summary")]
#[tracing::instrument(skip(db))]
pub async fn get_campaign_summary(
    db: Data<dyn Database>,
    query: Query<CampaignFilter>,
) -> Result<Json<SuccessBody<CampaignSummary>>, Error> {
    let filter = query.into_inner();

    let summary = manager::get_campaign_summary(&**db, &filter).await?;

    Ok(Json(SuccessBody::new(summary)))
}

#[get("/api/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn get_campaign_by_id(
    db: Data<dyn Database>,
    params: Path<CampaignId>,
) -> Result<Json<SuccessBody<CampaignBody>>, Error> {
    let campaign_id = params.into_inner();

    let campaign = manager::get_campaign_by_id(&**db, campaign_id).await?;

    Ok(Json(SuccessBody::new(CampaignBody::render(campaign))))
}

#[post("/api/campaigns")]
#[tracing::instrument(skip(db))]
pub async fn create_campaign(
    db: Data<dyn Database>,
    body: Json<CreateCampaignBody>,
) -> Result<HttpResponse, Error> {
    let body = body.into_inner();

    let campaign = manager::create_campaign(&**db, body).await?;

    Ok(HttpResponse::Created().json(SuccessBody::new(CampaignBody::render(campaign))))
}

#[put("/api/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn update_campaign(
    db: Data<dyn Database>,
    params: Path<CampaignId>,
    body: Json<UpdateCampaignBody>,
) -> Result<Json<SuccessBody<CampaignBody>>, Error> {
    let campaign_id = params.into_inner();
    let body = body.into_inner();

    let campaign = manager::update_campaign(&**db, campaign_id, body).await?;

    Ok(Json(SuccessBody::new(CampaignBody::render(campaign))))
}

#[delete("/api/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn delete_campaign(
    db: Data<dyn Database>,
    params: Path<CampaignId>,
) -> Result<Json<SuccessBody<EmptyBody>>, Error> {
    let campaign_id = params.into_inner();

    manager::delete_campaign(&**db, campaign_id).await?;

    Ok(Json(SuccessBody::new(EmptyBody {})))
}
