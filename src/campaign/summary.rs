use mongodb::bson::{self, Document};
use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::round2;

use super::filter::CampaignFilter;
use super::{raw_click_through_rate, raw_cost_per_click, Campaign};

/// Totals and averages over every campaign matching a filter. Zero-valued
/// when nothing matches.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSummary {
    #[serde(deserialize_with = "deserialize_total")]
    pub total_campaigns: i64,
    pub total_budget: f64,
    #[serde(deserialize_with = "deserialize_total")]
    pub total_clicks: i64,
    #[serde(deserialize_with = "deserialize_total")]
    pub total_impressions: i64,
    #[serde(deserialize_with = "deserialize_total")]
    pub total_conversions: i64,
    #[serde(rename = "avgCTR")]
    pub avg_ctr: f64,
    #[serde(rename = "avgCPC")]
    pub avg_cpc: f64,
}

impl CampaignSummary {
    /// Averages are kept exact through the reduction and rounded to two
    /// places only here, at the end.
    pub fn rounded(self) -> CampaignSummary {
        CampaignSummary {
            avg_ctr: round2(self.avg_ctr),
            avg_cpc: round2(self.avg_cpc),
            ..self
        }
    }
}

// mongodb's $sum widens to a double once an integer total overflows
fn deserialize_total<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Total {
        Integer(i64),
        Float(f64),
    }

    match Total::deserialize(deserializer)? {
        Total::Integer(total) => Ok(total),
        // float to int casts saturate
        Total::Float(total) => Ok(total as i64),
    }
}

/// Reduces a full batch of campaigns in one pass.
///
/// Each campaign contributes its own ctr and cpc to the averages, including a
/// 0 when it has no impressions or clicks, so the result does not depend on
/// iteration order.
pub fn summarize<'a, I>(campaigns: I) -> CampaignSummary
where
    I: IntoIterator<Item = &'a Campaign>,
{
    let mut summary = CampaignSummary::default();
    let mut ctr_sum = 0.0;
    let mut cpc_sum = 0.0;

    for campaign in campaigns {
        summary.total_campaigns += 1;
        summary.total_budget += campaign.budget;
        summary.total_clicks = summary.total_clicks.saturating_add(campaign.clicks);
        summary.total_impressions = summary.total_impressions.saturating_add(campaign.impressions);
        summary.total_conversions = summary.total_conversions.saturating_add(campaign.conversions);
        ctr_sum += raw_click_through_rate(campaign.clicks, campaign.impressions);
        cpc_sum += raw_cost_per_click(campaign.budget, campaign.clicks);
    }

    if summary.total_campaigns > 0 {
        summary.avg_ctr = ctr_sum / summary.total_campaigns as f64;
        summary.avg_cpc = cpc_sum / summary.total_campaigns as f64;
    }

    summary.rounded()
}

/// The same reduction as [`summarize`], as a mongodb aggregation pipeline.
pub fn pipeline(filter: &CampaignFilter) -> Vec<Document> {
    vec![
        bson::doc! { "$match": filter.to_document() },
        bson::doc! {
            "$group": {
                "_id": bson::Bson::Null,
                "totalCampaigns": { "$sum": 1_i64 },
                "totalBudget": { "$sum": "$budget" },
                "totalClicks": { "$sum": "$clicks" },
                "totalImpressions": { "$sum": "$impressions" },
                "totalConversions": { "$sum": "$conversions" },
                "avgCTR": {
                    "$avg": {
                        "$cond": [
                            { "$eq": ["$impressions", 0_i64] },
                            0.0,
                            { "$multiply": [{ "$divide": ["$clicks", "$impressions"] }, 100.0] }
                        ]
                    }
                },
                "avgCPC": {
                    "$avg": {
                        "$cond": [
                            { "$eq": ["$clicks", 0_i64] },
                            0.0,
                            { "$divide": ["$budget", "$clicks"] }
                        ]
                    }
                }
            }
        },
        bson::doc! { "$project": { "_id": 0 } },
    ]
}
