use std::fmt::{self, Display};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::typedid::{TypedId, TypedIdMarker};
use crate::utils::round2;
use crate::violations::{Field, Violation};

pub mod db;
pub mod endpoints;
pub mod filter;
pub mod manager;
pub mod pagination;
pub mod summary;
pub use endpoints::*;

pub const MAX_CAMPAIGN_NAME_LENGTH: usize = 100;

/// Upper bound on clicks, impressions and conversions so that totals over
/// millions of campaigns still fit in an `i64`.
pub const MAX_CAMPAIGN_COUNTER: i64 = 1_000_000_000_000;

pub type CampaignId = TypedId<Campaign>;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    #[serde(rename = "_id")]
    pub id: CampaignId,
    pub campaign_name: String,
    pub channel: Channel,
    pub budget: f64,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub end_date: DateTime<Utc>,
    pub clicks: i64,
    pub impressions: i64,
    pub conversions: i64,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl TypedIdMarker for Campaign {
    fn tag() -> &'static str {
        "CMP"
    }
}

impl Campaign {
    pub fn ctr(&self) -> f64 {
        click_through_rate(self.clicks, self.impressions)
    }

    pub fn cpc(&self) -> f64 {
        cost_per_click(self.budget, self.clicks)
    }

    pub fn roi(&self) -> f64 {
        return_on_investment(self.conversions, self.budget)
    }

    /// Checks every field constraint plus the start/end ordering, reporting
    /// all broken constraints at once.
    pub fn validate(&self) -> Result<(), Error> {
        let violations = self.violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(Error::CampaignViolatesConstraints { violations })
        }
    }

    pub fn violations(&self) -> Vec<Violation> {
        let mut violations = vec![];

        let name_length = self.campaign_name.chars().count();
        if name_length == 0 {
            violations.push(Violation::FieldIsRequired {
                field: Field::CampaignName,
            });
        } else if name_length > MAX_CAMPAIGN_NAME_LENGTH {
            violations.push(Violation::CampaignNameTooLong {
                maximum_length: MAX_CAMPAIGN_NAME_LENGTH,
                current_length: name_length,
            });
        }

        if !self.budget.is_finite() {
            violations.push(Violation::BudgetIsNotFinite);
        } else if self.budget < 0.0 {
            violations.push(Violation::BudgetIsNegative {
                budget: self.budget,
            });
        }

        for (field, value) in [
            (Field::Clicks, self.clicks),
            (Field::Impressions, self.impressions),
            (Field::Conversions, self.conversions),
        ] {
            if value < 0 {
                violations.push(Violation::CounterIsNegative { field, value });
            } else if value > MAX_CAMPAIGN_COUNTER {
                violations.push(Violation::CounterTooLarge {
                    field,
                    maximum: MAX_CAMPAIGN_COUNTER,
                    value,
                });
            }
        }

        if self.end_date <= self.start_date {
            violations.push(Violation::EndDateNotAfterStartDate {
                start_date: self.start_date,
                end_date: self.end_date,
            });
        }

        violations
    }
}

/// Percentage of impressions that became clicks; 0 without impressions.
pub fn click_through_rate(clicks: i64, impressions: i64) -> f64 {
    round2(raw_click_through_rate(clicks, impressions))
}

/// Budget spent per click; 0 without clicks.
pub fn cost_per_click(budget: f64, clicks: i64) -> f64 {
    round2(raw_cost_per_click(budget, clicks))
}

/// Treats `conversions * 100` as revenue against the budget; 0 without budget.
pub fn return_on_investment(conversions: i64, budget: f64) -> f64 {
    if budget == 0.0 {
        return 0.0;
    }

    round2((conversions as f64 * 100.0 - budget) / budget * 100.0)
}

pub(crate) fn raw_click_through_rate(clicks: i64, impressions: i64) -> f64 {
    if impressions == 0 {
        return 0.0;
    }

    clicks as f64 / impressions as f64 * 100.0
}

pub(crate) fn raw_cost_per_click(budget: f64, clicks: i64) -> f64 {
    if clicks == 0 {
        return 0.0;
    }

    budget / clicks as f64
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Channel {
    #[serde(rename = "Google Ads", alias = "GoogleAds")]
    GoogleAds,
    Facebook,
    Instagram,
    LinkedIn,
    Twitter,
    Email,
    Display,
    Other,
}

impl Channel {
    pub const ALL: [Channel; 8] = [
        Channel::GoogleAds,
        Channel::Facebook,
        Channel::Instagram,
        Channel::LinkedIn,
        Channel::Twitter,
        Channel::Email,
        Channel::Display,
        Channel::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::GoogleAds => "Google Ads",
            Channel::Facebook => "Facebook",
            Channel::Instagram => "Instagram",
            Channel::LinkedIn => "LinkedIn",
            Channel::Twitter => "Twitter",
            Channel::Email => "Email",
            Channel::Display => "Display",
            Channel::Other => "Other",
        }
    }
}

impl Default for Channel {
    fn default() -> Channel {
        Channel::Other
    }
}

impl Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UnknownChannel;

impl Display for UnknownChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown channel")
    }
}

impl FromStr for Channel {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Channel, UnknownChannel> {
        if s == "GoogleAds" {
            return Ok(Channel::GoogleAds);
        }

        Channel::ALL
            .iter()
            .copied()
            .find(|channel| channel.as_str() == s)
            .ok_or(UnknownChannel)
    }
}

impl From<Channel> for mongodb::bson::Bson {
    fn from(channel: Channel) -> mongodb::bson::Bson {
        channel.as_str().into()
    }
}
