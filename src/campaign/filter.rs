use chrono::{DateTime, Utc};
use mongodb::bson::{self, Document};
use serde::{de::Error as _, Deserialize, Deserializer};

use crate::utils::deserialize_optional_datetime;

use super::{Campaign, Channel};

/// Request-level filter shared by listing and the analytics summary.
///
/// The date bounds apply to the campaign's `startDate`, inclusive on
/// whichever side is given.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignFilter {
    #[serde(default, deserialize_with = "deserialize_optional_channel")]
    pub channel: Option<Channel>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub end_date: Option<DateTime<Utc>>,
}

impl CampaignFilter {
    /// Predicate in mongodb query form.
    pub fn to_document(&self) -> Document {
        let mut query = Document::new();

        if let Some(channel) = self.channel {
            query.insert("channel", channel);
        }

        if self.start_date.is_some() || self.end_date.is_some() {
            let mut range = Document::new();
            if let Some(start_date) = self.start_date {
                range.insert("$gte", bson::DateTime::from_chrono(start_date));
            }
            if let Some(end_date) = self.end_date {
                range.insert("$lte", bson::DateTime::from_chrono(end_date));
            }
            query.insert("startDate", range);
        }

        query
    }

    /// The same predicate evaluated in-process.
    pub fn matches(&self, campaign: &Campaign) -> bool {
        if let Some(channel) = self.channel {
            if campaign.channel != channel {
                return false;
            }
        }

        if let Some(start_date) = self.start_date {
            if campaign.start_date < start_date {
                return false;
            }
        }

        if let Some(end_date) = self.end_date {
            if campaign.start_date > end_date {
                return false;
            }
        }

        true
    }
}

/// Deserializes an optional channel; empty strings count as absent.
pub fn deserialize_optional_channel<'de, D>(deserializer: D) -> Result<Option<Channel>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = Option::<String>::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("unknown channel: {:?}", s))),
    }
}
