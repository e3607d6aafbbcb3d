use chrono::{DateTime, Utc};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};

use crate::campaign::MAX_CAMPAIGN_NAME_LENGTH;

/// A single broken constraint on a campaign record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING-KEBAB-CASE")]
pub enum Violation {
    FieldIsRequired {
        field: Field,
    },
    CampaignNameTooLong {
        maximum_length: usize,
        current_length: usize,
    },
    BudgetIsNegative {
        budget: f64,
    },
    BudgetIsNotFinite,
    CounterIsNegative {
        field: Field,
        value: i64,
    },
    CounterTooLarge {
        field: Field,
        maximum: i64,
        value: i64,
    },
    EndDateNotAfterStartDate {
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    CampaignName,
    Channel,
    Budget,
    StartDate,
    EndDate,
    Clicks,
    Impressions,
    Conversions,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::CampaignName => "campaignName",
            Field::Channel => "channel",
            Field::Budget => "budget",
            Field::StartDate => "startDate",
            Field::EndDate => "endDate",
            Field::Clicks => "clicks",
            Field::Impressions => "impressions",
            Field::Conversions => "conversions",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Field::CampaignName => "Campaign name",
            Field::Channel => "Channel",
            Field::Budget => "Budget",
            Field::StartDate => "Start date",
            Field::EndDate => "End date",
            Field::Clicks => "Clicks",
            Field::Impressions => "Impressions",
            Field::Conversions => "Conversions",
        }
    }
}

impl Violation {
    pub fn field(&self) -> Field {
        match self {
            Violation::FieldIsRequired { field } => *field,
            Violation::CampaignNameTooLong { .. } => Field::CampaignName,
            Violation::BudgetIsNegative { .. } => Field::Budget,
            Violation::BudgetIsNotFinite => Field::Budget,
            Violation::CounterIsNegative { field, .. } => *field,
            Violation::CounterTooLarge { field, .. } => *field,
            Violation::EndDateNotAfterStartDate { .. } => Field::EndDate,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Violation::FieldIsRequired { field } => format!("{} is required", field.label()),
            Violation::CampaignNameTooLong { .. } => format!(
                "Campaign name cannot exceed {} characters",
                MAX_CAMPAIGN_NAME_LENGTH
            ),
            Violation::BudgetIsNegative { .. } => "Budget cannot be negative".to_string(),
            Violation::BudgetIsNotFinite => "Budget must be a finite number".to_string(),
            Violation::CounterIsNegative { field, .. } => {
                format!("{} cannot be negative", field.label())
            }
            Violation::CounterTooLarge { field, maximum, .. } => {
                format!("{} cannot exceed {}", field.label(), maximum)
            }
            Violation::EndDateNotAfterStartDate { .. } => {
                "End date must be after start date".to_string()
            }
        }
    }
}

/// Serializes violations as `{ field, message, detail }` entries so clients
/// can map them back onto form fields.
pub fn serialize_violations<S>(violations: &[Violation], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    #[derive(Serialize)]
    struct Entry<'a> {
        field: &'static str,
        message: String,
        detail: &'a Violation,
    }

    let mut seq = serializer.serialize_seq(Some(violations.len()))?;
    for violation in violations {
        seq.serialize_element(&Entry {
            field: violation.field().as_str(),
            message: violation.message(),
            detail: violation,
        })?;
    }
    seq.end()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_follow_field_labels() {
        let violation = Violation::FieldIsRequired {
            field: Field::StartDate,
        };

        assert_eq!(violation.field(), Field::StartDate);
        assert_eq!(violation.message(), "Start date is required");
    }

    #[test]
    fn serialized_entries_carry_field_and_message() {
        #[derive(Serialize)]
        struct Wrapper {
            #[serde(serialize_with = "serialize_violations")]
            violations: Vec<Violation>,
        }

        let value = serde_json::to_value(&Wrapper {
            violations: vec![Violation::CounterIsNegative {
                field: Field::Clicks,
                value: -3,
            }],
        })
        .unwrap();

        assert_eq!(value["violations"][0]["field"], "clicks");
        assert_eq!(value["violations"][0]["message"], "Clicks cannot be negative");
        assert_eq!(value["violations"][0]["detail"]["type"], "COUNTER-IS-NEGATIVE");
        assert_eq!(value["violations"][0]["detail"]["value"], -3);
    }
}
