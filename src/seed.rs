use chrono::{Duration, Utc};

use crate::campaign::{Campaign, CampaignId, Channel};
use crate::database::Database;
use crate::error::Error;

pub async fn seed(db: &dyn Database) -> Result<(), Error> {
    db.drop().await?;

    let now = Utc::now();
    let first_start = now - Duration::days(90);

    let campaigns = vec![
        ("Spring Search Push", Channel::GoogleAds, 5000.0, 0, 1200, 48000, 90),
        ("Lookalike Audiences", Channel::Facebook, 3200.0, 14, 860, 51000, 41),
        ("Creator Collab", Channel::Instagram, 2100.0, 21, 0, 30500, 0),
        ("B2B Whitepaper", Channel::LinkedIn, 4000.0, 30, 310, 9800, 37),
        ("Newsletter Relaunch", Channel::Email, 400.0, 45, 540, 0, 22),
        ("Retargeting Banners", Channel::Display, 1500.0, 60, 95, 120000, 4),
    ];

    for (offset, (name, channel, budget, start_offset, clicks, impressions, conversions)) in
        campaigns.into_iter().enumerate()
    {
        let start_date = first_start + Duration::days(start_offset);
        let created_at = now - Duration::minutes(offset as i64);
        let campaign = Campaign {
            id: CampaignId::new(),
            campaign_name: name.to_string(),
            channel,
            budget,
            start_date,
            end_date: start_date + Duration::days(30),
            clicks,
            impressions,
            conversions,
            created_at,
            updated_at: created_at,
        };

        campaign.validate()?;
        db.campaigns().insert_campaign(&campaign).await?;
    }

    tracing::info!("seeded demo campaigns");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::filter::CampaignFilter;
    use crate::database::MemoryDatabase;

    #[tokio::test]
    async fn seeds_zero_guard_cases() {
        let db = MemoryDatabase::new();

        seed(&db).await.unwrap();

        let summary = db
            .campaigns()
            .summarize_campaigns(&CampaignFilter::default())
            .await
            .unwrap();
        assert_eq!(summary.total_campaigns, 6);
        assert_eq!(summary.total_clicks, 3005);

        let instagram = CampaignFilter {
            channel: Some(Channel::Instagram),
            ..Default::default()
        };
        let summary = db.campaigns().summarize_campaigns(&instagram).await.unwrap();
        assert_eq!(summary.avg_ctr, 0.0);
        assert_eq!(summary.avg_cpc, 0.0);
    }
}
