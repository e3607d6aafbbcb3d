use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::web::Data;
use actix_web::{test, App};
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};

use campaign_analytics::campaign::{Campaign, CampaignId, Channel};
use campaign_analytics::configure;
use campaign_analytics::database::{Database, MemoryDatabase};

macro_rules! init_app {
    ($db:expr) => {
        test::init_service(
            App::new()
                .app_data(Data::from(Arc::clone(&$db)))
                .configure(configure),
        )
        .await
    };
}

fn memory_db() -> Arc<dyn Database> {
    Arc::new(MemoryDatabase::new())
}

fn stored_campaign(index: i64, channel: Channel) -> Campaign {
    let start = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
    let created_at = start + Duration::minutes(index);
    Campaign {
        id: CampaignId::new(),
        campaign_name: format!("Campaign {}", index),
        channel,
        budget: 100.0,
        start_date: start,
        end_date: start + Duration::days(14),
        clicks: index,
        impressions: 1000,
        conversions: 1,
        created_at,
        updated_at: created_at,
    }
}

#[actix_rt::test]
async fn create_returns_created_campaign_with_metrics() {
    let db = memory_db();
    let app = init_app!(db);

    let request = test::TestRequest::post()
        .uri("/api/campaigns")
        .set_json(json!({
            "campaignName": "Launch Week",
            "channel": "Google Ads",
            "budget": 500.0,
            "startDate": "2024-06-01",
            "endDate": "2024-06-30T00:00:00Z",
            "clicks": 250,
            "impressions": 10000,
            "conversions": 20
        }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["campaignName"], "Launch Week");
    assert_eq!(body["data"]["channel"], "Google Ads");
    assert_eq!(body["data"]["ctr"], 2.5);
    assert_eq!(body["data"]["cpc"], 2.0);
    assert_eq!(body["data"]["roi"], 300.0);

    let campaign_id = body["data"]["id"].as_str().unwrap().to_string();
    let request = test::TestRequest::get()
        .uri(&format!("/api/campaigns/{}", campaign_id))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["data"]["id"], campaign_id.as_str());
}

#[actix_rt::test]
async fn create_with_invalid_fields_is_rejected() {
    let db = memory_db();
    let app = init_app!(db);

    let request = test::TestRequest::post()
        .uri("/api/campaigns")
        .set_json(json!({
            "campaignName": "Backwards",
            "budget": -1.0,
            "startDate": "2024-06-30",
            "endDate": "2024-06-01"
        }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error_code"], "E4001005");

    let fields: Vec<&str> = body["error_meta"]["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|violation| violation["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["budget", "endDate"]);

    let total = db
        .campaigns()
        .count_campaigns(&Default::default())
        .await
        .unwrap();
    assert_eq!(total, 0);
}

#[actix_rt::test]
async fn second_page_holds_the_next_ten_newest() {
    let db = memory_db();
    for index in 0..25 {
        db.campaigns()
            .insert_campaign(&stored_campaign(index, Channel::Facebook))
            .await
            .unwrap();
    }
    let app = init_app!(db);

    let mut pages = vec![];
    for _ in 0..2 {
        let request = test::TestRequest::get()
            .uri("/api/campaigns?page=2&limit=10")
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = test::read_body_json(response).await;
        pages.push(body);
    }

    let body = &pages[0];
    assert_eq!(body["count"], 10);
    assert_eq!(body["total"], 25);
    assert_eq!(body["pagination"], json!({ "page": 2, "limit": 10, "pages": 3 }));

    let clicks: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|campaign| campaign["clicks"].as_i64().unwrap())
        .collect();
    assert_eq!(clicks, (5..15).rev().collect::<Vec<i64>>());

    assert_eq!(pages[0]["data"], pages[1]["data"]);
}

#[actix_rt::test]
async fn listing_applies_channel_filter_to_data_and_total() {
    let db = memory_db();
    for index in 0..6 {
        let channel = if index % 2 == 0 {
            Channel::Email
        } else {
            Channel::Twitter
        };
        db.campaigns()
            .insert_campaign(&stored_campaign(index, channel))
            .await
            .unwrap();
    }
    let app = init_app!(db);

    let request = test::TestRequest::get()
        .uri("/api/campaigns?channel=Email&startDate=")
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["total"], 3);
    for campaign in body["data"].as_array().unwrap() {
        assert_eq!(campaign["channel"], "Email");
    }
}

#[actix_rt::test]
async fn invalid_page_is_rejected() {
    let db = memory_db();
    let app = init_app!(db);

    let request = test::TestRequest::get()
        .uri("/api/campaigns?page=0")
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["error_code"], "E4001004");
}

#[actix_rt::test]
async fn summary_of_no_matches_is_zeroed() {
    let db = memory_db();
    db.campaigns()
        .insert_campaign(&stored_campaign(3, Channel::LinkedIn))
        .await
        .unwrap();
    let app = init_app!(db);

    let request = test::TestRequest::get()
        .uri("/api/campaigns/analytics/summary?channel=Display")
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(
        body["data"],
        json!({
            "totalCampaigns": 0,
            "totalBudget": 0.0,
            "totalClicks": 0,
            "totalImpressions": 0,
            "totalConversions": 0,
            "avgCTR": 0.0,
            "avgCPC": 0.0
        })
    );
}

#[actix_rt::test]
async fn update_then_delete_campaign() {
    let db = memory_db();
    let campaign = stored_campaign(8, Channel::Instagram);
    db.campaigns().insert_campaign(&campaign).await.unwrap();
    let app = init_app!(db);
    let uri = format!("/api/campaigns/{}", campaign.id);

    let request = test::TestRequest::put()
        .uri(&uri)
        .set_json(json!({ "clicks": 40, "impressions": 800 }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["data"]["clicks"], 40);
    assert_eq!(body["data"]["ctr"], 5.0);
    assert_eq!(body["data"]["campaignName"], "Campaign 8");

    let request = test::TestRequest::delete().uri(&uri).to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body, json!({ "success": true, "data": {} }));

    let request = test::TestRequest::delete().uri(&uri).to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn missing_campaign_is_not_found() {
    let db = memory_db();
    let app = init_app!(db);

    let request = test::TestRequest::get()
        .uri(&format!("/api/campaigns/{}", CampaignId::new()))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["error_code"], "E4041001");
    assert_eq!(body["error_message"], "Campaign not found");
}

#[actix_rt::test]
async fn malformed_id_is_a_bad_request() {
    let db = memory_db();
    let app = init_app!(db);

    let request = test::TestRequest::get()
        .uri("/api/campaigns/not-an-id")
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["error_code"], "E4001001");
}

#[actix_rt::test]
async fn unknown_route_is_not_found() {
    let db = memory_db();
    let app = init_app!(db);

    let request = test::TestRequest::get().uri("/api/nothing").to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["error_code"], "E4041000");
}

#[actix_rt::test]
async fn blank_page_and_limit_use_defaults() {
    let db = memory_db();
    for index in 0..12 {
        db.campaigns()
            .insert_campaign(&stored_campaign(index, Channel::Other))
            .await
            .unwrap();
    }
    let app = init_app!(db);

    let request = test::TestRequest::get()
        .uri("/api/campaigns?page=&limit=")
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["count"], 10);
    assert_eq!(body["pagination"], json!({ "page": 1, "limit": 10, "pages": 2 }));
}

#[actix_rt::test]
async fn non_numeric_page_is_a_bad_query() {
    let db = memory_db();
    let app = init_app!(db);

    let request = test::TestRequest::get()
        .uri("/api/campaigns?page=two")
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["error_code"], "E4001003");
}

#[actix_rt::test]
async fn page_far_past_the_end_is_empty() {
    let db = memory_db();
    db.campaigns()
        .insert_campaign(&stored_campaign(1, Channel::Email))
        .await
        .unwrap();
    let app = init_app!(db);

    let request = test::TestRequest::get()
        .uri("/api/campaigns?page=9223372036854775807&limit=10")
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["count"], 0);
    assert_eq!(body["total"], 1);
}

#[actix_rt::test]
async fn analytics_without_summary_is_an_invalid_id() {
    let db = memory_db();
    let app = init_app!(db);

    let request = test::TestRequest::get()
        .uri("/api/campaigns/analytics")
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["error_code"], "E4001001");
}
