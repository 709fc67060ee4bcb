use actix_web::{http::StatusCode, test, web, App};
use blockscout_service_launcher::database::{self, DatabaseConnectOptionsSettings};
use chain_metrics_logic::{repository::snapshots, SnapshotRecord, TrendResult};
use chain_metrics_server::{http_configure, AppState, Settings};
use chrono::{DateTime, Utc};
use migration::Migrator;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

const DAY: i64 = 86_400;

async fn init_state() -> web::Data<AppState> {
    let mut settings = Settings::default("sqlite::memory:".to_string());
    // every pooled connection would open its own in-memory database
    settings.database.connect_options = DatabaseConnectOptionsSettings {
        max_connections: Some(1),
        ..Default::default()
    };
    let db = database::initialize_postgres::<Migrator>(&settings.database)
        .await
        .expect("failed to init database");
    web::Data::new(AppState::new(db, &settings))
}

macro_rules! init_app {
    ($state:expr) => {{
        let state = $state.clone();
        test::init_service(App::new().configure(move |config| http_configure(config, state)))
            .await
    }};
}

#[actix_web::test]
async fn health_is_serving() {
    let state = init_state().await;
    let app = init_app!(state);
    let response = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_web::test]
async fn normalizes_enveloped_payload() {
    let state = init_state().await;
    let app = init_app!(state);
    let payload = json!({
        "result": {
            "results": [
                {"timestamp": 1_700_000_000_000_i64, "value": "5"},
                {"timestamp": "23.09.2020", "value": 1},
                {}
            ]
        }
    });
    let request = test::TestRequest::post()
        .uri("/api/v1/series:normalize?from=1699920000&to=1700006400")
        .set_json(&payload)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;

    let points = body["points"].as_array().expect("points should be an array");
    assert_eq!(points.len(), 3);
    assert_eq!(points[0], json!({"timestamp": 1_600_819_200, "value": 1.0}));
    assert_eq!(points[1], json!({"timestamp": 1_700_000_000, "value": 5.0}));
    assert_eq!(
        body["summary"],
        json!({
            "total": 3,
            "converted": 2,
            "substituted": 1,
            "dropped": 0,
            "defaultedValues": 1
        })
    );
    assert_eq!(body["coverage"]["requestedDays"], json!(2));
    assert_eq!(body["coverage"]["isPartial"], json!(false));
}

#[actix_web::test]
async fn coverage_is_omitted_without_range() {
    let state = init_state().await;
    let app = init_app!(state);
    let request = test::TestRequest::post()
        .uri("/api/v1/series:normalize")
        .set_json(json!([{"timestamp": 1_700_000_000, "value": 2}]))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body.get("coverage"), None);
    assert_eq!(body["summary"]["total"], json!(1));
}

#[actix_web::test]
async fn rejects_payload_without_records() {
    let state = init_state().await;
    let app = init_app!(state);

    let request = test::TestRequest::post()
        .uri("/api/v1/series:normalize")
        .set_json(json!({"status": "ok"}))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let request = test::TestRequest::post()
        .uri("/api/v1/series:normalize?from=10")
        .set_json(json!([]))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let request = test::TestRequest::post()
        .uri("/api/v1/series:normalize?from=10&to=5")
        .set_json(json!([]))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn records_and_lists_snapshots() {
    let state = init_state().await;
    let app = init_app!(state);

    for count in [10, 12] {
        let request = test::TestRequest::post()
            .uri("/api/v1/snapshots/chains")
            .set_json(json!({ "count": count }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let request = test::TestRequest::get()
        .uri("/api/v1/snapshots/chains?days=7")
        .to_request();
    let records: Vec<SnapshotRecord> = test::call_and_read_body_json(&app, request).await;
    let counts: Vec<_> = records.iter().map(|record| record.count).collect();
    assert_eq!(counts, vec![10, 12]);

    let request = test::TestRequest::post()
        .uri("/api/v1/snapshots/chains")
        .set_json(json!({ "count": -1 }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn trend_compares_against_window_start() {
    let state = init_state().await;
    let now = Utc::now().timestamp();
    for (days_ago, count) in [(40, 10), (5, 15), (0, 20)] {
        let at = DateTime::from_timestamp(now - days_ago * DAY, 0).unwrap();
        snapshots::record(&state.db, "chains", count, at)
            .await
            .unwrap();
    }
    let app = init_app!(state);

    let request = test::TestRequest::get()
        .uri("/api/v1/snapshots/chains/trend")
        .to_request();
    let result: TrendResult = test::call_and_read_body_json(&app, request).await;
    assert_eq!(result.current, 20);
    assert_eq!(result.previous, 10);
    assert_eq!(result.absolute_change, 10);
    assert_eq!(result.percent_change, 100.0);

    let request = test::TestRequest::get()
        .uri("/api/v1/snapshots/chains/trend?days=3")
        .to_request();
    let result: TrendResult = test::call_and_read_body_json(&app, request).await;
    assert_eq!(result.previous, 15);
    assert_eq!(result.percent_change, 33.33);

    let request = test::TestRequest::get()
        .uri("/api/v1/snapshots/unknown/trend")
        .to_request();
    let result: TrendResult = test::call_and_read_body_json(&app, request).await;
    assert_eq!(result, TrendResult::default());
}

#[actix_web::test]
async fn rejects_empty_lookback_window() {
    let state = init_state().await;
    let app = init_app!(state);

    for uri in [
        "/api/v1/snapshots/chains?days=0",
        "/api/v1/snapshots/chains/trend?days=0",
    ] {
        let request = test::TestRequest::get().uri(uri).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
    }
}
