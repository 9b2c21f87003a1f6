//! Integration tests for the fetch and dashboard pipeline
//!
//! These tests run [`WikiClient`] against a local wiremock server that speaks
//! the `action=query` dialect, so pagination, error mapping and aggregation
//! are exercised over real HTTP.

use std::time::Duration;

use serde_json::{json, Value};
use wikiwars_core::config::ApiConfig;
use wikiwars_core::{
    Config, Dashboard, Error, FetchError, FetchOutcome, RevisionFetcher, SearchOutcome, WikiClient,
};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_PATH: &str = "/w/api.php";

fn config_for(server: &MockServer) -> Config {
    wikiwars_core::logging::init_test();
    Config {
        api: ApiConfig {
            endpoint: format!("{}{}", server.uri(), API_PATH),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn client_for(server: &MockServer) -> WikiClient {
    WikiClient::new(&config_for(server).api).expect("client should build")
}

fn revisions_page(title: &str, revisions: Value, next: Option<&str>) -> Value {
    let mut body = json!({
        "batchcomplete": next.is_none(),
        "query": {"pages": [{"pageid": 9228, "ns": 0, "title": title, "revisions": revisions}]}
    });
    if let Some(token) = next {
        body["continue"] = json!({"rvcontinue": token, "continue": "||"});
    }
    body
}

async fn mount_earth(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("titles", "Earth"))
        .and(query_param_is_missing("rvcontinue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(revisions_page(
            "Earth",
            json!([
                {"revid": 3, "parentid": 2, "user": "A", "timestamp": "2024-01-02T09:00:00Z"},
                {"revid": 2, "parentid": 1, "user": "B", "timestamp": "2024-01-01T11:00:00Z"}
            ]),
            Some("20240101100000|1"),
        )))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("titles", "Earth"))
        .and(query_param("rvcontinue", "20240101100000|1"))
        .and(query_param("continue", "||"))
        .respond_with(ResponseTemplate::new(200).set_body_json(revisions_page(
            "Earth",
            json!([
                {"revid": 1, "parentid": 0, "user": "A", "timestamp": "2024-01-01T10:00:00Z"}
            ]),
            None,
        )))
        .expect(1)
        .mount(server)
        .await;
}

// ============================================
// Fetcher over HTTP
// ============================================

#[tokio::test]
async fn test_two_page_article_fetch() {
    let server = MockServer::start().await;
    mount_earth(&server).await;

    let fetcher = RevisionFetcher::new(client_for(&server), 100);
    let table = fetcher
        .fetch_article_revisions("Earth")
        .await
        .expect("fetch should succeed")
        .into_table()
        .expect("Earth exists");

    assert_eq!(table.len(), 3);
    assert_eq!(table.dropped_records(), 0);
    let mut ids: Vec<u64> = table.iter().map(|r| r.record.revision_id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_missing_article_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "batchcomplete": true,
            "query": {"pages": [{"ns": 0, "title": "Xyzzy", "missing": true}]}
        })))
        .mount(&server)
        .await;

    let fetcher = RevisionFetcher::new(client_for(&server), 100);
    let outcome = fetcher.fetch_article_revisions("Xyzzy").await.unwrap();
    assert_eq!(outcome, FetchOutcome::NotFound);
}

#[tokio::test]
async fn test_server_error_is_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = RevisionFetcher::new(client_for(&server), 100);
    let err = fetcher.fetch_article_revisions("Earth").await.unwrap_err();
    match err {
        Error::Fetch(FetchError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert!(body.contains("upstream exploded"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let fetcher = RevisionFetcher::new(client_for(&server), 100);
    let err = fetcher.fetch_article_revisions("Earth").await.unwrap_err();
    assert!(matches!(err, Error::Fetch(FetchError::MalformedBody(_))));
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(revisions_page("Earth", json!([]), None))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.api.timeout_secs = 1;
    let client = WikiClient::new(&config.api).unwrap();
    let fetcher = RevisionFetcher::new(client, 100);

    let err = fetcher.fetch_article_revisions("Earth").await.unwrap_err();
    assert!(matches!(err, Error::Fetch(FetchError::Timeout)));
}

#[tokio::test]
async fn test_contributor_history() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("list", "usercontribs"))
        .and(query_param("ucuser", "A"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "batchcomplete": true,
            "query": {"usercontribs": [
                {"userid": 1, "user": "A", "pageid": 9228, "revid": 3, "ns": 0, "title": "Earth", "timestamp": "2024-01-02T09:00:00Z"},
                {"userid": 1, "user": "A", "pageid": 9228, "revid": 1, "ns": 0, "title": "Earth", "timestamp": "2024-01-01T10:00:00Z"},
                {"userid": 1, "user": "A", "pageid": 14640, "revid": 9, "ns": 0, "title": "Mars", "timestamp": "2023-11-05T10:00:00Z"}
            ]}
        })))
        .mount(&server)
        .await;

    let fetcher = RevisionFetcher::new(client_for(&server), 100);
    let table = fetcher
        .fetch_contributor_history("A")
        .await
        .unwrap()
        .into_table()
        .unwrap();

    assert_eq!(table.len(), 3);
    let titles: Vec<_> = table
        .iter()
        .filter_map(|r| r.record.title.as_deref())
        .collect();
    assert_eq!(titles, vec!["Earth", "Earth", "Mars"]);
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": {"code": "baduser_ucuser", "info": "Invalid value \"<>\" for user parameter \"ucuser\"."}
        })))
        .mount(&server)
        .await;

    let fetcher = RevisionFetcher::new(client_for(&server), 100);
    let outcome = fetcher.fetch_contributor_history("<>").await.unwrap();
    assert!(outcome.is_not_found());
}

// ============================================
// Dashboard end to end
// ============================================

#[tokio::test]
async fn test_earth_dashboard_end_to_end() {
    let server = MockServer::start().await;
    mount_earth(&server).await;

    let dashboard = Dashboard::from_config(&config_for(&server)).unwrap();
    let SearchOutcome::Found {
        summary, recent, ..
    } = dashboard.search_article("Earth").await.unwrap()
    else {
        panic!("Earth should be found");
    };

    assert_eq!(summary.article_name, "Earth");
    assert_eq!(summary.total_edits, 3);
    assert_eq!(summary.number_of_contributors, 2);
    assert_eq!(
        summary.last_edit_timestamp.to_rfc3339(),
        "2024-01-02T09:00:00+00:00"
    );
    assert_eq!(recent, vec![summary]);
}

#[tokio::test]
async fn test_earth_details_end_to_end() {
    let server = MockServer::start().await;
    mount_earth(&server).await;

    let dashboard = Dashboard::from_config(&config_for(&server)).unwrap();
    let details = dashboard
        .article_details("Earth")
        .await
        .unwrap()
        .expect("Earth should have details");

    assert_eq!(
        details.top_contributors.to_pairs(),
        vec![("A".to_string(), 2), ("B".to_string(), 1)]
    );
    assert_eq!(details.hourly[10], 1);
    assert_eq!(details.hourly[11], 1);
    assert_eq!(details.hourly[9], 1);
    assert_eq!(details.hourly.total(), 3);
}
