use std::fs;
use std::sync::Arc;

use census_engine::{
    run_pipeline, Aggregator, CensusClient, FailureKind, FetchSettings, GeographyKind,
    PipelineError, ReqwestFetcher,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_PATH: &str = "/data/2021/acs/acs5";

fn client_for(server: &MockServer) -> CensusClient {
    census_logging::initialize_for_tests();
    let fetcher = ReqwestFetcher::new(FetchSettings::default()).expect("client");
    CensusClient::new(Arc::new(fetcher), format!("{}{}", server.uri(), API_PATH))
}

async fn mount_states(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("for", "state:*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            ["NAME", "B01003_001E", "state"],
            ["Alabama", "5000000", "01"],
            ["Alaska", "700000", "02"]
        ])))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_counties(server: &MockServer, state: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("for", "county:*"))
        .and(query_param("in", format!("state:{state}")))
        .respond_with(template)
        .expect(1)
        .mount(server)
        .await;
}

fn alabama_counties() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!([
        ["NAME", "B01003_001E", "state", "county"],
        ["Autauga County, Alabama", "55000", "01", "001"]
    ]))
}

fn empty_counties() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!([["NAME", "B01003_001E", "state", "county"]]))
}

#[tokio::test]
async fn two_states_produce_expected_file() {
    let server = MockServer::start().await;
    mount_states(&server).await;
    mount_counties(&server, "01", alabama_counties()).await;
    mount_counties(&server, "02", empty_counties()).await;

    let temp = TempDir::new().unwrap();
    let output = temp.path().join("census_population.csv");
    let summary = run_pipeline(&client_for(&server), &output)
        .await
        .expect("pipeline");

    assert_eq!(summary.state_count, 2);
    assert_eq!(summary.county_count, 1);
    assert_eq!(summary.total, 3);
    assert!(summary.county_failures.is_empty());
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "geoid,name,type,population\n\
         01,Alabama,state,5000000\n\
         02,Alaska,state,700000\n\
         01001,\"Autauga County, Alabama\",county,55000\n"
    );
}

#[tokio::test]
async fn county_failure_keeps_other_states() {
    let server = MockServer::start().await;
    mount_states(&server).await;
    mount_counties(&server, "01", ResponseTemplate::new(503)).await;
    mount_counties(
        &server,
        "02",
        ResponseTemplate::new(200).set_body_json(json!([
            ["NAME", "B01003_001E", "state", "county"],
            ["Anchorage Municipality, Alaska", "290000", "02", "020"]
        ])),
    )
    .await;

    let aggregate = Aggregator::new(&client_for(&server))
        .run()
        .await
        .expect("county failure is not fatal");

    let ids: Vec<&str> = aggregate.records.iter().map(|r| r.identifier()).collect();
    assert_eq!(ids, vec!["01", "02", "02020"]);
    assert_eq!(aggregate.records[2].kind(), GeographyKind::County);
    assert_eq!(aggregate.county_failures.len(), 1);
    let failure = &aggregate.county_failures[0];
    assert_eq!(failure.state_identifier, "01");
    assert_eq!(failure.state_name, "Alabama");
    assert_eq!(failure.error.kind, FailureKind::HttpStatus(503));
}

#[tokio::test]
async fn malformed_county_body_is_not_fatal() {
    let server = MockServer::start().await;
    mount_states(&server).await;
    mount_counties(&server, "01", alabama_counties()).await;
    mount_counties(
        &server,
        "02",
        ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"),
    )
    .await;

    let temp = TempDir::new().unwrap();
    let output = temp.path().join("out.csv");
    let summary = run_pipeline(&client_for(&server), &output)
        .await
        .expect("pipeline");

    assert_eq!(summary.total, 3);
    assert_eq!(summary.county_failures[0].error.kind, FailureKind::Format);
    assert_eq!(fs::read_to_string(&output).unwrap().lines().count(), 4);
}

#[tokio::test]
async fn state_failure_writes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("for", "state:*"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("for", "county:*"))
        .respond_with(empty_counties())
        .expect(0)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let output = temp.path().join("census_population.csv");
    let err = run_pipeline(&client_for(&server), &output)
        .await
        .unwrap_err();

    match err {
        PipelineError::Fetch(fetch) => assert_eq!(fetch.kind, FailureKind::HttpStatus(500)),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!output.exists());
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn unreadable_state_body_writes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "bad key"})))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let output = temp.path().join("census_population.csv");
    let err = run_pipeline(&client_for(&server), &output)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Fetch(ref fetch) if fetch.kind == FailureKind::Format
    ));
    assert!(!output.exists());
}
