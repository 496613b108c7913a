use company_matcher::adapters::semantic_http::HttpSemanticSearch;
use company_matcher::domain::ports::SemanticCompanySearch;
use company_matcher::{
    Company, CompanyIdentityLinker, CompanyProps, GoldenRecordFactory, MatchCompanies,
    MatchCompaniesRequest, MatchError, PrefixCountryBlockingKeyFactory,
};
use httpmock::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

fn company(id: &str, name: &str, country: &str, tax_id: Option<&str>) -> Company {
    Company::create(CompanyProps {
        id: id.to_string(),
        name: name.to_string(),
        country: country.to_string(),
        tax_id: tax_id.map(String::from),
        ..Default::default()
    })
    .unwrap()
}

fn search(server: &MockServer) -> HttpSemanticSearch {
    HttpSemanticSearch::new(server.url("/neighbors"), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_neighbors_from_plain_array() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/neighbors")
            .json_body_partial(r#"{"topK": 5, "company": {"id": "s1"}}"#);
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([
                {"id": "n1", "name": "Nihon Denki", "country": "JP", "taxId": "999"},
                {"id": "n2", "name": "NEC Corp", "country": "JP"}
            ]));
    });

    let source = company("s1", "日本電気", "JP", Some("999"));
    let neighbors = search(&server).find_nearest_neighbors(&source, 5).await.unwrap();

    api_mock.assert();
    assert_eq!(neighbors.len(), 2);
    assert_eq!(neighbors[0].id(), "n1");
    assert_eq!(neighbors[0].tax_id(), Some("999"));
}

#[tokio::test]
async fn test_neighbors_from_wrapped_object_are_capped_at_top_k() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/neighbors");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"neighbors": [
                {"id": "n1", "name": "One", "country": "JP"},
                {"id": "n2", "name": "Two", "country": "JP"},
                {"id": "n3", "name": "Three", "country": "JP"}
            ]}));
    });

    let source = company("s1", "日本電気", "JP", None);
    let neighbors = search(&server).find_nearest_neighbors(&source, 2).await.unwrap();

    api_mock.assert();
    let ids: Vec<&str> = neighbors.iter().map(|c| c.id()).collect();
    assert_eq!(ids, vec!["n1", "n2"]);
}

#[tokio::test]
async fn test_configured_headers_are_sent() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/neighbors")
            .header("Authorization", "Bearer test-token");
        then.status(200).json_body(serde_json::json!([]));
    });

    let mut headers = HashMap::new();
    headers.insert("Authorization".to_string(), "Bearer test-token".to_string());
    let search = search(&server).with_headers(headers);

    let neighbors = search
        .find_nearest_neighbors(&company("s1", "日本電気", "JP", None), 3)
        .await
        .unwrap();

    api_mock.assert();
    assert!(neighbors.is_empty());
}

#[tokio::test]
async fn test_server_errors_are_retried_then_reported() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/neighbors");
        then.status(503);
    });

    let search = search(&server).with_retry(2, Duration::ZERO);
    let err = search
        .find_nearest_neighbors(&company("s1", "日本電気", "JP", None), 3)
        .await
        .unwrap_err();

    api_mock.assert_hits(3);
    assert!(err.message.contains("503"));
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/neighbors");
        then.status(401);
    });

    let search = search(&server).with_retry(3, Duration::ZERO);
    let err = search
        .find_nearest_neighbors(&company("s1", "日本電気", "JP", None), 3)
        .await
        .unwrap_err();

    api_mock.assert_hits(1);
    assert!(err.message.contains("401"));
}

#[tokio::test]
async fn test_invalid_neighbor_fails_the_lookup() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/neighbors");
        then.status(200).json_body(serde_json::json!([
            {"id": "n1", "name": "One", "country": "JP"},
            {"id": "n2", "name": "  ", "country": "JP"}
        ]));
    });

    let err = search(&server)
        .find_nearest_neighbors(&company("s1", "日本電気", "JP", None), 3)
        .await
        .unwrap_err();

    assert!(err.message.contains("neighbor 1"));
    assert!(err.message.contains("name is required"));
}

#[tokio::test]
async fn test_semantic_failure_discards_earlier_matches() {
    let server = MockServer::start();
    let ok_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/neighbors")
            .json_body_partial(r#"{"company": {"id": "s2"}}"#);
        then.status(200).json_body(serde_json::json!([
            {"id": "n1", "name": "Nihon Denki", "country": "JP", "taxId": "999"}
        ]));
    });
    let failing_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/neighbors")
            .json_body_partial(r#"{"company": {"id": "s3"}}"#);
        then.status(500);
    });

    let matcher = MatchCompanies::new(
        PrefixCountryBlockingKeyFactory::default(),
        CompanyIdentityLinker::new(company_matcher::adapters::strategies::default_strategies()),
        GoldenRecordFactory::new(),
    )
    .with_semantic_search(Arc::new(search(&server)));

    let request = MatchCompaniesRequest::new(
        vec![
            company("s1", "Acme Inc", "US", Some("123")),
            company("s2", "日本電気", "JP", Some("999")),
            company("s3", "株式会社", "JP", None),
        ],
        vec![company("c1", "ACME INC.", "US", Some("123"))],
    );

    let result = matcher.execute(&request).await;

    ok_mock.assert();
    failing_mock.assert();
    match result {
        Err(MatchError::SemanticSearchUnavailable { message }) => {
            assert!(message.contains("500"));
        }
        other => panic!("expected SemanticSearchUnavailable, got {:?}", other),
    }
}
