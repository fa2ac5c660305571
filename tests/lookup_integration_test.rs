use httpmock::prelude::*;
use ial_gateway::app::build_orchestrator;
use ial_gateway::{GatewayConfig, GatewayError, LookupRequest, ResponseFormat};

const DOC_TYPE_A_RESULT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<resultlist version="1.0" total-result-count="1" used-result-count="1" query-terms="doctype=docTypeA">
  <match>
    <participantID scheme="iso6523-actorid-upis">9915:provider-a</participantID>
    <docTypeID scheme="urn:de4a-eu:CanonicalEvidenceType">docTypeA</docTypeID>
    <entity>
      <name>Provider A</name>
      <countryCode>AT</countryCode>
    </entity>
  </match>
</resultlist>"#;

const EMPTY_RESULT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<resultlist version="1.0" total-result-count="0" used-result-count="0" query-terms="doctype=docTypeB"/>"#;

fn config_for(server: &MockServer) -> GatewayConfig {
    GatewayConfig::from_toml_str(&format!(
        r#"
[directory]
base_url = "{}"
max_results_per_query = 100
max_concurrent_queries = 2
"#,
        server.base_url()
    ))
    .unwrap()
}

#[tokio::test]
async fn test_end_to_end_partial_matches() {
    let server = MockServer::start_async().await;
    let doc_a = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/search/1.0/xml")
                .query_param("rpc", "100")
                .query_param("doctype", "docTypeA");
            then.status(200)
                .header("Content-Type", "application/xml")
                .body(DOC_TYPE_A_RESULT);
        })
        .await;
    let doc_b = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/search/1.0/xml")
                .query_param("doctype", "docTypeB");
            then.status(200)
                .header("Content-Type", "application/xml")
                .body(EMPTY_RESULT);
        })
        .await;

    let orchestrator = build_orchestrator(&config_for(&server));
    let rendered = orchestrator
        .lookup(&LookupRequest::new("docTypeA, docTypeB, docTypeA"))
        .await
        .unwrap();

    // Duplicate identifiers are queried once
    doc_a.assert_hits_async(1).await;
    doc_b.assert_hits_async(1).await;

    assert_eq!(rendered.format, ResponseFormat::Xml);
    let xml = String::from_utf8(rendered.body).unwrap();
    assert!(xml.contains("<CanonicalObjectTypeID>docTypeA</CanonicalObjectTypeID>"));
    assert!(xml.contains("<DataOwnerId>iso6523-actorid-upis::9915:provider-a</DataOwnerId>"));
    assert!(xml.contains("<DataOwnerPrefLabel>Provider A</DataOwnerPrefLabel>"));
    assert!(xml.contains("<CountryCode>AT</CountryCode>"));
    assert!(!xml.contains("docTypeB"));
    assert!(!xml.contains("<Error>"));
}

#[tokio::test]
async fn test_failed_and_unparsable_queries_are_skipped() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/search/1.0/xml")
                .query_param("doctype", "docTypeA");
            then.status(200).body(DOC_TYPE_A_RESULT);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/search/1.0/xml")
                .query_param("doctype", "garbage");
            then.status(200).body("this is not xml <<<");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/search/1.0/xml")
                .query_param("doctype", "down");
            then.status(503);
        })
        .await;

    let orchestrator = build_orchestrator(&config_for(&server));
    let rendered = orchestrator
        .lookup(
            &LookupRequest::new("garbage,docTypeA,down")
                .with_accept("application/json;q=0.9, application/xml;q=0.8"),
        )
        .await
        .unwrap();

    assert_eq!(rendered.content_type(), "application/json");
    let json: serde_json::Value = serde_json::from_slice(&rendered.body).unwrap();
    let items = json["ResponseItem"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["CanonicalObjectTypeID"], "docTypeA");
    assert_eq!(json["Error"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_no_matches_yields_error_only_response() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/search/1.0/xml");
            then.status(200).body(EMPTY_RESULT);
        })
        .await;

    let orchestrator = build_orchestrator(&config_for(&server));
    let rendered = orchestrator
        .lookup(&LookupRequest::new("docTypeB").with_atu_code("AT13"))
        .await
        .unwrap();

    let xml = String::from_utf8(rendered.body).unwrap();
    assert!(xml.contains("<Code>no-match</Code>"));
    assert!(!xml.contains("<ResponseItem>"));
}

#[tokio::test]
async fn test_empty_identifiers_make_no_directory_calls() {
    let server = MockServer::start_async().await;
    let any_search = server
        .mock_async(|when, then| {
            when.method(GET).path("/search/1.0/xml");
            then.status(200).body(DOC_TYPE_A_RESULT);
        })
        .await;

    let orchestrator = build_orchestrator(&config_for(&server));
    let err = orchestrator
        .lookup(&LookupRequest::new(" ,, "))
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::InvalidRequest { .. }));
    any_search.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_unreachable_directory_is_not_a_request_failure() {
    // Nothing listens on port 9 (discard)
    let config = GatewayConfig::from_toml_str(
        r#"
[directory]
base_url = "http://127.0.0.1:9"
request_timeout_seconds = 2
"#,
    )
    .unwrap();

    let rendered = build_orchestrator(&config)
        .lookup(&LookupRequest::new("docTypeA"))
        .await
        .unwrap();

    let xml = String::from_utf8(rendered.body).unwrap();
    assert!(xml.contains("<Code>no-match</Code>"));
}
