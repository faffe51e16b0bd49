//! Integration tests with a mocked enrichment service.
//! Exercises the client and the full batch workflow without hitting the real
//! remote endpoint.

use contact_enrich_api::address::compose_address;
use contact_enrich_api::batch::{BatchProcessor, RowFailurePolicy};
use contact_enrich_api::ingest;
use contact_enrich_api::models::ENRICHMENT_COLUMNS;
use contact_enrich_api::name::split_name;
use contact_enrich_api::report;
use contact_enrich_api::services::{ApiCredentials, EnrichmentClient, DEFAULT_SEARCH_TYPE};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CSV_FIXTURE: &str = "\
Primary Addressee Name,Address ID,Formatted Address Line One,Address Line Two,City,State,ZIP Code
Jane Q. Public,1001,123 Main St,Apt 4,Springfield,IL,62704
John Smith,1002,456 Oak Ave,,Chicago,IL,60601
Nancy Nomatch,1003,789 Pine Rd,,Peoria,IL,61602
";

fn test_credentials() -> ApiCredentials {
    ApiCredentials {
        key_name: "test_key".to_string(),
        key_password: "test_pass".to_string(),
        search_type: DEFAULT_SEARCH_TYPE.to_string(),
    }
}

fn client_for(server: &MockServer) -> EnrichmentClient {
    EnrichmentClient::new(server.uri(), test_credentials()).unwrap()
}

fn jane_response() -> serde_json::Value {
    json!({
        "person": {
            "age": 47,
            "phones": [
                {"number": "(217) 555-0100", "type": "mobile", "lastReportedDate": "01/01/2020", "isConnected": true},
                {"number": "(217) 555-0199", "type": "mobile", "lastReportedDate": "06/15/2023", "isConnected": true},
                {"number": "(217) 555-0111", "type": "landline", "lastReportedDate": "12/01/2024", "isConnected": false}
            ],
            "emails": [
                {"email": "jane.public@example.com", "isValidated": true},
                {"email": "old.jane@example.com", "isValidated": false}
            ]
        }
    })
}

fn john_response() -> serde_json::Value {
    json!({
        "person": {
            "age": 33,
            "phones": [
                {"number": "(312) 555-0150", "type": "mobile", "lastReportedDate": "03/10/2024", "isConnected": true}
            ],
            "emails": []
        }
    })
}

#[tokio::test]
async fn test_enrich_extracts_latest_connected_phone() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/Contact/Enrich"))
        .and(header("galaxy-ap-name", "test_key"))
        .and(header("galaxy-ap-password", "test_pass"))
        .and(header("galaxy-search-type", DEFAULT_SEARCH_TYPE))
        .respond_with(ResponseTemplate::new(200).set_body_json(jane_response()))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let name = split_name("Jane Q. Public");
    let address = compose_address("123 Main St", Some("Apt 4"), "Springfield", "IL", "62704");

    let result = client.enrich(&name, &address).await.unwrap();

    // Latest connected date wins; the disconnected 12/01/2024 entry loses.
    assert_eq!(result.phone_number.as_deref(), Some("(217) 555-0199"));
    assert_eq!(result.phone_type.as_deref(), Some("mobile"));
    assert_eq!(result.phone_last_reported_date.as_deref(), Some("06/15/2023"));
    assert_eq!(result.age.as_deref(), Some("47"));
    assert_eq!(
        result.validated_emails.as_deref(),
        Some("jane.public@example.com")
    );
}

#[tokio::test]
async fn test_enrich_empty_body_is_no_match() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/Contact/Enrich"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let name = split_name("Nancy Nomatch");
    let address = compose_address("789 Pine Rd", None, "Peoria", "IL", "61602");

    let result = client.enrich(&name, &address).await.unwrap();

    assert_eq!(result.phone_number, None);
    assert_eq!(result.phone_type, None);
    assert_eq!(result.phone_last_reported_date, None);
    assert_eq!(result.age, None);
    assert_eq!(result.validated_emails, None);
}

#[tokio::test]
async fn test_enrich_server_error_is_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/Contact/Enrich"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let name = split_name("Jane Q. Public");
    let address = compose_address("123 Main St", None, "Springfield", "IL", "62704");

    let result = client.enrich(&name, &address).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_end_to_end_three_rows() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/Contact/Enrich"))
        .and(body_partial_json(json!({"FirstName": "Jane"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(jane_response()))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/Contact/Enrich"))
        .and(body_partial_json(json!({"FirstName": "John"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(john_response()))
        .mount(&mock_server)
        .await;

    // Any other contact comes back without person data.
    Mock::given(method("POST"))
        .and(path("/Contact/Enrich"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let table = ingest::parse_contacts(CSV_FIXTURE.as_bytes()).unwrap();
    let original_headers = table.headers.clone();

    let processor = BatchProcessor::new(client_for(&mock_server), RowFailurePolicy::default());
    let enriched = processor.enrich_table(table).await.unwrap();
    let summary = report::summarize(&enriched);

    // Row count and order preserved.
    assert_eq!(enriched.rows.len(), 3);
    assert_eq!(enriched.rows[0].fields[0], "Jane Q. Public");
    assert_eq!(enriched.rows[1].fields[0], "John Smith");
    assert_eq!(enriched.rows[2].fields[0], "Nancy Nomatch");

    // Headers are the original columns plus the five enrichment columns.
    assert_eq!(enriched.headers.len(), original_headers.len() + 5);
    assert_eq!(&enriched.headers[..original_headers.len()], &original_headers[..]);
    assert_eq!(&enriched.headers[original_headers.len()..], &ENRICHMENT_COLUMNS[..]);

    // 2 of 3 rows matched a phone, 1 of 3 a validated email.
    assert_eq!(summary.matched_phones, 2);
    assert_eq!(summary.phone_match_display(), "67%");
    assert_eq!(summary.matched_emails, 1);
    assert_eq!(summary.email_match_display(), "33%");
    assert_eq!(summary.matched_rows, 2);
    assert_eq!(summary.failed_rows, 0);
}

#[tokio::test]
async fn test_row_failure_marked_unmatched() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/Contact/Enrich"))
        .and(body_partial_json(json!({"FirstName": "Jane"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(jane_response()))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/Contact/Enrich"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let table = ingest::parse_contacts(CSV_FIXTURE.as_bytes()).unwrap();

    let processor =
        BatchProcessor::new(client_for(&mock_server), RowFailurePolicy::MarkUnmatched);
    let enriched = processor.enrich_table(table).await.unwrap();

    // One bad contact does not lose the rest of the batch.
    assert_eq!(enriched.rows.len(), 3);
    assert_eq!(enriched.failed_rows, 2);
    assert!(enriched.rows[0].enrichment.has_phone());
    assert!(!enriched.rows[1].enrichment.has_phone());
    assert!(!enriched.rows[2].enrichment.has_phone());
}

#[tokio::test]
async fn test_row_failure_fail_fast_aborts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/Contact/Enrich"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let table = ingest::parse_contacts(CSV_FIXTURE.as_bytes()).unwrap();

    let processor = BatchProcessor::new(client_for(&mock_server), RowFailurePolicy::FailFast);
    let result = processor.enrich_table(table).await;

    assert!(result.is_err());
    let message = result.unwrap_err().to_string();
    assert!(message.contains("row 1"), "got: {}", message);
}
