use httpmock::prelude::*;
use leads_import::utils::error::ImportError;
use leads_import::utils::logger;
use leads_import::{BatchRunner, BitrixClient, Lead, SubmissionConfig, SubmissionOutcome};
use serde_json::json;
use std::fs::File;
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;

fn client_for(server: &MockServer) -> BitrixClient {
    let config = SubmissionConfig::new(server.url("/rest/1/token/crm.lead.add.json"))
        .with_request_delay(Duration::ZERO);
    BitrixClient::new(config).unwrap()
}

#[tokio::test]
async fn test_lead_created_when_result_present() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/1/token/crm.lead.add.json")
            .header("content-type", "application/json")
            .json_body(json!({
                "fields": {
                    "TITLE": "LR_конк_ 79990001122",
                    "PHONE": [{"VALUE": "79990001122", "VALUE_TYPE": "WORK"}],
                    "SOURCE_ID": "106",
                    "STATUS_ID": "UC_LF7L5W",
                    "ASSIGNED_BY_ID": "20140"
                }
            }));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"result": 4521, "time": {"start": 1.0}}));
    });

    let client = client_for(&server);
    let outcome = client.create_lead(&Lead::new("79990001122")).await;

    api_mock.assert();
    assert_eq!(outcome.unwrap(), "4521");
}

#[tokio::test]
async fn test_comments_are_forwarded() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/1/token/crm.lead.add.json")
            .body_contains("\"COMMENTS\":\"callback tomorrow\"");
        then.status(200).json_body(json!({"result": 1}));
    });

    let client = client_for(&server);
    let lead = Lead::new("79990001122").with_comments("callback tomorrow");

    assert!(client.create_lead(&lead).await.is_ok());
    api_mock.assert();
}

#[tokio::test]
async fn test_error_status_is_failure_and_logged() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("leads_import.log");
    let dispatch = logger::build_cli_dispatch(false, Some(&log_path)).unwrap();
    let _guard = tracing::dispatcher::set_default(&dispatch);

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/rest/1/token/crm.lead.add.json");
        then.status(500).body("Internal Error");
    });

    let client = client_for(&server);
    let outcome = leads_import::domain::ports::LeadSubmitter::submit(
        &client,
        &Lead::new("79990001122"),
    )
    .await;

    api_mock.assert();
    match outcome {
        SubmissionOutcome::Failure(ImportError::ApiStatus { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "Internal Error");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    let log = std::fs::read_to_string(&log_path).unwrap();
    assert!(log.contains("500"));
    assert!(log.contains("Internal Error"));
    assert!(log.contains("79990001122"));
}

#[tokio::test]
async fn test_failure_detail_stays_out_of_console() {
    let temp_dir = TempDir::new().unwrap();
    let console_path = temp_dir.path().join("console.txt");
    let log_path = temp_dir.path().join("leads_import.log");
    let console = Mutex::new(File::create(&console_path).unwrap());
    let dispatch = logger::build_dispatch(false, Some(&log_path), console).unwrap();
    let _guard = tracing::dispatcher::set_default(&dispatch);

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/rest/1/token/crm.lead.add.json");
        then.status(500).body("Internal Error");
    });

    let runner = BatchRunner::new(client_for(&server), Duration::ZERO);
    let summary = runner.run(&[Lead::new("79990001122")], |_| {}).await;
    assert_eq!(summary.success_count, 0);

    let console = std::fs::read_to_string(&console_path).unwrap();
    assert!(!console.contains("Internal Error"));
    assert!(!console.contains("79990001122"));

    let log = std::fs::read_to_string(&log_path).unwrap();
    assert!(log.contains("Internal Error"));
    assert!(log.contains("Lead 1/1 failed"));
}

#[tokio::test]
async fn test_success_without_result_id_is_distinct_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/rest/1/token/crm.lead.add.json");
        then.status(200)
            .json_body(json!({"error": "", "error_description": ""}));
    });

    let client = client_for(&server);
    let err = client
        .create_lead(&Lead::new("79990001122"))
        .await
        .unwrap_err();

    assert!(matches!(err, ImportError::MissingResultId { .. }));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_failure() {
    let config = SubmissionConfig::new("http://127.0.0.1:1/rest/1/token/crm.lead.add.json");
    let client = BitrixClient::new(config).unwrap();

    let err = client
        .create_lead(&Lead::new("79990001122"))
        .await
        .unwrap_err();

    assert!(matches!(err, ImportError::Transport(_)));
}

#[tokio::test]
async fn test_slow_endpoint_times_out() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/rest/1/token/crm.lead.add.json");
        then.status(200)
            .delay(Duration::from_secs(3))
            .json_body(json!({"result": 1}));
    });

    let config = SubmissionConfig::new(server.url("/rest/1/token/crm.lead.add.json"))
        .with_timeout(Duration::from_secs(1));
    let client = BitrixClient::new(config).unwrap();

    let err = client
        .create_lead(&Lead::new("79990001122"))
        .await
        .unwrap_err();

    assert!(matches!(err, ImportError::Transport(ref e) if e.is_timeout()));
    assert_eq!(api_mock.hits(), 1);
}

#[tokio::test]
async fn test_contact_created_on_contact_endpoint() {
    let server = MockServer::start();
    let contact_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/1/token/crm.contact.add.json")
            .json_body(json!({
                "fields": {
                    "NAME": "79990001122",
                    "PHONE": [{"VALUE": "79990001122", "VALUE_TYPE": "WORK"}],
                    "OPENED": "Y"
                }
            }));
        then.status(200).json_body(json!({"result": "88"}));
    });
    let lead_mock = server.mock(|when, then| {
        when.method(POST).path("/rest/1/token/crm.lead.add.json");
        then.status(200).json_body(json!({"result": 1}));
    });

    let client = client_for(&server);
    let id = client.create_contact("79990001122").await.unwrap();

    assert_eq!(id, "88");
    contact_mock.assert();
    assert_eq!(lead_mock.hits(), 0);
}

#[tokio::test]
async fn test_contact_error_status() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/rest/1/token/crm.contact.add.json");
        then.status(401).json_body(json!({"error": "INVALID_CREDENTIALS"}));
    });

    let client = client_for(&server);
    let err = client.create_contact("79990001122").await.unwrap_err();

    assert!(matches!(err, ImportError::ApiStatus { status: 401, .. }));
}
