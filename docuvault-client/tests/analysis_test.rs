//! Tests for the analysis wait flow against a mock backend: the probe
//! loop observes completion, gives up on budget exhaustion, and aborts on
//! probe failure.

mod common;

use common::*;
use docuvault_client::services::analysis::{analyze_and_wait, wait_for_analysis};
use docuvault_client::{ApiError, PollConfig};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn wait_observes_completion_once_analysis_attaches() {
    let server = MockServer::start().await;
    // The first two probes see the document unanalyzed; the third gets
    // the attached analysis.
    Mock::given(method("GET"))
        .and(path("/api/documents/d1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document_json("d1", false)))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/documents/d1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document_json("d1", true)))
        .mount(&server)
        .await;

    let test = authenticated_client(&server.uri(), "access-1", "refresh-1");
    let outcome = wait_for_analysis(&test.client, "d1", &PollConfig::quick())
        .await
        .unwrap();

    let analysis = outcome.completed().unwrap();
    assert_eq!(analysis.summary, "A yearly summary.");
}

#[tokio::test]
async fn wait_gives_up_when_the_budget_runs_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/documents/d1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document_json("d1", false)))
        .expect(3)
        .mount(&server)
        .await;

    let test = authenticated_client(&server.uri(), "access-1", "refresh-1");
    let outcome = wait_for_analysis(&test.client, "d1", &PollConfig::quick())
        .await
        .unwrap();

    assert!(outcome.is_exhausted());
}

#[tokio::test]
async fn probe_failure_aborts_the_wait() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/documents/d1/"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "detail": "Not found." })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let test = authenticated_client(&server.uri(), "access-1", "refresh-1");
    let err = wait_for_analysis(&test.client, "d1", &PollConfig::quick())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Api {
            status: 404,
            message: "Not found.".into()
        }
    );
}

#[tokio::test]
async fn analyze_and_wait_queues_then_waits() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/documents/d1/analyze/"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "message": "Analysis queued",
            "task_id": "t1",
            "document_id": "d1"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/documents/d1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document_json("d1", true)))
        .expect(1)
        .mount(&server)
        .await;

    let test = authenticated_client(&server.uri(), "access-1", "refresh-1");
    let outcome = analyze_and_wait(&test.client, "d1", &PollConfig::quick())
        .await
        .unwrap();

    assert!(outcome.completed().is_some());
}
