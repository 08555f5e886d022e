// harvest_http.rs — End-to-end harvest flow over the HTTP surface.
//
// Drives the router directly with tower's oneshot: config document →
// compiled policies → router → request/response, covering the success
// path, request decode failure, producer failure, and probe gating.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request as HttpRequest, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use rampart_config::Config;
use rampart_daemon::router;
use rampart_policy::{builtin_probes, builtin_producers, compile};

const CONFIG: &str = r#"
policies:
  - name: frontends
    verify:
      - type: machine-name
        match: "web-*"
    produce:
      - type: template
        products:
          - name: "${machine.name}.conf"
            data: "server_name ${machine.name};"
  - name: everyone
    produce:
      - type: static
        tasks:
          - id: refresh-motd
"#;

fn app(config: &str) -> Router {
    let config = Config::from_yaml(config).unwrap();
    let policies = compile(&config.policies, &builtin_probes(), &builtin_producers()).unwrap();
    router(policies)
}

fn harvest_request(body: &str) -> HttpRequest<Body> {
    HttpRequest::builder()
        .method("POST")
        .uri("/v1/harvest")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(body: Body) -> Value {
    let bytes = to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn harvest_aggregates_matching_policies() {
    let response = app(CONFIG)
        .oneshot(harvest_request(
            r#"{"machine": {"name": "web-03"}, "user": {"name": "deploy"}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.into_body()).await;
    assert_eq!(
        body,
        json!({
            "tasks": [{"id": "refresh-motd"}],
            "products": [{"name": "web-03.conf", "data": "server_name web-03;"}],
        })
    );
}

#[tokio::test]
async fn non_matching_machine_skips_gated_policy() {
    let response = app(CONFIG)
        .oneshot(harvest_request(
            r#"{"machine": {"name": "db-01"}, "user": {"name": "deploy"}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.into_body()).await;
    assert_eq!(body["products"], json!([]));
    assert_eq!(body["tasks"], json!([{"id": "refresh-motd"}]));
}

#[tokio::test]
async fn malformed_body_is_a_structured_400() {
    let response = app(CONFIG)
        .oneshot(harvest_request("{not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response.into_body()).await;
    assert_eq!(body, json!({"error": "bad request body"}));
}

#[tokio::test]
async fn missing_identity_fields_are_a_structured_400() {
    let response = app(CONFIG)
        .oneshot(harvest_request(r#"{"machine": {"name": "web-03"}}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn producer_failure_is_a_structured_500_with_no_partial_output() {
    // First policy emits output, second policy's producer fails at request
    // time (unresolvable placeholder). The caller must see only the error.
    let config = r#"
policies:
  - name: first
    produce:
      - type: static
        tasks:
          - id: t1
  - name: second
    produce:
      - type: template
        products:
          - name: broken
            data: "${machine.rack}"
"#;
    let response = app(config)
        .oneshot(harvest_request(
            r#"{"machine": {"name": "web-03"}, "user": {"name": "deploy"}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("template"));
    assert!(body.get("tasks").is_none());
}

#[tokio::test]
async fn empty_policy_set_yields_empty_aggregate() {
    let response = app("policies: []")
        .oneshot(harvest_request(
            r#"{"machine": {"name": "any"}, "user": {"name": "any"}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.into_body()).await;
    assert_eq!(body, json!({"tasks": [], "products": []}));
}

#[tokio::test]
async fn healthz_responds() {
    let response = app("policies: []")
        .oneshot(
            HttpRequest::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
