//! Authentication flow integration tests.

use std::time::Duration;

use serde_json::{Value, json};

use af_server::ServerConfig;

use crate::common::{BASIC_AUTHENTICATOR_ID, REDIRECT_URI, TestEnv};

fn remaining_attempts(body: &Value) -> Option<&str> {
    body["messages"][0]["context"]
        .as_array()?
        .iter()
        .find(|entry| entry["key"] == "remainingAttempts")?["value"]
        .as_str()
}

/// Tests the happy path: initiate, then authenticate with valid credentials.
#[tokio::test]
async fn test_successful_authentication() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let response = env
        .client
        .get(env.url("/authorize"))
        .query(&[
            ("response_type", "code"),
            ("client_id", "test-client"),
            ("response_mode", "direct"),
            ("redirect_uri", REDIRECT_URI),
            ("state", "xyz"),
        ])
        .send()
        .await?;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await?;
    assert_eq!(body["flowStatus"], "INCOMPLETE");
    assert_eq!(body["flowType"], "AUTHENTICATION");
    assert_eq!(body["nextStep"]["stepType"], "AUTHENTICATOR_PROMPT");
    let authenticator = &body["nextStep"]["authenticators"][0];
    assert_eq!(authenticator["authenticatorId"], BASIC_AUTHENTICATOR_ID);
    assert_eq!(authenticator["authenticator"], "Username & Password");
    assert_eq!(authenticator["idp"], "LOCAL");
    assert_eq!(
        authenticator["requiredParams"],
        json!(["username", "password"])
    );
    assert_eq!(body["links"][0]["name"], "authentication");
    assert_eq!(body["links"][0]["href"], "/authn");
    assert_eq!(body["links"][0]["method"], "POST");

    let flow_id = body["flowId"].as_str().unwrap_or_default();
    let (status, body) = env.submit(flow_id, "admin", "admin").await?;

    assert_eq!(status, 200);
    assert_eq!(body["flowStatus"], "SUCCESS_COMPLETED");
    assert_eq!(body["authData"]["state"], "xyz");
    let code = body["authData"]["code"].as_str().unwrap_or_default();
    assert_eq!(code.len(), 32);
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));

    Ok(())
}

/// Tests that a POSTed form starts a flow like the query form does.
#[tokio::test]
async fn test_authorize_form_post() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let response = env
        .client
        .post(env.url("/authorize"))
        .form(&[
            ("response_type", "code"),
            ("client_id", "test-client"),
            ("response_mode", "direct"),
            ("redirect_uri", REDIRECT_URI),
        ])
        .send()
        .await?;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await?;
    assert_eq!(body["flowStatus"], "INCOMPLETE");
    assert!(uuid::Uuid::parse_str(body["flowId"].as_str().unwrap_or_default()).is_ok());

    Ok(())
}

/// Tests that a failed attempt keeps the flow usable.
#[tokio::test]
async fn test_failure_then_success() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let flow_id = env.start_flow("s1").await?;

    let (status, body) = env.submit(&flow_id, "admin", "wrong").await?;
    assert_eq!(status, 200);
    assert_eq!(body["flowStatus"], "FAIL_INCOMPLETE");
    assert_eq!(body["flowId"], flow_id.as_str());
    assert_eq!(body["nextStep"]["authenticators"][0]["authenticatorId"], BASIC_AUTHENTICATOR_ID);
    assert_eq!(body["messages"][0]["type"], "ERROR");
    assert_eq!(body["messages"][0]["messageId"], "msg_invalid_un_pw");
    assert_eq!(remaining_attempts(&body), Some("2"));

    let (status, body) = env.submit(&flow_id, "admin", "admin").await?;
    assert_eq!(status, 200);
    assert_eq!(body["flowStatus"], "SUCCESS_COMPLETED");
    assert_eq!(body["authData"]["state"], "s1");

    Ok(())
}

/// Tests the remaining-attempts countdown and lockout.
#[tokio::test]
async fn test_attempts_exhausted() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let flow_id = env.start_flow("s1").await?;

    for expected in ["2", "1", "0"] {
        let (status, body) = env.submit(&flow_id, "admin", "wrong").await?;
        assert_eq!(status, 200);
        assert_eq!(body["flowStatus"], "FAIL_INCOMPLETE");
        assert_eq!(remaining_attempts(&body), Some(expected));
    }

    // Correct credentials no longer help.
    let (status, body) = env.submit(&flow_id, "admin", "admin").await?;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "ABA-40005");

    Ok(())
}

/// Tests that a completed flow cannot be authenticated again.
#[tokio::test]
async fn test_completed_flow_rejected() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let flow_id = env.start_flow("s1").await?;

    let (_, body) = env.submit(&flow_id, "admin", "admin").await?;
    assert_eq!(body["flowStatus"], "SUCCESS_COMPLETED");

    let (status, body) = env.submit(&flow_id, "admin", "admin").await?;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "ABA-40004");

    Ok(())
}

/// Tests the error envelope for each client error.
#[tokio::test]
async fn test_error_responses() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    // ABA-40000: missing authorize parameters
    let response = env
        .client
        .get(env.url("/authorize"))
        .query(&[("response_type", "code"), ("client_id", "test-client")])
        .send()
        .await?;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await?;
    assert_eq!(body["code"], "ABA-40000");
    assert_eq!(body["message"], "Invalid request parameters");
    assert_eq!(body["description"], "Missing or invalid required parameters");
    assert!(uuid::Uuid::parse_str(body["traceId"].as_str().unwrap_or_default()).is_ok());

    // ABA-40000: unsupported response mode
    let response = env
        .client
        .get(env.url("/authorize"))
        .query(&[
            ("response_type", "code"),
            ("client_id", "test-client"),
            ("response_mode", "form_post"),
            ("redirect_uri", REDIRECT_URI),
        ])
        .send()
        .await?;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await?;
    assert_eq!(body["code"], "ABA-40000");

    // ABA-40001: missing selectedAuthenticator
    let flow_id = env.start_flow("s1").await?;
    let (status, body) = env.post_authn(&json!({"flowId": flow_id})).await?;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "ABA-40001");

    // ABA-40002: unknown flow
    let (status, body) = env
        .submit(&uuid::Uuid::new_v4().to_string(), "admin", "admin")
        .await?;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "ABA-40002");
    assert_eq!(body["message"], "Invalid flow ID");

    // ABA-40003: unknown authenticator
    let (status, body) = env
        .post_authn(&json!({
            "flowId": flow_id,
            "selectedAuthenticator": {
                "authenticatorId": "Tm9wZTpMT0NBTA",
                "params": {"username": "admin", "password": "admin"}
            }
        }))
        .await?;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "ABA-40003");

    // None of the rejections above consumed an attempt.
    let (_, body) = env.submit(&flow_id, "admin", "wrong").await?;
    assert_eq!(remaining_attempts(&body), Some("2"));

    Ok(())
}

/// Tests that every error carries a distinct trace id.
#[tokio::test]
async fn test_trace_ids_unique() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let mut seen = Vec::new();
    for _ in 0..3 {
        let (_, body) = env.post_authn(&json!({})).await?;
        let trace_id = body["traceId"].as_str().unwrap_or_default().to_string();
        assert!(!seen.contains(&trace_id));
        seen.push(trace_id);
    }

    Ok(())
}

/// Tests that flows are rejected once their lifespan has passed.
#[tokio::test]
async fn test_expired_flow_rejected() -> anyhow::Result<()> {
    let config = ServerConfig {
        flow_lifespan: 1,
        sweep_interval: 1,
        ..ServerConfig::for_testing()
    };
    let env = TestEnv::with_config(config).await?;
    let flow_id = env.start_flow("s1").await?;

    tokio::time::sleep(Duration::from_millis(2500)).await;

    let (status, body) = env.submit(&flow_id, "admin", "admin").await?;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "ABA-40002");

    Ok(())
}

/// Tests that concurrent flows do not interfere with each other.
#[tokio::test]
async fn test_concurrent_flows() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let mut flows = Vec::new();
    for i in 0..8 {
        flows.push(env.start_flow(&format!("state-{i}")).await?);
    }

    let mut handles = Vec::new();
    for (i, flow_id) in flows.into_iter().enumerate() {
        let client = env.client.clone();
        let url = env.url("/authn");
        handles.push(tokio::spawn(async move {
            let password = if i % 2 == 0 { "admin" } else { "wrong" };
            let body: Value = client
                .post(url)
                .json(&json!({
                    "flowId": flow_id,
                    "selectedAuthenticator": {
                        "authenticatorId": BASIC_AUTHENTICATOR_ID,
                        "params": {"username": "admin", "password": password}
                    }
                }))
                .send()
                .await?
                .json()
                .await?;
            anyhow::Ok((i, body))
        }));
    }

    for handle in handles {
        let (i, body) = handle.await??;
        if i % 2 == 0 {
            assert_eq!(body["flowStatus"], "SUCCESS_COMPLETED");
            assert_eq!(body["authData"]["state"], format!("state-{i}"));
        } else {
            assert_eq!(body["flowStatus"], "FAIL_INCOMPLETE");
            assert_eq!(remaining_attempts(&body), Some("2"));
        }
    }

    Ok(())
}
