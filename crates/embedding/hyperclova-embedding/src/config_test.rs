//! Unit tests for configuration resolution and validation.
//!
//! Most tests inject an environment through `build_with_env` so they do not touch process
//! env vars; the one test that reads the real environment runs under `#[serial]`.

use std::collections::HashMap;

use serial_test::serial;

use crate::config::*;
use crate::error::HyperClovaError;

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

fn full_env() -> impl Fn(&str) -> Option<String> {
    env_of(&[
        (API_KEY_ENV, "env-api-key"),
        (API_GATEWAY_KEY_ENV, "env-gw-key"),
        (APP_ID_ENV, "env-app-id"),
    ])
}

fn assert_configuration_error(result: crate::error::Result<HyperClovaConfig>, needle: &str) {
    match result {
        Err(HyperClovaError::Configuration(msg)) => {
            assert!(msg.contains(needle), "message {:?} should mention {:?}", msg, needle)
        }
        other => panic!("expected configuration error, got {:?}", other),
    }
}

#[test]
fn test_build_from_env_with_defaults() {
    let config = HyperClovaConfig::builder().build_with_env(full_env()).unwrap();

    assert_eq!(config.model(), HyperClovaModel::ClirEmbDolphin);
    assert_eq!(config.api_key().expose_secret(), "env-api-key");
    assert_eq!(config.api_gateway_key().expose_secret(), "env-gw-key");
    assert_eq!(config.app_id().expose_secret(), "env-app-id");
    assert_eq!(config.api_host(), DEFAULT_API_HOST);
}

#[test]
fn test_explicit_values_win_over_env() {
    let config = HyperClovaConfig::builder()
        .model("clir-sts-dolphin")
        .api_key("explicit-key")
        .app_id("explicit-app")
        .api_host("example.test")
        .build_with_env(full_env())
        .unwrap();

    assert_eq!(config.model(), HyperClovaModel::ClirStsDolphin);
    assert_eq!(config.api_key().expose_secret(), "explicit-key");
    assert_eq!(config.api_gateway_key().expose_secret(), "env-gw-key");
    assert_eq!(config.app_id().expose_secret(), "explicit-app");
    assert_eq!(config.api_host(), "example.test");
}

#[test]
fn test_missing_secret_fails() {
    let lookup = env_of(&[(API_KEY_ENV, "k"), (APP_ID_ENV, "a")]);
    assert_configuration_error(
        HyperClovaConfig::builder().build_with_env(lookup),
        API_GATEWAY_KEY_ENV,
    );

    let lookup = env_of(&[(API_KEY_ENV, "k"), (API_GATEWAY_KEY_ENV, "g")]);
    assert_configuration_error(HyperClovaConfig::builder().build_with_env(lookup), APP_ID_ENV);

    assert_configuration_error(
        HyperClovaConfig::builder().build_with_env(|_| None),
        API_KEY_ENV,
    );
}

#[test]
fn test_blank_secret_counts_as_missing() {
    let lookup = env_of(&[
        (API_KEY_ENV, "   "),
        (API_GATEWAY_KEY_ENV, "g"),
        (APP_ID_ENV, "a"),
    ]);
    assert_configuration_error(
        HyperClovaConfig::builder().api_key("").build_with_env(lookup),
        API_KEY_ENV,
    );
}

#[test]
fn test_unknown_model_fails() {
    assert_configuration_error(
        HyperClovaConfig::builder()
            .model("not-a-model")
            .build_with_env(full_env()),
        "not-a-model",
    );
}

#[test]
fn test_model_from_env_var() {
    let lookup = env_of(&[
        (API_KEY_ENV, "k"),
        (API_GATEWAY_KEY_ENV, "g"),
        (APP_ID_ENV, "a"),
        (MODEL_ENV, "clir-sts-dolphin"),
    ]);
    let config = HyperClovaConfig::builder().build_with_env(lookup).unwrap();
    assert_eq!(config.model(), HyperClovaModel::ClirStsDolphin);
}

#[test]
fn test_model_round_trips_through_str() {
    for model in HyperClovaModel::ALL {
        assert_eq!(model.as_str().parse::<HyperClovaModel>().unwrap(), model);
        assert_eq!(model.to_string(), model.as_str());
    }
}

#[test]
fn test_endpoint_url() {
    let config = HyperClovaConfig::builder()
        .model(HyperClovaModel::ClirStsDolphin)
        .build_with_env(full_env())
        .unwrap();
    assert_eq!(
        config.endpoint_url().as_str(),
        "https://clovastudio.apigw.ntruss.com/testapp/v1/api-tools/embedding/clir-sts-dolphin/env-app-id"
    );

    let config = HyperClovaConfig::builder()
        .api_host("http://127.0.0.1:1234/")
        .build_with_env(full_env())
        .unwrap();
    assert_eq!(
        config.endpoint_url().as_str(),
        "http://127.0.0.1:1234/testapp/v1/api-tools/embedding/clir-emb-dolphin/env-app-id"
    );
}

#[test]
fn test_endpoint_url_escapes_app_id() {
    let config = HyperClovaConfig::builder()
        .app_id("team/app?x=1#frag")
        .build_with_env(full_env())
        .unwrap();

    let url = config.endpoint_url();
    assert_eq!(
        url.path(),
        "/testapp/v1/api-tools/embedding/clir-emb-dolphin/team%2Fapp%3Fx=1%23frag"
    );
    assert!(url.query().is_none());
    assert!(url.fragment().is_none());
}

#[test]
fn test_model_must_match_exactly() {
    assert!(" clir-emb-dolphin ".parse::<HyperClovaModel>().is_err());
    assert!("CLIR-EMB-DOLPHIN".parse::<HyperClovaModel>().is_err());
    assert_configuration_error(
        HyperClovaConfig::builder()
            .model("clir-sts-dolphin ")
            .build_with_env(full_env()),
        "clir-sts-dolphin",
    );
}

#[test]
fn test_credential_not_usable_as_header_fails_at_build() {
    assert_configuration_error(
        HyperClovaConfig::builder()
            .api_key("bad\nkey")
            .build_with_env(full_env()),
        API_KEY_ENV,
    );
    assert_configuration_error(
        HyperClovaConfig::builder()
            .api_gateway_key("gw\u{7f}")
            .build_with_env(full_env()),
        API_GATEWAY_KEY_ENV,
    );
}

#[test]
fn test_plain_http_only_for_loopback() {
    for host in ["http://127.0.0.1:8080", "http://localhost:3000", "http://[::1]:9000"] {
        assert!(
            HyperClovaConfig::builder()
                .api_host(host)
                .build_with_env(full_env())
                .is_ok(),
            "{} should be accepted",
            host
        );
    }

    assert_configuration_error(
        HyperClovaConfig::builder()
            .api_host("http://clovastudio.apigw.ntruss.com")
            .build_with_env(full_env()),
        "https",
    );

    let lookup = env_of(&[
        (API_KEY_ENV, "k"),
        (API_GATEWAY_KEY_ENV, "g"),
        (APP_ID_ENV, "a"),
        (API_HOST_ENV, "http://proxy.example.com"),
    ]);
    assert_configuration_error(HyperClovaConfig::builder().build_with_env(lookup), "https");
}

#[test]
fn test_https_host_accepted() {
    let config = HyperClovaConfig::builder()
        .api_host("https://gateway.example.com")
        .build_with_env(full_env())
        .unwrap();
    assert!(config
        .endpoint_url()
        .as_str()
        .starts_with("https://gateway.example.com/testapp/"));
}

#[test]
fn test_debug_output_redacts_secrets() {
    let config = HyperClovaConfig::builder().build_with_env(full_env()).unwrap();

    let debug = format!("{:?}", config);
    assert!(!debug.contains("env-api-key"));
    assert!(!debug.contains("env-gw-key"));
    assert!(!debug.contains("env-app-id"));
    assert!(debug.contains("[REDACTED]"));
    assert_eq!(config.api_key().to_string(), "[REDACTED]");
}

#[test]
#[serial]
fn test_from_env_reads_process_environment() {
    std::env::set_var(API_KEY_ENV, "proc-key");
    std::env::set_var(API_GATEWAY_KEY_ENV, "proc-gw");
    std::env::set_var(APP_ID_ENV, "proc-app");
    std::env::remove_var(MODEL_ENV);
    std::env::remove_var(API_HOST_ENV);

    let config = HyperClovaConfig::from_env();

    std::env::remove_var(API_KEY_ENV);
    std::env::remove_var(API_GATEWAY_KEY_ENV);
    std::env::remove_var(APP_ID_ENV);

    let config = config.unwrap();
    assert_eq!(config.api_key().expose_secret(), "proc-key");
    assert_eq!(config.app_id().expose_secret(), "proc-app");
    assert_eq!(config.model(), HyperClovaModel::default());
}
