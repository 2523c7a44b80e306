//! Error handling tests for the NOWPayments client

use nowpayments::{ClientConfig, Endpoint, Environment, NowPaymentsClient, NowPaymentsError};

#[test]
fn test_invalid_key_format_error() {
    let error = NowPaymentsClient::new("short-key", false, false).unwrap_err();

    let error_msg = error.to_string();
    assert!(
        error_msg.contains("Incorrect API key format"),
        "Error message MUST mention the key format - actual: {}",
        error_msg
    );
    assert!(
        !error_msg.contains("short-key"),
        "Error message MUST NOT echo the rejected key - actual: {}",
        error_msg
    );
}

#[test]
fn test_invalid_key_in_sandbox_error() {
    let error = NowPaymentsClient::new("abc1234-def5678-ghi9012-jkl345", true, true).unwrap_err();
    assert!(matches!(error, NowPaymentsError::InvalidKeyFormat));
}

#[test]
fn test_unknown_operation_error() {
    let error = "WITHDRAW".parse::<Endpoint>().unwrap_err();

    let error_msg = error.to_string();
    assert!(
        error_msg.contains("Unknown operation"),
        "Error message MUST contain 'Unknown operation' - actual: {}",
        error_msg
    );
    assert!(
        error_msg.contains("WITHDRAW"),
        "Error message MUST contain the operation name - actual: {}",
        error_msg
    );
    assert!(error.is_programmer_error());
}

#[test]
fn test_template_arguments_error() {
    let error = Endpoint::MinAmount.render(&[&"btc"]).unwrap_err();

    let error_msg = error.to_string();
    assert!(
        error_msg.contains("MIN_AMOUNT") && error_msg.contains('2') && error_msg.contains('1'),
        "Error message MUST name the endpoint and both counts - actual: {}",
        error_msg
    );
    assert!(error.is_programmer_error());
}

#[test]
fn test_config_error() {
    let error = NowPaymentsError::config("NOWPAYMENTS_API_KEY must be set");

    let error_msg = error.to_string();
    assert!(
        error_msg.contains("Configuration error"),
        "Error message MUST contain 'Configuration error' - actual: {}",
        error_msg
    );
    assert!(!error.is_programmer_error());
}

#[test]
fn test_invalid_custom_base_url() {
    let config = ClientConfig::new("abc1234-def5678-ghi9012-jkl3456")
        .unwrap()
        .with_environment(Environment::Custom("api.example.com".to_string()));

    let error = NowPaymentsClient::with_config(config).unwrap_err();
    assert!(matches!(error, NowPaymentsError::Config { .. }));
}

#[test]
fn test_json_error_conversion() {
    let parse_error = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
    let error: NowPaymentsError = parse_error.into();

    assert!(
        error.to_string().starts_with("JSON error"),
        "Error message MUST start with 'JSON error' - actual: {}",
        error
    );
}
