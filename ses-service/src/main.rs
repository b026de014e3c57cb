//! SES Service dry-run entry point.
//!
//! Usage: `ses-service <sheet.json> [CREATE|EDIT|APPROVE|REJECT] [comment]`
//!
//! Builds the submission payload for a sheet exported as JSON, sends it to
//! the logging mock gateway and prints it.

use ses_service::config::SesConfig;
use ses_service::models::{ServiceEntrySheet, SubmissionAction};
use ses_service::services::{build_payload, init_metrics, MockGateway, SesGateway};

use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load configuration
    let config = SesConfig::from_env().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    // Initialize tracing
    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    );

    tracing::info!(
        version = %config.service_version,
        environment = %config.common.environment,
        "Starting ses-service"
    );

    // Initialize metrics
    init_metrics();

    let mut args = std::env::args().skip(1);
    let path = args.next().ok_or_else(|| {
        std::io::Error::other("Usage: ses-service <sheet.json> [action] [comment]")
    })?;
    let action = match args.next() {
        Some(raw) => SubmissionAction::from_string(&raw)
            .ok_or_else(|| std::io::Error::other(format!("Unknown action '{}'", raw)))?,
        None => SubmissionAction::Create,
    };
    let comment = args.next();

    let raw = tokio::fs::read_to_string(&path).await?;
    let sheet: ServiceEntrySheet = serde_json::from_str(&raw).map_err(|e| {
        tracing::error!(path = %path, error = %e, "Failed to parse sheet");
        std::io::Error::other(format!("Invalid sheet file: {}", e))
    })?;

    let payload = build_payload(&sheet, action, comment.as_deref()).map_err(|e| {
        tracing::error!(action = action.as_str(), kind = e.kind(), error = %e, "Payload rejected");
        std::io::Error::other(e.to_string())
    })?;

    let gateway = MockGateway::new();
    let response = gateway.submit(&payload).await.map_err(|e| {
        tracing::error!(error = %e, "Submission failed");
        std::io::Error::other(e.to_string())
    })?;
    tracing::info!(return_message = %response.return_message, "Dry run complete");

    let json = serde_json::to_string_pretty(&payload)?;
    println!("{}", json);
    Ok(())
}
