//! Screening DST command line
//!
//! Reads one turn as JSON on stdin, tracks it against the configured model,
//! and writes the resulting state as JSON on stdout. Logs go to stderr.

use screening_dst::config::Config;
use screening_dst::dst::{
    ExtractionAdapter, LlmExtraction, TurnContext, TurnCoordinator, TurnOutcome,
};
use screening_dst::questionnaire::QuestionnaireState;
use serde::Deserialize;
use std::io::Read;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// One turn as sent by the dialogue service
#[derive(Debug, Deserialize)]
struct TurnRequest {
    /// Previous questionnaire state; a fresh questionnaire when absent
    #[serde(default)]
    status: Option<QuestionnaireState>,
    #[serde(flatten)]
    turn: TurnContext,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "screening_dst=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = Config::from_env()?;
    let llm = config.build_service()?;

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    let request: TurnRequest = serde_json::from_str(&input)?;
    let prior = request.status.unwrap_or_default();

    let extraction = LlmExtraction::new(llm, config.extraction);
    let coordinator = TurnCoordinator::new(ExtractionAdapter::new(
        Arc::new(extraction),
        config.retry,
    ));

    let outcome: TurnOutcome = coordinator.track(&prior, &request.turn).await;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(())
}
