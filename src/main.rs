use anyhow::{Context, Result};
use clap::Parser;
use prepdeck::analysis::{AnalysisOrchestrator, HttpAnalysisClient};
use prepdeck::budget::CostLedger;
use prepdeck::reconstruct::SegmentReconstructor;
use prepdeck::transcription::{HttpTranscriptionClient, TranscriptionAcquirer};
use prepdeck::{create_router, AppState, Config};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "prepdeck", about = "Interview practice recording-to-feedback pipeline")]
struct Args {
    /// Config file path (without extension)
    #[arg(long, default_value = "config/prepdeck")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("Prepdeck v0.1.0");
    info!("Loaded config: {}", cfg.service.name);

    let transcription_backend = Arc::new(HttpTranscriptionClient::new(&cfg.transcription)?);
    let acquirer = Arc::new(TranscriptionAcquirer::new(transcription_backend));

    let reconstructor = Arc::new(SegmentReconstructor::new(cfg.reconstruction.clone()));

    let ledger = Arc::new(CostLedger::new(cfg.budget.clone()));
    let analysis_backend = Arc::new(HttpAnalysisClient::new(&cfg.analysis)?);
    let orchestrator = Arc::new(AnalysisOrchestrator::new(
        analysis_backend,
        ledger,
        cfg.analysis.clone(),
    ));

    let state = AppState::new(acquirer, reconstructor, orchestrator);
    let router = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, router)
        .await
        .context("HTTP server failed")?;

    Ok(())
}
