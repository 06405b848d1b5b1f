use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fluency_coach::{
    AssessmentContext, AssessmentKind, CaptureConfig, CoachController, Config, ConsoleRenderer,
    HttpCoachApi, MicBackend, Notifier, PracticeKind, RecordingContext,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "fluency-coach", about = "English fluency assessment and practice")]
struct Cli {
    /// Config file path (without extension).
    #[arg(long, default_value = "config/fluency-coach")]
    config: String,

    /// Override the analysis service base URL.
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record once and run a speech assessment.
    Assess {
        /// Assessment type: quick, comprehensive, or topic.
        #[arg(long, default_value = "quick")]
        kind: AssessmentKind,
        /// Topic to speak about (required for topic assessments).
        #[arg(long)]
        topic: Option<String>,
        /// How long to record, in seconds.
        #[arg(long, default_value_t = 30)]
        seconds: u64,
    },
    /// Run a practice session: prompt, recording, transcription, coaching.
    Practice {
        /// Practice type: conversation, pronunciation, vocabulary,
        /// storytelling, presentation, or song_analysis.
        #[arg(long, default_value = "conversation")]
        kind: PracticeKind,
        /// Proficiency level sent with prompt and coaching requests.
        #[arg(long)]
        level: Option<String>,
        /// Topic sent with prompt and coaching requests.
        #[arg(long)]
        topic: Option<String>,
        /// How long to record, in seconds.
        #[arg(long, default_value_t = 30)]
        seconds: u64,
        /// Skip the coaching request after transcription.
        #[arg(long)]
        no_coaching: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config).unwrap_or_else(|e| {
        info!("No config loaded ({e}); using defaults");
        Config::default()
    });
    let base_url = cli.base_url.unwrap_or_else(|| cfg.service.base_url.clone());

    info!("{} starting", cfg.service.name);
    info!("Analysis service: {base_url}");

    let capture_config = CaptureConfig {
        sample_rate: cfg.audio.sample_rate,
        channels: cfg.audio.channels,
        fragment_ms: cfg.audio.fragment_ms,
    };
    let controller = CoachController::new(
        Box::new(MicBackend::new(capture_config.clone())),
        capture_config,
        Arc::new(HttpCoachApi::new(base_url)),
        Arc::new(ConsoleRenderer::new()),
        Notifier::default(),
    );

    controller.check_microphone().await;

    match cli.command {
        Command::Assess {
            kind,
            topic,
            seconds,
        } => {
            let context = AssessmentContext::new(kind, topic)?;
            controller.select_assessment(context.clone()).await;
            controller
                .start_recording(RecordingContext::Assessment(context))
                .await
                .context("failed to start assessment recording")?;
            tokio::time::sleep(Duration::from_secs(seconds)).await;
            controller.stop_recording().await;
        }
        Command::Practice {
            kind,
            level,
            topic,
            seconds,
            no_coaching,
        } => {
            let level = level.unwrap_or_else(|| cfg.practice.level.clone());
            let topic = topic.unwrap_or_else(|| cfg.practice.topic.clone());
            controller.select_practice(kind, level, topic).await;
            controller
                .start_recording(RecordingContext::Practice)
                .await
                .context("failed to start practice recording")?;
            tokio::time::sleep(Duration::from_secs(seconds)).await;
            controller.stop_recording().await;
            if !no_coaching {
                controller.request_coaching().await;
            }
        }
    }

    Ok(())
}
