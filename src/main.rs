use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use microgpt_viz::{HttpBackend, PacingConfig, PipelineConfig, PipelineController, Stage};

#[derive(Parser, Debug)]
#[command(name = "microgpt-viz")]
#[command(about = "Watch a character-level GPT generate, one stage at a time")]
struct Args {
    /// Prefix to complete (lowercased, non-letters stripped)
    #[arg(short, long, default_value = "")]
    prefix: String,

    /// Sampling temperature, 0.1 to 1.5
    #[arg(short, long, default_value = "0.5")]
    temperature: f32,

    /// Backend base URL
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    api: String,

    /// Skip the visualization pacing delays
    #[arg(long)]
    fast: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let pacing = if args.fast {
        PacingConfig::instant()
    } else {
        PipelineConfig::default().pacing
    };

    let controller = Arc::new(PipelineController::new(HttpBackend::new(args.api), pacing));
    controller.init_vocab().await;

    // Print each stage transition as the run advances.
    let mut updates = controller.subscribe();
    let watcher = tokio::spawn(async move {
        let mut last_stage = Stage::Idle;
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            if snapshot.stage != last_stage {
                last_stage = snapshot.stage;
                println!("[{}] {}", snapshot.stage.ordinal(), snapshot.stage.as_str());
            }
            if snapshot.stage == Stage::Generating {
                println!("    word so far: {}", snapshot.generation.word);
            }
        }
    });

    controller.start_run(&args.prefix, args.temperature).await;

    let snapshot = controller.snapshot();
    if snapshot.result.is_empty() {
        println!("no result produced");
    } else {
        println!("result: {}", snapshot.result);
    }
    watcher.abort();
}
