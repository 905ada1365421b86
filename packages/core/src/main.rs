use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use dotenvy::dotenv;
use tokio::{signal, time};

use alert_queue::alerts::AlertManager;
use alert_queue::cli::Cli;
use alert_queue::config::Config;
use alert_queue::error::AppError;
use alert_queue::logging::init_logging;
use alert_queue::metrics::AlertMetrics;
use alert_queue::renderer::ConsoleRenderer;
use alert_queue::script::AlertScript;

/// How often `main` checks whether the queue has drained.
const IDLE_POLL: Duration = Duration::from_millis(50);

#[tokio::main]
async fn main() {
    dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli).await {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = Config::from_env()?.with_cli(&cli);
    tracing::info!("Alert queue demo started with config: {:?}", config);

    let mut script = match &cli.script {
        Some(path) => AlertScript::load(path)?,
        None => AlertScript::default(),
    };
    script.extend(AlertScript::from_titles(cli.titles.iter().cloned()));
    if script.is_empty() {
        return Err(AppError::Config(
            "nothing to show: pass alert titles or --script <file>".to_string(),
        ));
    }

    let metrics = Arc::new(AlertMetrics::new()?);
    let manager = AlertManager::with_metrics(config.manager(), metrics.clone());
    let renderer = ConsoleRenderer::attach(&manager, config.render_hold);

    tokio::select! {
        _ = play_until_idle(&manager, &script) => {
            tracing::info!("All {} alerts shown", renderer.shown());
        }

        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown signal received. Abandoning queued alerts.");
            manager.cancel_scheduled_promotion();
        }
    }

    renderer.detach();

    if cli.print_metrics {
        println!("{}", metrics.render()?);
    }
    Ok(())
}

async fn play_until_idle(manager: &AlertManager, script: &AlertScript) {
    script.play(manager).await;
    while !manager.is_idle() {
        time::sleep(IDLE_POLL).await;
    }
}
