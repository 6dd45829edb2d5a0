use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use chat_router::{
    CannedWeather, GeminiClassifier, KeywordClassifier, OutboundMessage, Router, WttrWeather,
};
use device_control::{
    BridgeCamera, BridgeSwitch, DeviceActuator, MockCamera, MockSwitch, SnapshotStore,
};

#[derive(Parser)]
#[command(name = "homelink-daemon")]
#[command(about = "HomeLink chat front-end for smart-home devices")]
struct Cli {
    /// Classifier backend
    #[arg(long, value_enum, default_value_t = ClassifierKind::Mock)]
    classifier: ClassifierKind,

    /// Primary model for the hosted classifier
    #[arg(long, default_value = "gemini-2.0-flash")]
    model: String,

    /// Secondary model retried once when the primary fails
    #[arg(long)]
    fallback_model: Option<String>,

    /// Device backend
    #[arg(long, value_enum, default_value_t = DeviceBackend::Mock)]
    device_backend: DeviceBackend,

    /// Base URL of the device bridge
    #[arg(long, default_value = "http://127.0.0.1:8765")]
    bridge_endpoint: String,

    /// Where the latest snapshot is stored
    #[arg(long, default_value = "snapshots/latest.jpg")]
    snapshot_path: PathBuf,

    /// Public URL the stored snapshot is served under
    #[arg(long)]
    snapshot_url: Option<String>,

    /// Use live weather lookups instead of a canned report
    #[arg(long)]
    live_weather: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ClassifierKind {
    Mock,
    Gemini,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum DeviceBackend {
    Mock,
    Bridge,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat loop on stdin (default)
    Chat,
    /// Run one raw compound command, bypassing the classifier
    Exec { cmd: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();
    let cli = Cli::parse();

    let actuator = build_actuator(&cli)?;
    match cli.command {
        Some(Commands::Exec { ref cmd }) => {
            let actions = action_grammar::parse(cmd);
            let outcome = actuator.execute_with_fallback(&actions).await;
            println!("{}", outcome.summary());
        }
        Some(Commands::Chat) | None => {
            let router = build_router(&cli, actuator)?;
            chat_loop(router).await?;
        }
    }
    Ok(())
}

fn build_actuator(cli: &Cli) -> Result<Arc<DeviceActuator>> {
    if let Some(parent) = cli.snapshot_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating snapshot dir {}", parent.display()))?;
        }
    }
    let snapshots = Arc::new(SnapshotStore::new(cli.snapshot_path.clone()));

    let actuator = match cli.device_backend {
        DeviceBackend::Mock => {
            info!("using mock devices");
            DeviceActuator::new(
                Arc::new(MockCamera::bright()),
                Arc::new(MockSwitch::new("lamp")),
                Arc::new(MockSwitch::new("plug")),
                snapshots,
            )
        }
        DeviceBackend::Bridge => {
            info!(endpoint = %cli.bridge_endpoint, "using device bridge");
            DeviceActuator::new(
                Arc::new(BridgeCamera::new(&cli.bridge_endpoint)?),
                Arc::new(BridgeSwitch::new(&cli.bridge_endpoint, "lamp")?),
                Arc::new(BridgeSwitch::new(&cli.bridge_endpoint, "plug")?),
                snapshots,
            )
        }
    };
    Ok(Arc::new(actuator))
}

fn build_router(cli: &Cli, actuator: Arc<DeviceActuator>) -> Result<Router> {
    let mut router = match cli.classifier {
        ClassifierKind::Mock => {
            info!("using keyword classifier");
            Router::new(Arc::new(KeywordClassifier::new()?), actuator)
        }
        ClassifierKind::Gemini => {
            let api_key = match std::env::var("GEMINI_API_KEY") {
                Ok(key) if !key.is_empty() => key,
                _ => bail!("GEMINI_API_KEY must be set for the gemini classifier"),
            };
            info!(model = %cli.model, "using hosted classifier");
            let mut r = Router::new(
                Arc::new(GeminiClassifier::new(&cli.model, &api_key)?),
                actuator,
            );
            if let Some(fallback) = &cli.fallback_model {
                info!(model = %fallback, "secondary classifier configured");
                r = r.with_secondary(Arc::new(GeminiClassifier::new(fallback, &api_key)?));
            }
            r
        }
    };

    router = if cli.live_weather {
        router.with_weather(Arc::new(WttrWeather::new()?))
    } else {
        router.with_weather(Arc::new(CannedWeather::new("晴 28°C（示範）")))
    };

    if let Some(url) = &cli.snapshot_url {
        router = router.with_snapshot_url(url);
    }
    Ok(router)
}

async fn chat_loop(router: Router) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    info!("chat loop started, ctrl-d or \"exit\" to quit");
    stdout.write_all(b"> ").await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let utterance = line.trim();
        if utterance.eq_ignore_ascii_case("exit") || utterance.eq_ignore_ascii_case("quit") {
            break;
        }
        if !utterance.is_empty() {
            for message in router.route(utterance).await {
                match message {
                    OutboundMessage::Text(text) => {
                        stdout.write_all(text.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                    }
                    OutboundMessage::Image(url) => {
                        stdout.write_all(format!("[image] {url}\n").as_bytes()).await?;
                    }
                }
            }
        }
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
    }
    Ok(())
}

fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
