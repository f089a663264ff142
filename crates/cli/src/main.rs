mod config;
mod key_commands;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use {
    anyhow::{Context, bail},
    clap::{Parser, Subcommand},
    narrator_studio::Studio,
    narrator_vault::SqliteStore,
    narrator_voice::{AudioFormat, GeminiTts, RetryPolicy, TtsProvider},
    secrecy::Secret,
    tracing::{debug, info},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use crate::config::NarratorConfig;

#[derive(Parser)]
#[command(name = "narrator", about = "Narrator: text to speech with a sealed API key")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file (overrides discovery of narrator.toml).
    #[arg(long, global = true, env = "NARRATOR_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the key database (overrides config value).
    #[arg(long, global = true, env = "NARRATOR_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Password sealing the stored API key.
    #[arg(long, global = true, env = "NARRATOR_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the stored API key.
    Key {
        #[command(subcommand)]
        action: key_commands::KeyAction,
    },
    /// List available voices.
    Voices,
    /// Generate speech and write it as a WAV file.
    Speak {
        /// Prompt to speak. Style directions may be included inline.
        #[arg(short, long)]
        text: String,
        /// Prebuilt voice name.
        #[arg(long)]
        voice: Option<String>,
        /// Output file. Defaults to `narration.wav`.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn build_provider(config: &NarratorConfig) -> anyhow::Result<Arc<dyn TtsProvider>> {
    match config.tts.provider.as_str() {
        "gemini" => Ok(Arc::new(GeminiTts::new(
            &config.tts.gemini,
            RetryPolicy::from(&config.tts.retry),
        ))),
        other => bail!("unknown tts provider: {other}"),
    }
}

async fn build_studio(cli: &Cli, config: &NarratorConfig) -> anyhow::Result<Studio> {
    let db_path = config.database_path(cli.data_dir.as_deref())?;
    debug!(path = %db_path.display(), "opening key store");
    let store = SqliteStore::open(&db_path)
        .await
        .with_context(|| format!("failed to open {}", db_path.display()))?;

    // Only `key set` and `speak` touch the cipher; the others accept a
    // missing password.
    let password = cli.password.clone().unwrap_or_default();

    Ok(
        Studio::new(Arc::new(store), build_provider(config)?, Secret::new(password))
            .with_max_text_length(config.tts.max_text_length),
    )
}

/// `--out`, or `narration.<ext>` for the produced format.
fn output_path(out: Option<&Path>, format: AudioFormat) -> PathBuf {
    out.map_or_else(
        || PathBuf::from(format!("narration.{}", format.extension())),
        Path::to_path_buf,
    )
}

fn require_password(cli: &Cli) -> anyhow::Result<()> {
    match cli.password.as_deref() {
        Some(p) if !p.is_empty() => Ok(()),
        _ => bail!("a password is required: pass --password or set NARRATOR_PASSWORD"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "narrator starting");

    let config = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Key { ref action } => {
            if matches!(action, key_commands::KeyAction::Set) {
                require_password(&cli)?;
            }
            let studio = build_studio(&cli, &config).await?;
            key_commands::handle_key(action, &studio).await
        },
        Commands::Voices => {
            let provider = build_provider(&config)?;
            println!("{} voices:", provider.name());
            for voice in provider.voices() {
                match voice.description {
                    Some(desc) => println!("  {:<16} {desc}", voice.name),
                    None => println!("  {}", voice.name),
                }
            }
            Ok(())
        },
        Commands::Speak {
            ref text,
            ref voice,
            ref out,
        } => {
            require_password(&cli)?;
            let studio = build_studio(&cli, &config).await?;
            let audio = studio
                .speak(text, voice.as_deref())
                .await
                .map_err(|e| anyhow::anyhow!("{}: {e}", e.user_message()))?;

            let out = output_path(out.as_deref(), audio.format);
            tokio::fs::write(&out, &audio.data)
                .await
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!(
                "Wrote {} ({} ms at {})",
                out.display(),
                audio.duration_ms,
                audio.sample_rate
            );
            Ok(())
        },
    }
}
