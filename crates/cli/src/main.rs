use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use sightspeak::{Config, ConversionResult, Converter, DEFAULT_WAIT_SECS, Voice};

#[derive(Parser)]
#[command(name = "sightspeak")]
#[command(about = "Sightspeak — read images aloud via vision analysis and speech synthesis")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an image into a spoken audio file
    Convert {
        /// Path to the input image
        image: PathBuf,
        /// Path for the output audio file
        output: PathBuf,
        /// Voice identifier (see `sightspeak voices`)
        #[arg(short, long)]
        voice: Option<Voice>,
        /// Override the analysis prompt sent to the vision model
        #[arg(short, long)]
        prompt: Option<String>,
        /// Seconds to wait for the provider to render the audio
        #[arg(long, default_value_t = DEFAULT_WAIT_SECS)]
        wait_secs: u64,
        /// Print the result record as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the known voice identifiers
    Voices,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            image,
            output,
            voice,
            prompt,
            wait_secs,
            json,
        } => {
            let mut converter = Converter::from_config(&config)?;
            if let Some(voice) = voice {
                converter.set_voice(voice);
            }
            if let Some(prompt) = prompt {
                converter.set_prompt(prompt);
            }

            info!(
                "Converting {} with voice={} (wait budget {}s)",
                image.display(),
                converter.voice(),
                wait_secs
            );
            let result = converter.convert(&image, &output, wait_secs).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
                Ok(exit_code(&result))
            } else {
                Ok(print_result(&result))
            }
        }
        Commands::Voices => {
            for voice in Voice::known() {
                println!("{voice}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_result(result: &ConversionResult) -> ExitCode {
    if result.success {
        println!("{}", result.text_result.as_deref().unwrap_or_default());
        println!();
        if let Some(path) = &result.audio_path {
            println!("audio:  {}", path.display());
        }
        if let Some(url) = &result.audio_url {
            println!("source: {url}");
        }
        if let Some(voice) = &result.voice_used {
            println!("voice:  {voice}");
        }
    } else {
        eprintln!(
            "conversion failed: {}",
            result.error.as_deref().unwrap_or("unknown error")
        );
    }
    exit_code(result)
}

fn exit_code(result: &ConversionResult) -> ExitCode {
    if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
