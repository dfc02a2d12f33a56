//! Name-steal skill - Main Entry Point

use clap::{Parser, Subcommand};
use name_steal_skill::config::SkillConfig;
use name_steal_skill::handlers::standard_skill;
use name_steal_skill::observability::init_logging_with_verbosity;
use name_steal_skill::phonetic::{GooHiraganaClient, GooHiraganaConfig, PhoneticConverter};
use name_steal_skill::protocol::RequestEnvelope;
use name_steal_skill::server::SkillServer;
use name_steal_skill::skill::Skill;
use std::io::Read;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Voice skill in which the owner steals your name
#[derive(Parser)]
#[command(name = "name-steal-skill")]
#[command(about = "Voice skill in which the owner steals your name")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the skill endpoint
    Serve,
    /// Run one request envelope through the skill and print the response
    Invoke {
        /// Envelope file; reads stdin when omitted
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Validate configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging_with_verbosity(cli.verbose);

    info!("Starting name-steal-skill v{}", env!("CARGO_PKG_VERSION"));

    let config = match load_configuration(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Serve => serve(config).await,
        Commands::Invoke { file } => invoke_once(config, file).await,
        Commands::Config { show } => handle_config_command(config, show),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_configuration(
    config_path: &Option<PathBuf>,
) -> Result<SkillConfig, Box<dyn std::error::Error>> {
    match config_path {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Ok(SkillConfig::load_from_file(path)?)
        }
        None => {
            for path_str in ["skill.toml", "config/skill.toml"] {
                let path = PathBuf::from(path_str);
                if path.exists() {
                    info!("Loading configuration from: {}", path.display());
                    return Ok(SkillConfig::load_from_file(&path)?);
                }
            }

            warn!("No configuration file found, using defaults");
            Ok(SkillConfig::default())
        }
    }
}

/// Creates the phonetic converter from configuration, if one is configured
struct PhoneticConverterFactory;

impl PhoneticConverterFactory {
    fn create_converter(
        config: &SkillConfig,
    ) -> Result<Option<Arc<dyn PhoneticConverter>>, Box<dyn std::error::Error>> {
        let Some(phonetic) = &config.phonetic else {
            return Ok(None);
        };
        let Some(app_id) = config.get_phonetic_app_id()? else {
            return Ok(None);
        };

        let client = GooHiraganaClient::new(GooHiraganaConfig {
            app_id,
            endpoint: phonetic.endpoint.clone(),
            output_type: phonetic.output_type.parse()?,
            timeout: Duration::from_millis(phonetic.timeout_ms),
        })?;
        info!("Phonetic conversion enabled via {}", phonetic.endpoint);
        Ok(Some(Arc::new(client)))
    }
}

fn build_skill(config: &SkillConfig) -> Result<Skill, Box<dyn std::error::Error>> {
    let converter = PhoneticConverterFactory::create_converter(config)?;
    Ok(standard_skill(config.skill.application_id.clone(), converter))
}

async fn serve(config: SkillConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.skill.application_id.is_none() {
        warn!("skill.application_id is not set; requests for any application are accepted");
    }

    let skill = Arc::new(build_skill(&config)?);
    SkillServer::new(skill, config.server).run().await?;
    Ok(())
}

async fn invoke_once(
    config: SkillConfig,
    file: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let input = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let envelope: RequestEnvelope = serde_json::from_str(&input)?;
    let skill = build_skill(&config)?;
    let response = skill.invoke(envelope).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn handle_config_command(
    config: SkillConfig,
    show: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if show {
        println!("Current configuration:");
        println!("{}", toml::to_string_pretty(&config)?);
    }

    if let Err(e) = config.get_phonetic_app_id() {
        warn!("Phonetic conversion will fail to start: {}", e);
    }

    info!("Configuration validation complete");
    Ok(())
}
