use crate::config::toml_config::TomlConfig;
use crate::domain::model::HospitalPatch;
use crate::domain::ports::SaveMode;
use crate::core::transfer::TransferFormat;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "hospital-registry")]
#[command(about = "Create, look up, update and delete hospital records")]
pub struct CliConfig {
    #[arg(long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Overrides database.url")]
    pub database_url: Option<String>,

    #[arg(long, global = true, value_enum, help = "Overrides store.save_mode")]
    pub save_mode: Option<SaveMode>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Store a new hospital
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        contact: String,
        #[arg(long)]
        coordinates: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Print one hospital as JSON
    Get { name: String },
    /// Print all hospitals as a JSON array
    List,
    /// Change some fields of an existing hospital
    Update {
        name: String,
        #[arg(long)]
        contact: Option<String>,
        #[arg(long)]
        coordinates: Option<String>,
        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,
        #[arg(long)]
        clear_description: bool,
    },
    /// Remove a hospital
    Delete { name: String },
    /// Write all hospitals to a file
    Export {
        #[arg(long)]
        output: String,
        #[arg(long, value_enum, default_value = "json")]
        format: TransferFormat,
    },
    /// Save every hospital in a JSON file
    Import {
        #[arg(long)]
        input: String,
    },
}

impl CliConfig {
    /// Loads the config file (or defaults) and applies the command line overrides.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(url) = &self.database_url {
            config.database.url = url.clone();
        }
        if let Some(mode) = self.save_mode {
            config.store.save_mode = mode;
        }
        config.logging.verbose |= self.verbose;

        config.validate()?;
        Ok(config)
    }
}

impl Command {
    /// Builds the patch for `update`; `None` for other commands.
    pub fn patch(&self) -> Option<HospitalPatch> {
        match self {
            Command::Update {
                contact,
                coordinates,
                description,
                clear_description,
                ..
            } => Some(HospitalPatch {
                contact: contact.clone(),
                coordinates: coordinates.clone(),
                description: if *clear_description {
                    Some(None)
                } else {
                    description.clone().map(Some)
                },
            }),
            _ => None,
        }
    }
}
