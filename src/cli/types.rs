use anyhow::Context;
use apim_policy::PolicyConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Config file name looked up under the platform config directory
const DEFAULT_CONFIG_FILE: &str = "config.json";

/// APIM policy updater - renders the capstone routing policy and submits it
/// through the Azure CLI
///
/// Without a subcommand the policy is rendered, written to the payload file
/// and PUT to the management API (same as `update`).
#[derive(Parser, Debug)]
#[command(name = "apim-policy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Load configuration overrides from a JSON file
    ///
    /// Any top-level field may be omitted and keeps its built-in default.
    /// When not given, `<config dir>/apim-policy/config.json` is used if present
    /// (~/.config on Linux, ~/Library/Application Support on macOS, %APPDATA% on Windows).
    #[arg(long, value_name = "PATH", env = "APIM_POLICY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Management CLI executable (name on PATH or explicit path)
    #[arg(long, value_name = "PROGRAM", env = "APIM_POLICY_TOOL", global = true)]
    pub tool: Option<String>,

    /// Where to write the JSON request body
    #[arg(long, value_name = "PATH", env = "APIM_POLICY_PAYLOAD", global = true)]
    pub payload: Option<PathBuf>,

    /// Write the payload and print the command without running it
    #[arg(long, global = true)]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum Commands {
    /// Render, write and submit the policy (default)
    Update,

    /// Print the rendered policy to stdout
    Render {
        /// Print the JSON request body instead of the raw XML
        #[arg(long)]
        json: bool,
    },

    /// Print the management API resource URI
    Uri,

    /// Print the effective configuration as JSON
    ShowConfig,
}

impl Cli {
    /// Resolve the effective configuration
    ///
    /// Priority:
    /// 1. --config / APIM_POLICY_CONFIG
    /// 2. {config_dir}/apim-policy/config.json, when it exists
    /// 3. built-in defaults
    ///
    /// --tool and --payload are applied on top, then the result is validated.
    pub fn resolve_config(&self) -> anyhow::Result<PolicyConfig> {
        let mut config = match self.config_path() {
            Some(path) => {
                log::info!("Loading configuration from {}", path.display());
                PolicyConfig::from_file(&path)?
            }
            None => {
                log::debug!("No config file found, using built-in defaults");
                PolicyConfig::default()
            }
        };

        if let Some(tool) = &self.tool {
            config.tool = tool.clone();
        }
        if let Some(payload) = &self.payload {
            config.payload_path = payload.clone();
        }

        config.validate().context("Configuration is invalid")?;
        Ok(config)
    }

    fn config_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config {
            return Some(path.clone());
        }

        let path = dirs::config_dir()?
            .join(env!("CARGO_PKG_NAME"))
            .join(DEFAULT_CONFIG_FILE);
        path.is_file().then_some(path)
    }

    pub fn selected_command(&self) -> Commands {
        self.command.unwrap_or(Commands::Update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_update() {
        let cli = Cli::try_parse_from(["apim-policy"]).unwrap();
        assert!(matches!(cli.selected_command(), Commands::Update));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["apim-policy", "render", "--json", "--tool", "az-dev"]).unwrap();
        assert!(matches!(cli.selected_command(), Commands::Render { json: true }));
        assert_eq!(cli.tool.as_deref(), Some("az-dev"));
    }

    #[test]
    fn overrides_apply_on_top_of_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("apim.json");
        std::fs::write(&config_path, r#"{"tool": "az-from-file", "api_id": "frontend"}"#).unwrap();

        let cli = Cli::try_parse_from([
            "apim-policy",
            "--config",
            config_path.to_str().unwrap(),
            "--tool",
            "az-from-flag",
            "--payload",
            "out/body.json",
        ])
        .unwrap();
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.tool, "az-from-flag");
        assert_eq!(config.api_id, "frontend");
        assert_eq!(config.payload_path, PathBuf::from("out/body.json"));
    }

    #[test]
    fn invalid_file_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("apim.json");
        std::fs::write(&config_path, r#"{"service_name": ""}"#).unwrap();

        let cli =
            Cli::try_parse_from(["apim-policy", "--config", config_path.to_str().unwrap()]).unwrap();
        let err = cli.resolve_config().unwrap_err();

        assert!(format!("{err:#}").contains("service_name"));
    }
}
