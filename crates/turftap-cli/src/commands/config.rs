//! Config command
//!
//! Manage turftap configuration.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::fs;
use turftap_core::config::Config;

use super::context::GlobalArgs;

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Reset to default configuration
    Reset {
        /// Force reset without confirmation
        #[arg(long)]
        force: bool,
    },

    /// Validate configuration
    Validate,
}

/// Execute the config command
pub fn execute(cmd: ConfigCommand, globals: &GlobalArgs) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => show_config(globals, json),
        ConfigCommand::Reset { force } => reset_config(globals, force),
        ConfigCommand::Validate => validate_config(globals),
    }
}

fn show_config(globals: &GlobalArgs, as_json: bool) -> Result<()> {
    let config_path = globals.config_path();
    if !config_path.exists() {
        eprintln!(
            "{} No configuration at {}, showing defaults. Run '{}' to create one.",
            "⚠".yellow(),
            config_path.display(),
            "turftap init".cyan()
        );
    }

    // Effective values, with --data-dir applied.
    let config = globals.load_config()?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        println!("{}", "Configuration:".bold().underline());
        println!("{}", config_path.display().to_string().dimmed());
        println!();
        println!("{}", config.to_toml_string()?);
        println!(
            "{} {}",
            "data directory:".dimmed(),
            globals.data_dir(&config).display()
        );
    }

    Ok(())
}

fn reset_config(globals: &GlobalArgs, force: bool) -> Result<()> {
    let config_path = globals.config_path();

    if !force {
        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt("Reset configuration to defaults?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Reset cancelled.");
            return Ok(());
        }
    }

    // Backup existing
    if config_path.exists() {
        let backup_path = format!(
            "{}.backup-{}",
            config_path.display(),
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        );
        fs::copy(&config_path, &backup_path)?;
        println!("{} Backed up to {}", "✓".green(), backup_path);
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let content = format!(
        "# turftap configuration\n\n{}",
        Config::default().to_toml_string()?
    );
    fs::write(&config_path, content)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("{} Configuration reset to defaults.", "✓".green());
    Ok(())
}

fn validate_config(globals: &GlobalArgs) -> Result<()> {
    let config_path = globals.config_path();

    if !config_path.exists() {
        eprintln!(
            "{} Configuration not found at {}",
            "✗".red(),
            config_path.display()
        );
        return Ok(());
    }

    let content = fs::read_to_string(&config_path)?;

    match Config::from_toml_str(&content) {
        Ok(config) => {
            println!("{} Configuration is valid", "✓".green());

            let document: toml::Value = toml::from_str(&content)?;
            let mut missing = Vec::new();
            for section in ["storage", "listings", "comments", "contributors"] {
                if document.get(section).is_none() {
                    missing.push(section);
                }
            }
            for section in missing {
                println!(
                    "{} [{}] not set, using defaults",
                    "⚠".yellow(),
                    section
                );
            }

            println!(
                "  listings.page_size = {}, comments.max_length = {}",
                config.listings.page_size, config.comments.max_length
            );
        }
        Err(e) => {
            anyhow::bail!("Invalid configuration in {}: {}", config_path.display(), e);
        }
    }

    Ok(())
}
