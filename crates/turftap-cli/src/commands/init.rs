//! Init command
//!
//! Write a default configuration, create the data directory and optionally
//! register the first admin.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use turftap_core::config::Config;
use turftap_core::user::SignInRequest;
use turftap_core::Turftap;
use turftap_storage::FileSystemStorage;

use super::context::GlobalArgs;

/// Arguments for the init command
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Force overwrite existing configuration
    #[arg(long)]
    pub force: bool,

    /// Name of the first admin
    #[arg(long, requires = "admin_email")]
    pub admin_name: Option<String>,

    /// Email of the first admin
    #[arg(long, requires = "admin_name")]
    pub admin_email: Option<String>,
}

/// Execute the init command
pub fn execute(args: InitArgs, globals: &GlobalArgs) -> Result<()> {
    let config_path = globals.config_path();
    println!("Initializing turftap...");

    if config_path.exists() && !args.force {
        eprintln!(
            "{} turftap already initialized at {}. Use --force to reinitialize.",
            "⚠".yellow(),
            config_path.display()
        );
    } else {
        write_default_config(&config_path)?;
        println!("{} Wrote {}", "✓".green(), config_path.display());
    }

    let config = globals.load_config()?;
    let storage = FileSystemStorage::from_config(&config.storage)
        .context("Failed to create data directory")?;
    println!(
        "{} Data directory {}",
        "✓".green(),
        storage.base_dir().display()
    );

    if let (Some(name), Some(email)) = (args.admin_name, args.admin_email) {
        let app = Turftap::new(Arc::new(storage), &config);
        let user = app.users.sign_in(SignInRequest {
            name,
            email,
            profile_image: None,
        })?;
        let admin = app
            .users
            .bootstrap_admin(&user.id)
            .context("Could not register the first admin")?;
        println!(
            "{} {} <{}> is an admin ({})",
            "✓".green(),
            admin.name,
            admin.email,
            admin.id
        );
    }

    println!("\n{}", "Next steps:".bold());
    println!("  1. Sign in:        {}", "turftap user sign-in <name> <email>".cyan());
    println!("  2. Submit a ground: {}", "turftap --as <email> listing submit --file ground.json".cyan());
    println!("  3. Browse:          {}", "turftap listing browse".cyan());

    Ok(())
}

fn write_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let content = format!("# turftap configuration\n\n{}", Config::default().to_toml_string()?);
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_round_trips() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(".turftap").join("config.toml");
        write_default_config(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# turftap configuration"));
        let config = Config::from_toml_str(&content).unwrap();
        assert_eq!(config.listings.page_size, 24);
    }
}
