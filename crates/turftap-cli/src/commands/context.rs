//! Shared command context
//!
//! Resolves configuration, opens the store once and works out who is acting.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use turftap_core::config::Config;
use turftap_core::{Identity, Turftap, UserId};
use turftap_storage::FileSystemStorage;

/// Default config location, relative to the working directory
pub const CONFIG_PATH: &str = ".turftap/config.toml";

/// Global flags shared by every command
#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub acting_as: Option<String>,
}

impl GlobalArgs {
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(CONFIG_PATH))
    }

    /// Load the config file, applying `--data-dir`
    pub fn load_config(&self) -> Result<Config> {
        let path = self.config_path();
        let mut config = Config::load(&path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
        if let Some(dir) = &self.data_dir {
            config.storage.data_dir = Some(dir.clone());
        }
        Ok(config)
    }

    /// Directory the store lives in
    pub fn data_dir(&self, config: &Config) -> PathBuf {
        config
            .storage
            .data_dir
            .clone()
            .unwrap_or_else(FileSystemStorage::default_dir)
    }
}

/// An opened store plus the acting identity
pub struct Session {
    pub app: Turftap,
    pub config: Config,
    identity: Option<Identity>,
}

impl Session {
    pub fn open(globals: &GlobalArgs) -> Result<Self> {
        let config = globals.load_config()?;
        let storage = FileSystemStorage::from_config(&config.storage)
            .context("Failed to open data directory")?;
        tracing::debug!("Using data directory {:?}", storage.base_dir());

        let app = Turftap::new(Arc::new(storage), &config);
        let identity = match globals.acting_as.as_deref() {
            Some(who) => Some(resolve_identity(&app, who)?),
            None => None,
        };

        Ok(Self {
            app,
            config,
            identity,
        })
    }

    /// The acting identity, if any
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }
}

/// Look up a user by id or email and return the identity they act with
pub fn resolve_identity(app: &Turftap, who: &str) -> Result<Identity> {
    if let Ok(id) = UserId::parse(who) {
        return app
            .users
            .identity_of(&id)
            .with_context(|| format!("Unknown user {}", who));
    }
    match app.users.find_by_email(who)? {
        Some(user) => Ok(user.identity()),
        None => bail!(
            "No user with email {}. Run 'turftap user sign-in' first.",
            who
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turftap_core::user::SignInRequest;

    #[test]
    fn test_config_path_default() {
        let globals = GlobalArgs::default();
        assert!(globals.config_path().ends_with("config.toml"));
    }

    #[test]
    fn test_data_dir_flag_overrides_config() {
        let temp = tempfile::tempdir().unwrap();
        let globals = GlobalArgs {
            config: Some(temp.path().join("missing.toml")),
            data_dir: Some(temp.path().join("data")),
            acting_as: None,
        };
        let config = globals.load_config().unwrap();
        assert_eq!(globals.data_dir(&config), temp.path().join("data"));
    }

    #[test]
    fn test_resolve_identity_by_email_and_id() {
        let app = Turftap::in_memory(&Config::default());
        let user = app
            .users
            .sign_in(SignInRequest {
                name: "Meera".to_string(),
                email: "meera@example.com".to_string(),
                profile_image: None,
            })
            .unwrap();

        assert_eq!(
            resolve_identity(&app, "MEERA@example.com").unwrap().user_id,
            user.id
        );
        assert_eq!(
            resolve_identity(&app, &user.id.to_string()).unwrap().user_id,
            user.id
        );
        assert!(resolve_identity(&app, "ghost@example.com").is_err());
    }
}
