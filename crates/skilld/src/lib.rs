//! skilld - space fact skill host
//!
//! The skill's handler registrations plus the HTTP host that feeds request
//! envelopes to the dispatcher.

pub mod dates;
pub mod facts;
pub mod handlers;
pub mod server;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use skill_core::config::ConfigError;
use skill_core::{Dispatcher, SkillConfig};
use tracing::info;

/// Daemon configuration.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// Address to bind (default: 127.0.0.1).
    pub bind: IpAddr,
    /// HTTP server port (default: 7710).
    pub port: u16,
    pub skill: SkillConfig,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 7710,
            skill: SkillConfig::default(),
        }
    }
}

impl DaemonConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

/// Get the default config path (~/.config/skilld/config).
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("skilld")
        .join("config")
}

/// Resolve the skill config.
///
/// An explicit path must exist; the default path is optional. Precedence:
/// `application_id` argument > `SKILL_APPLICATION_ID` > file > defaults.
pub fn load_skill_config(
    path: Option<&Path>,
    application_id: Option<&str>,
) -> Result<SkillConfig, ConfigError> {
    let mut config = SkillConfig::default();
    match path {
        Some(path) => config.load_file(path)?,
        None => {
            let default_path = default_config_path();
            if default_path.exists() {
                config.load_file(&default_path)?;
            }
        }
    }
    config.apply_env();
    if let Some(id) = application_id {
        config.set_application_id(id);
    }
    Ok(config)
}

/// Build the dispatcher with this skill's handlers.
pub fn build_dispatcher(config: SkillConfig) -> Dispatcher {
    Dispatcher::new(config, handlers::build_handler_table())
}

/// Daemon state.
#[derive(Debug)]
pub struct Daemon {
    config: DaemonConfig,
    dispatcher: Arc<Dispatcher>,
}

impl Daemon {
    pub fn new(config: DaemonConfig) -> Self {
        let dispatcher = Arc::new(build_dispatcher(config.skill.clone()));
        Self { config, dispatcher }
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Serve until the listener fails.
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!("skilld starting on {}", self.config.addr());
        match &self.config.skill.application_id {
            Some(id) => info!("application id check: enabled ({})", id),
            None => info!("application id check: disabled"),
        }
        info!(
            "registered intents: {}",
            self.dispatcher.table().intent_names().join(", ")
        );

        server::start_server(Arc::clone(&self.dispatcher), self.config.addr()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skill_core::config::APPLICATION_ID_ENV;
    use std::io::Write;

    #[test]
    fn default_daemon_config_binds_localhost() {
        let config = DaemonConfig::default();
        assert_eq!(config.addr(), SocketAddr::from(([127, 0, 0, 1], 7710)));
    }

    #[test]
    fn explicit_config_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_skill_config(Some(&dir.path().join("missing")), None);
        assert!(matches!(result, Err(ConfigError::ReadError(_))));
    }

    #[test]
    fn explicit_config_path_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fallback_speech=Pardon?").unwrap();
        let config = load_skill_config(Some(file.path()), None).unwrap();
        assert_eq!(config.fallback_speech, "Pardon?");
    }

    // Only this test touches APPLICATION_ID_ENV, so its steps run in sequence.
    #[test]
    fn application_id_precedence_argument_env_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "application_id=app-from-file").unwrap();

        std::env::remove_var(APPLICATION_ID_ENV);
        let config = load_skill_config(Some(file.path()), None).unwrap();
        assert_eq!(config.application_id.as_deref(), Some("app-from-file"));

        std::env::set_var(APPLICATION_ID_ENV, "app-from-env");
        let config = load_skill_config(Some(file.path()), None).unwrap();
        assert_eq!(config.application_id.as_deref(), Some("app-from-env"));

        let config = load_skill_config(Some(file.path()), Some("app-from-cli")).unwrap();
        assert_eq!(config.application_id.as_deref(), Some("app-from-cli"));

        std::env::set_var(APPLICATION_ID_ENV, "");
        let config = load_skill_config(Some(file.path()), None).unwrap();
        assert!(config.application_id.is_none());

        let config = load_skill_config(Some(file.path()), Some("")).unwrap();
        assert!(config.application_id.is_none());

        std::env::remove_var(APPLICATION_ID_ENV);
    }

    #[test]
    fn daemon_registers_skill_handlers() {
        let daemon = Daemon::new(DaemonConfig::default());
        assert!(daemon.dispatcher().table().has_intent(handlers::intents::GET_WEEK_NUMBER));
    }
}
