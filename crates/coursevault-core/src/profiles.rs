//! Pre-configured profiles for different deployment scenarios
//!
//! - Development: Verbose logging, cached index
//! - Production: Quiet logging, cached index, tighter size limit
//! - Authoring: Index rebuilt on every request so edits show up immediately

use crate::config::SiteConfig;
use std::str::FromStr;

/// Profile selector for pre-configured deployments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigProfile {
    /// Development: Verbose logging, caching enabled
    Development,
    /// Production: Info logging, caching enabled
    Production,
    /// Authoring: Caching disabled, debug logging
    Authoring,
}

impl ConfigProfile {
    /// Create a SiteConfig from this profile
    pub fn create_config(self) -> SiteConfig {
        let mut config = SiteConfig::default();
        self.apply(&mut config);
        config
    }

    /// Overlay this profile's settings on an existing config
    pub fn apply(self, config: &mut SiteConfig) {
        match self {
            Self::Development => {
                config.log_level = "DEBUG".to_string();
                config.enable_caching = true;
                config.max_file_size = 50 * 1024 * 1024; // 50MB
            }

            Self::Production => {
                config.log_level = "INFO".to_string();
                config.enable_caching = true;
                config.max_file_size = 10 * 1024 * 1024; // 10MB
            }

            Self::Authoring => {
                config.log_level = "DEBUG".to_string();
                config.enable_caching = false;
                config.max_file_size = 50 * 1024 * 1024;
            }
        }
    }

    /// Profile name as accepted on the command line
    pub fn name(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Authoring => "authoring",
        }
    }
}

impl FromStr for ConfigProfile {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "authoring" => Ok(Self::Authoring),
            other => Err(crate::Error::config_error(format!(
                "Unknown profile '{}' (expected development, production or authoring)",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_differ() {
        let dev = ConfigProfile::Development.create_config();
        let prod = ConfigProfile::Production.create_config();
        let authoring = ConfigProfile::Authoring.create_config();

        assert_eq!(dev.log_level, "DEBUG");
        assert_eq!(prod.log_level, "INFO");
        assert!(prod.enable_caching);
        assert!(!authoring.enable_caching);
    }

    #[test]
    fn test_profile_from_str() {
        assert_eq!(
            "Production".parse::<ConfigProfile>().unwrap(),
            ConfigProfile::Production
        );
        assert_eq!("dev".parse::<ConfigProfile>().unwrap().name(), "development");
        assert!("staging".parse::<ConfigProfile>().is_err());
    }
}
