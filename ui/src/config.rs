use std::time::Duration;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base_url: String,
    pub create_user_path: String,
    pub listing_route: String,
    pub flash_key: String,
    pub toast_duration: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            create_user_path: "/user".to_string(),
            listing_route: "/dashboard/user".to_string(),
            flash_key: "message".to_string(),
            toast_duration: Duration::from_secs(5),
        }
    }
}

impl Config {
    /// Reads overrides from the environment. The browser bundle only sees
    /// values baked in at build time; native builds also read the process
    /// environment and a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            dotenvy::dotenv().ok();
        }

        let defaults = Config::default();

        let toast_duration = match var("DASHBOARD_TOAST_MS", option_env!("DASHBOARD_TOAST_MS")) {
            Some(value) => Duration::from_millis(value.parse().map_err(|_| ConfigError::Invalid {
                key: "DASHBOARD_TOAST_MS",
                value,
            })?),
            None => defaults.toast_duration,
        };

        Ok(Config {
            api_base_url: var("DASHBOARD_API_URL", option_env!("DASHBOARD_API_URL"))
                .unwrap_or(defaults.api_base_url),
            create_user_path: var("DASHBOARD_CREATE_USER_PATH", option_env!("DASHBOARD_CREATE_USER_PATH"))
                .unwrap_or(defaults.create_user_path),
            listing_route: var("DASHBOARD_LISTING_ROUTE", option_env!("DASHBOARD_LISTING_ROUTE"))
                .unwrap_or(defaults.listing_route),
            flash_key: var("DASHBOARD_FLASH_KEY", option_env!("DASHBOARD_FLASH_KEY"))
                .unwrap_or(defaults.flash_key),
            toast_duration,
        })
    }

    pub fn create_user_url(&self) -> String {
        format!(
            "{}{}",
            self.api_base_url.trim_end_matches('/'),
            self.create_user_path
        )
    }

    pub fn add_user_route(&self) -> String {
        format!("{}/add", self.listing_route.trim_end_matches('/'))
    }
}

fn var(key: &str, baked: Option<&'static str>) -> Option<String> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Ok(value) = std::env::var(key) {
            return Some(value);
        }
    }
    #[cfg(target_arch = "wasm32")]
    let _ = key;

    baked.map(str::to_owned)
}
