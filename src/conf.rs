use config::{Config, Value};
use serde::{Deserialize, Serialize};
///  struct GetDefault;
///  struct GetOption;
///  struct Has;
///
///  fn settings() -> &'static RwLock<Config>
///  fn current() -> &'static RwLock<Settings>
///
///  struct Settings
use std::sync::{OnceLock, RwLock};

//get or default
pub struct GetDefault;
pub struct GetOption;
pub struct Has;

/// Hosted backend used when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "https://eduglobal-servernew-1.onrender.com/api";

/// Cookie holding the JSON encoded session.
pub const DEFAULT_SESSION_COOKIE: &str = "_EduGlobal_AUTH_KEY_";

/// get raw settings
/// prefer `current()` for the typed view, or GetOption::xxx | GetDefault::xxx | Has::has
///
/// # Returns
/// * `&'static RwLock<Config>` - config instance
pub fn settings() -> &'static RwLock<Config> {
    static CONFIG: OnceLock<RwLock<Config>> = OnceLock::new();
    CONFIG.get_or_init(|| RwLock::new(init_config()))
}

/// get typed settings
/// falls back to `Settings::default()` when the layered config does not
/// deserialize, so a missing config directory never stops the client
///
/// # Returns
/// * `&'static RwLock<Settings>` - settings instance
pub fn current() -> &'static RwLock<Settings> {
    static SETTINGS: OnceLock<RwLock<Settings>> = OnceLock::new();
    SETTINGS.get_or_init(|| {
        let loaded = match settings().read() {
            Ok(guard) => guard.clone().try_deserialize::<Settings>(),
            Err(e) => {
                tracing::warn!("settings lock poisoned: {}", e);
                Ok(Settings::default())
            },
        };

        RwLock::new(loaded.unwrap_or_else(|e| {
            tracing::warn!("settings loading error, using defaults: {}", e);
            Settings::default()
        }))
    })
}

/// clone of the typed settings
pub fn settings_snapshot() -> Settings {
    match current().read() {
        Ok(guard) => guard.clone(),
        Err(_) => Settings::default(),
    }
}

/// init config
/// config/config.yml -> config/{EDUG_RUN_MODE}.yml -> config/local.yml -> EDUG_* env
/// (`EDUG_API__BASE` sets `api.base`)
fn init_config() -> Config {
    //development production testing
    let run_mode = std::env::var("EDUG_RUN_MODE").unwrap_or("development".to_string());
    let config_path = std::env::var("EDUG_CONFIG_PATH").unwrap_or("config".to_string());

    tracing::info!("EDUG_RUN_MODE={} config path: {}", run_mode, config_path);

    let conf = config::File::with_name(&format!("{config_path}/config.yml")).required(false);
    let mode = config::File::with_name(&format!("{config_path}/{run_mode}.yml")).required(false);
    let local = config::File::with_name(&format!("{config_path}/local.yml")).required(false);

    let builder = Config::builder()
        .add_source(conf)
        .add_source(mode)
        .add_source(local)
        .add_source(env_source());

    builder.build().unwrap_or_else(|e| {
        tracing::warn!("config build failed, continuing with empty config: {}", e);
        Config::default()
    })
}

/// `EDUG_` prefix, `__` between nested keys.
fn env_source() -> config::Environment {
    config::Environment::with_prefix("EDUG").prefix_separator("_").separator("__")
}

/// make getter for settings, if not found, return default value
macro_rules! make_setting_getter_default {
    ($name:ident, $type:ty, $getter:ident) => {
        pub fn $name(k: &str, default: $type) -> $type {
            match settings().read() {
                Ok(guard) => guard.$getter(k).unwrap_or(default),
                Err(_) => default,
            }
        }
    };
}

/// make getter for settings, return Option value
macro_rules! make_setting_getter_option {
    ($name:ident, $type:ty, $getter:ident) => {
        pub fn $name(k: &str) -> Option<$type> {
            match settings().read() {
                Ok(guard) => guard.$getter(k).ok(),
                Err(_) => None,
            }
        }
    };
}

/// make getter for settings
macro_rules! make_setting_getter {
    ($name:ident, $type:ty, $getter:ident) => {
        impl GetDefault {
            make_setting_getter_default!($name, $type, $getter);
        }

        impl GetOption {
            make_setting_getter_option!($name, $type, $getter);
        }
    };
}

make_setting_getter!(string, String, get_string);
make_setting_getter!(boolean, bool, get_bool);
make_setting_getter!(int, i64, get_int);
make_setting_getter!(float, f64, get_float);
make_setting_getter!(table, std::collections::HashMap<String, Value>, get_table);

impl GetOption {
    pub fn get<'de, T: Deserialize<'de>>(key: &str) -> Option<T> {
        match settings().read() {
            Ok(guard) => guard.get(key).ok(),
            Err(_) => None,
        }
    }
}

impl Has {
    pub fn has<T: for<'a> serde::Deserialize<'a>>(k: &str) -> bool {
        match settings().read() {
            Ok(guard) => guard.get::<T>(k).is_ok(),
            Err(_) => false,
        }
    }
}

/// Client settings
/// # Fields
/// * `name` - application name, used for log file names
/// * `short` - four letter application code, prefix of every error code
/// * `debug` - debug mode
/// * `api` - REST backend
/// * `session` - session cookie
/// * `upload` - media asset host, optional
/// * `log` - logging, optional
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Settings {
    pub name: String,
    pub short: String,
    pub debug: bool,
    pub api: Api,
    pub session: Session,
    pub upload: Option<Upload>,
    pub log: Option<Log>,
}

/// REST backend
/// # Fields
/// * `base` - base url, every endpoint path is joined onto it
/// * `timeout_secs` - per request timeout
/// * `user_agent` - optional user agent override
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Api {
    pub base: String,
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Session {
    pub cookie: String,
    pub max_age_days: u32,
}

/// Media asset host
/// # Fields
/// * `endpoint` - multipart upload url
/// * `preset` - unsigned upload preset
/// * `timeout_secs` - uploads are slower than list calls
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Upload {
    pub endpoint: String,
    pub preset: String,
    #[serde(default = "default_upload_timeout")]
    pub timeout_secs: u64,
}

/// Log
/// # Fields
/// * `level` - EnvFilter directives
/// * `console` - log to stdout
/// * `dirs` - daily rolling file directory, empty disables files
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Log {
    pub level: String,
    pub console: bool,
    pub dirs: String,
}

fn default_upload_timeout() -> u64 {
    120
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            name: "EduGlobal".to_string(),
            short: "EDUG".to_string(),
            debug: false,
            api: Default::default(),
            session: Default::default(),
            upload: None,
            log: None,
        }
    }
}

impl Default for Api {
    fn default() -> Self {
        Self { base: DEFAULT_API_BASE.to_string(), timeout_secs: 10, user_agent: None }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self { cookie: DEFAULT_SESSION_COOKIE.to_string(), max_age_days: 13 }
    }
}

impl Default for Log {
    fn default() -> Self {
        Log { level: "info".to_string(), console: true, dirs: String::new() }
    }
}

impl Settings {
    pub fn log_or_default(&self) -> Log {
        self.log.clone().unwrap_or_default()
    }
}
