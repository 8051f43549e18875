use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::PathBuf,
    time::Duration,
};

use directories::BaseDirs;

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        let mut map = default_map();
        let config_path = default_config_path();

        // Read .datachatrc if exists
        if config_path.exists() {
            if let Ok(file) = fs::File::open(&config_path) {
                let reader = BufReader::new(file);
                for line in reader.lines().map_while(Result::ok) {
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    if let Some((k, v)) = line.split_once('=') {
                        map.insert(k.trim().to_string(), v.trim().to_string());
                    }
                }
            }
        }

        // Overlay environment variables (take precedence)
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self { inner: map, config_path }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).cloned()
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.parse::<u64>().ok())
    }

    pub fn get_duration_secs(&self, key: &str, default: u64) -> Duration {
        Duration::from_secs(self.get_u64(key).unwrap_or(default))
    }

    pub fn set(&mut self, key: &str, value: String) {
        self.inner.insert(key.to_string(), value);
    }

    pub fn bind_addr(&self) -> String {
        let host = self.get("HOST").unwrap_or_else(|| "127.0.0.1".into());
        let port = self.get("PORT").unwrap_or_else(|| "8000".into());
        format!("{}:{}", host, port)
    }

    pub fn upload_dir(&self) -> PathBuf {
        PathBuf::from(self.get("UPLOAD_DIR").unwrap_or_else(|| "uploads".into()))
    }

    pub fn plot_dir(&self) -> PathBuf {
        PathBuf::from(self.get("PLOT_DIR").unwrap_or_else(|| "plots".into()))
    }
}

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &[
        "HOST",
        "PORT",
        "UPLOAD_DIR",
        "PLOT_DIR",
        "OPENAI_API_KEY",
        "API_BASE_URL",
        "DEFAULT_MODEL",
        "REQUEST_TIMEOUT",
        "PYTHON_BIN",
        "EXEC_TIMEOUT",
        "EXEC_MEMORY_MB",
    ];

    KEYS.contains(&k) || k.starts_with("DATACHAT_")
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("datachat").join(".datachatrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();

    // Network
    m.insert("HOST".into(), "127.0.0.1".into());
    m.insert("PORT".into(), "8000".into());

    // Storage
    m.insert("UPLOAD_DIR".into(), "uploads".into());
    m.insert("PLOT_DIR".into(), "plots".into());

    // Completion endpoint
    m.insert("API_BASE_URL".into(), "default".into());
    m.insert("DEFAULT_MODEL".into(), "gpt-4o".into());
    m.insert("REQUEST_TIMEOUT".into(), "60".into());

    // Plot execution
    m.insert("PYTHON_BIN".into(), "python3".into());
    m.insert("EXEC_TIMEOUT".into(), "30".into());
    m.insert("EXEC_MEMORY_MB".into(), "512".into());

    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_plot_execution_keys() {
        let cfg = Config::load();
        assert!(cfg.get("PYTHON_BIN").is_some());
        assert!(cfg.get("EXEC_TIMEOUT").is_some());
        assert_eq!(cfg.get_u64("EXEC_MEMORY_MB"), Some(512));
    }

    #[test]
    fn set_overrides_and_bind_addr_joins() {
        let mut cfg = Config::load();
        cfg.set("HOST", "0.0.0.0".into());
        cfg.set("PORT", "9001".into());
        assert_eq!(cfg.bind_addr(), "0.0.0.0:9001");
    }

    #[test]
    fn duration_getter_falls_back() {
        let cfg = Config::load();
        assert_eq!(
            cfg.get_duration_secs("NO_SUCH_KEY", 7),
            Duration::from_secs(7)
        );
    }
}
