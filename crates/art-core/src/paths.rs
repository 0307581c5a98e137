use std::path::PathBuf;

/// Default data directory (~/.artiself)
pub fn artiself_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".artiself")
}

/// Path of the JSON config file
pub fn config_json_path() -> PathBuf {
    artiself_dir().join("config.json")
}
