use std::env;

pub fn required_env(env_name: &str) -> Result<String, String> {
    optional_env(env_name)
        .ok_or_else(|| format!("Required environment variable '{env_name}' is not set"))
}

/// Unset and empty variables are both treated as absent.
pub fn optional_env(env_name: &str) -> Option<String> {
    env::var(env_name).ok().filter(|v| !v.trim().is_empty())
}

pub fn env_or(env_name: &str, default: &str) -> String {
    optional_env(env_name).unwrap_or_else(|| default.to_string())
}
