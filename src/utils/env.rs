// src/utils/env.rs

use log::{debug, info};
use std::env;
use std::str::FromStr;

/// Loads variables from a `.env` file in the working directory, if any.
pub fn load_env() {
    match dotenv::dotenv() {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(_) => debug!("No .env file found, using process environment only"),
    }
}

/// Reads `key` and parses it, falling back to `default` when unset or unparsable.
pub fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// Reads a comma-separated list. Unset, empty or fully unparsable values give `default`.
pub fn env_list_or<T: FromStr>(key: &str, default: Vec<T>) -> Vec<T> {
    let parsed: Vec<T> = env::var(key)
        .unwrap_or_else(|_| String::new())
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<T>().ok())
        .collect();
    if parsed.is_empty() {
        default
    } else {
        parsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_parses_and_falls_back() {
        env::set_var("SHELTER_TEST_ENV_OR", " 17 ");
        assert_eq!(env_or("SHELTER_TEST_ENV_OR", 3usize), 17);
        env::set_var("SHELTER_TEST_ENV_OR", "not-a-number");
        assert_eq!(env_or("SHELTER_TEST_ENV_OR", 3usize), 3);
        env::remove_var("SHELTER_TEST_ENV_OR");
        assert_eq!(env_or("SHELTER_TEST_ENV_OR", 3usize), 3);
    }

    #[test]
    fn test_env_list_or() {
        env::set_var("SHELTER_TEST_ENV_LIST", "100, 200,,300");
        assert_eq!(env_list_or("SHELTER_TEST_ENV_LIST", vec![1.0f64]), vec![100.0, 200.0, 300.0]);
        env::set_var("SHELTER_TEST_ENV_LIST", "");
        assert_eq!(env_list_or("SHELTER_TEST_ENV_LIST", vec![1.0f64]), vec![1.0]);
        env::remove_var("SHELTER_TEST_ENV_LIST");
    }
}
