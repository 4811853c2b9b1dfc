use crate::commands::Out;
use crate::{Config, Result};
use std::path::Path;

/// Creates the bizdash home directory, its `exports` subdirectory and an initial `config.json`
/// that points at `api_url`.
///
/// # Arguments
/// - `home` - The directory that will hold the configuration, e.g. `$HOME/bizdash`
/// - `api_url` - The base URL of the backend API, e.g. `http://localhost:5001/api`
///
/// # Errors
/// - Returns an error if `api_url` is invalid or if any file operation fails.
pub async fn init(home: &Path, api_url: &str) -> Result<Out<()>> {
    let config = Config::create(home, api_url).await?;
    Ok(format!(
        "Created the bizdash configuration at {} for {}",
        config.config_path().display(),
        config.api_url()
    )
    .into())
}
