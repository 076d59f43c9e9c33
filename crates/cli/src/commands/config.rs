//! Show the harness configuration.

use storeprobe_client::{ConfigError, HarnessConfig};

/// Print the configuration the test process would see.
///
/// The admin password is redacted by `PlatformConfig`'s `Debug` impl.
///
/// # Errors
///
/// Returns error if the environment does not yield a valid configuration.
#[allow(clippy::print_stdout)]
pub fn show() -> Result<(), ConfigError> {
    let config = HarnessConfig::from_env()?;
    println!("{config:#?}");
    Ok(())
}
