//! Version command implementation

use super::Exit;
use crate::config::InstallerConfig;
use crate::error::Result;

/// Run version command
pub fn run() -> Result<Exit> {
    let config = InstallerConfig::default();
    println!("gooey-installer {}", env!("CARGO_PKG_VERSION"));
    println!("Installs {} {}", config.product_name, config.product_version);
    println!();
    println!("Build info:");
    println!("  Rust version: {}", rustc_version());
    println!("  Profile: {}", build_profile());

    Ok(Exit::Success)
}

fn rustc_version() -> &'static str {
    // Minimum supported rustc from Cargo.toml
    env!("CARGO_PKG_RUST_VERSION")
}

fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}
