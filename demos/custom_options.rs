//! Customizing INI output with IniOptions.
//!
//! Run with: cargo run --example custom_options

use serde::{Deserialize, Serialize};
use serde_ini_tree::{to_string_with_options, BoolStyle, IniOptions, NullScalars};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize)]
struct Logging {
    level: String,
    file: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Config {
    name: String,
    version: String,
    debug: bool,
    logging: Logging,
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config {
        name: "MyApp".to_string(),
        version: "1.0.0".to_string(),
        debug: true,
        logging: Logging {
            level: "info".to_string(),
            file: None,
        },
    };

    // Default format (`True`/`False`, spaced `=`, null placeholders)
    println!("Default:");
    let default = serde_ini_tree::to_string(&config)?;
    println!("{}", default);

    // Lowercase booleans
    println!("Lowercase booleans:");
    let lower_options = IniOptions::new().with_bool_style(BoolStyle::Lowercase);
    println!("{}", to_string_with_options(&config, &lower_options)?);

    // Compact assignment, absent values left out
    println!("Compact, without absent values:");
    let compact_options = IniOptions::new()
        .with_spaced_assignment(false)
        .with_null_scalars(NullScalars::Omit);
    println!("{}", to_string_with_options(&config, &compact_options)?);

    Ok(())
}
