/// Example: Parse a helium store configuration and replay a few actions
///
/// Usage: cargo run --example parse_config [config_file]

use helium::{ActionRecord, StoreConfig};
use serde_json::json;
use std::env;

fn main() {
    // Get config file path from command line or use default
    let config_path = env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/coins.json".to_string());

    let config = match StoreConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ Failed to load configuration:");
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    println!("✓ Successfully parsed configuration!");
    println!("\nMiddleware (outermost first):");
    for (i, kind) in config.middleware.iter().enumerate() {
        println!("  {}. {}", i + 1, kind);
    }

    println!("\nReducer rules: {}", config.reducers.len());
    for rule in &config.reducers {
        println!("  {} -> {}", rule.action, rule.set);
    }

    let store = match config.build_store() {
        Ok(store) => store,
        Err(e) => {
            eprintln!("✗ Failed to build store: {}", e);
            std::process::exit(1);
        }
    };

    for value in [5, 10] {
        let action = ActionRecord::new("SetCoins").with("Value", json!(value));
        if let Err(e) = store.fire(action) {
            eprintln!("✗ {}", e);
        }
    }

    println!("\n--- Final State ---");
    println!("{:#?}", store.snapshot().root());
}
