//! Working with Object and Value for runtime flexibility.
//!
//! Run with: cargo run --example dynamic_values

use serde::{Deserialize, Serialize};
use serde_anon::{load, object, store, to_string_pretty, to_value, SliceSource, Value};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize)]
struct User {
    id: u32,
    name: String,
    roles: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Build config dynamically with object! macro
    let mut config = object!({
        "host": "localhost",
        "port": 8080u32,
        "features": vec!["auth", "logging", "metrics"],
        "limits": { "max_connections": 512u64 }
    });

    // Members can be added and replaced after the fact
    config.insert("timeout_ms", 2500u32)?;
    config.assign("port", 9090u32)?;

    println!("Config as anon:\n{}\n", to_string_pretty(&config)?);

    // Access values dynamically
    if let Some(host) = config.get("host").and_then(Value::as_str) {
        println!("Accessing field 'host': {}", host);
    }
    if let Some(port) = config.get("port").and_then(Value::as_u32) {
        println!("Accessing field 'port': {}", port);
    }
    if let Some(len) = config.get("features").and_then(Value::array_len) {
        println!("Accessing field 'features': {} items\n", len);
    }

    // Widths are preserved through the wire format
    let mut text = String::new();
    store(&config, &mut text)?;
    let back = load(&mut SliceSource::new(text.as_bytes()))?;
    assert_eq!(back.try_get("timeout_ms")?.kind(), config.try_get("timeout_ms")?.kind());

    // Convert existing struct to Value
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        roles: vec!["admin".to_string(), "developer".to_string()],
    };

    let user_value = to_value(&user)?;
    println!("User as Value:\n{:#?}\n", user_value);

    // Runtime type checks
    println!("Type checks:");
    println!("  kind:      {}", user_value.kind());
    println!("  is_object: {}", user_value.is_object());
    println!("  is_array:  {}", user_value.is_array());
    println!("  is_string: {}", user_value.is_string());

    Ok(())
}
