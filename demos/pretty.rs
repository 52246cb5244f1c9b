//! Compact versus pretty-printed output.
//!
//! Run with: cargo run --example pretty

use serde::Serialize;
use serde_anon::{from_str, to_string, to_string_with_options, EncodeOptions, Object};
use std::error::Error;

#[derive(Serialize)]
struct Address {
    street: String,
    city: String,
}

#[derive(Serialize)]
struct Customer {
    id: u64,
    name: String,
    addresses: Vec<Address>,
    scores: Vec<i32>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let customer = Customer {
        id: 7,
        name: "Ada".to_string(),
        addresses: vec![
            Address {
                street: "1 Main St".to_string(),
                city: "Springfield".to_string(),
            },
            Address {
                street: "9 Elm Rd".to_string(),
                city: "Shelbyville".to_string(),
            },
        ],
        scores: vec![3, 1, 4],
    };

    let compact = to_string(&customer)?;
    println!("=== Compact ===\n{}\n", compact);

    let pretty = to_string_with_options(&customer, EncodeOptions::pretty().with_indent(4))?;
    println!("=== Pretty (indent 4) ===\n{}\n", pretty);

    // Pretty output only adds whitespace the decoder skips
    let a: Object = from_str(&compact)?;
    let b: Object = from_str(&pretty)?;
    assert_eq!(a, b);
    println!("✓ Both forms decode to the same object");

    Ok(())
}
