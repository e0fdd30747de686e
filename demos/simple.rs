//! Basic section-tree serialization and deserialization.
//!
//! Run with: cargo run --example simple

use serde::{Deserialize, Serialize};
use serde_ini_tree::{from_str, to_sections, to_string};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Contact {
    email: String,
    phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct User {
    id: u32,
    name: String,
    contact: Contact,
}

fn main() -> Result<(), Box<dyn Error>> {
    let user = User {
        id: 42,
        name: "Alice Johnson".to_string(),
        contact: Contact {
            email: "alice@example.com".to_string(),
            phone: None,
        },
    };

    // Inspect the section tree
    let tree = to_sections(&user)?;
    for (name, section) in tree.iter() {
        println!("[{}] has {} key(s)", name, section.len());
    }

    // Serialize to INI text
    let ini = to_string(&user)?;
    println!("\nINI output:\n{}", ini);

    // Deserialize back to struct
    let user_back: User = from_str(&ini)?;
    assert_eq!(user, user_back);
    println!("✓ Round-trip successful");

    Ok(())
}
