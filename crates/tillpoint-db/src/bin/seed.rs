//! # Seed Data Generator
//!
//! Populates the database with test products for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default catalog
//! cargo run -p tillpoint-db --bin seed
//!
//! # Cap the number of products
//! cargo run -p tillpoint-db --bin seed -- --count 40
//!
//! # Specify database path
//! cargo run -p tillpoint-db --bin seed -- --db ./data/till.db
//! ```
//!
//! ## Generated Products
//! Creates corner-shop catalog data across categories (stationery,
//! beverages, snacks, household). Each product gets a deterministic
//! price, stock level, and alert threshold derived from its position,
//! so repeated seeds of a fresh database are identical.

use std::env;
use tillpoint_db::{Database, DbConfig, NewProduct};

/// Category stock, with base prices in cents.
const CATEGORIES: &[(&str, i64, &[&str])] = &[
    (
        "Stationery",
        150,
        &[
            "Ballpoint Pen",
            "Gel Pen",
            "Pencil HB",
            "Notebook A5",
            "Notebook A4",
            "Sticky Notes",
            "Paperclips Box",
            "Stapler",
            "Eraser",
            "Ruler 30cm",
        ],
    ),
    (
        "Beverages",
        220,
        &[
            "Sparkling Water",
            "Still Water",
            "Cola Can",
            "Lemonade Bottle",
            "Orange Juice",
            "Apple Juice",
            "Iced Tea",
            "Cold Brew Coffee",
            "Energy Drink",
            "Oat Milk",
        ],
    ),
    (
        "Snacks",
        180,
        &[
            "Salted Crisps",
            "Paprika Crisps",
            "Chocolate Bar",
            "Granola Bar",
            "Trail Mix",
            "Salted Peanuts",
            "Rice Crackers",
            "Gummy Bears",
            "Biscuits",
            "Pretzels",
        ],
    ),
    (
        "Household",
        450,
        &[
            "Dish Soap",
            "Sponges 3-Pack",
            "Paper Towels",
            "Trash Bags",
            "Batteries AA",
            "Batteries AAA",
            "Light Bulb",
            "Tape Roll",
            "Matches",
            "Candles",
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = usize::MAX;
    let mut db_path = String::from("./till_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(usize::MAX);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Tillpoint Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Maximum products to generate (default: all)");
                println!("  -d, --db <PATH>    Database file path (default: ./till_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Tillpoint Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating products...");

    let products = db.products();
    let mut generated = 0usize;

    'outer: for (category_idx, (_category, base_price, names)) in CATEGORIES.iter().enumerate() {
        for (product_idx, name) in names.iter().enumerate() {
            if generated >= count {
                break 'outer;
            }

            // Deterministic spread: prices step off the category base,
            // stock cycles 0..=48, thresholds vary 5..=12
            let price_cents = base_price + (product_idx as i64 * 35) % 400;
            let stock = ((category_idx * 17 + product_idx * 7) % 49) as i64;
            let threshold = 5 + ((product_idx + category_idx) % 8) as i64;

            let new = NewProduct::new(*name, price_cents, stock).alert_threshold(threshold);
            products.insert(&new, false).await?;
            generated += 1;
        }
    }

    println!("✓ Generated {} products", generated);

    let low = db.stock_monitor().low_stock_count().await?;
    println!("  {} of them start at or below their alert threshold", low);

    db.close().await;
    Ok(())
}
