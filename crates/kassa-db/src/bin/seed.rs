//! # Seed Data Generator
//!
//! Fills a development database with a candle shop's stock and, optionally,
//! a few months of sales history so the finance view has something to show.
//!
//! ## Usage
//! ```bash
//! # Items only
//! cargo run -p kassa-db --bin seed
//!
//! # Items plus 300 sales spread over the last 90 days
//! cargo run -p kassa-db --bin seed -- --sales 300
//!
//! # Specify database path
//! cargo run -p kassa-db --bin seed -- --db ./data/kassa.db
//! ```

use chrono::{Duration, Utc};
use kassa_core::{Item, NewItem, NewSale, NewSaleLine};
use kassa_db::{Database, DbConfig};
use std::env;

/// Product lines: (name, cost cents, sell cents)
const PRODUCTS: &[(&str, i64, i64)] = &[
    ("Soy candle", 250, 600),
    ("Beeswax candle", 400, 950),
    ("Scented jar candle", 550, 1450),
    ("Tea lights (10 pack)", 120, 350),
    ("Pillar candle", 300, 800),
    ("Taper candles (pair)", 180, 450),
    ("Wax melts", 90, 250),
    ("Reed diffuser", 700, 1800),
    ("Wick trimmer", 300, 900),
    ("Candle snuffer", 350, 1000),
    ("Matches", 20, 100),
    ("Gift box", 150, 500),
];

/// Scent variants appended to candle names.
const SCENTS: &[&str] = &["Lavender", "Vanilla", "Cedar", "Citrus", "Unscented"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut sales: usize = 0;
    let mut db_path = String::from("./kassa_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--sales" | "-s" => {
                if i + 1 < args.len() {
                    sales = args[i + 1].parse().unwrap_or(0);
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
                println!("Kassa POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -s, --sales <N>    Number of historical sales to generate (default: 0)");
                println!("  -d, --db <PATH>    Database file path (default: ./kassa_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Kassa POS Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!("Sales:    {}", sales);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database, migrations applied");

    let existing = db.items().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} items", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut items = Vec::new();
    for (product_idx, (name, cost, sell)) in PRODUCTS.iter().enumerate() {
        let is_candle = name.contains("candle") || name.contains("melts");
        let variants: Vec<String> = if is_candle {
            SCENTS.iter().map(|scent| format!("{} {}", scent, name)).collect()
        } else {
            vec![name.to_string()]
        };

        for (variant_idx, full_name) in variants.into_iter().enumerate() {
            let seed = product_idx * 7 + variant_idx * 3;
            let item = NewItem {
                name: full_name,
                cost_price_cents: *cost,
                sell_price_cents: *sell,
                // Leaves a few items out of stock or low so both badges show.
                inventory_count: (seed % 40) as i64 + if sales > 0 { sales as i64 } else { 0 },
            };

            match db.items().insert(&item).await {
                Ok(stored) => items.push(stored),
                Err(e) => eprintln!("Failed to insert {}: {}", item.name, e),
            }
        }
    }
    println!("✓ Inserted {} items", items.len());

    if sales > 0 && !items.is_empty() {
        let start = std::time::Instant::now();
        let mut committed = 0;

        for n in 0..sales {
            let sale = generate_sale(&items, n);
            let minutes_ago = ((n * 433) % (90 * 24 * 60)) as i64;
            let created_at = Utc::now() - Duration::minutes(minutes_ago);

            match db.sales().commit_at(&sale, created_at).await {
                Ok(_) => committed += 1,
                Err(e) => eprintln!("Failed to commit sale {}: {}", n, e),
            }
        }

        println!("✓ Committed {} sales in {:?}", committed, start.elapsed());
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds a one to three line sale paid in round euros.
fn generate_sale(items: &[Item], seed: usize) -> NewSale {
    let line_count = 1 + seed % 3;
    let mut lines: Vec<NewSaleLine> = Vec::with_capacity(line_count);

    for offset in 0..line_count {
        let item = &items[(seed * 5 + offset * 11) % items.len()];
        if lines.iter().any(|line| line.item_id == item.id) {
            continue;
        }
        lines.push(NewSaleLine {
            item_id: item.id,
            quantity: 1,
            price_per_item_cents: item.sell_price_cents,
        });
    }

    let total: i64 = lines
        .iter()
        .map(|line| line.quantity * line.price_per_item_cents)
        .sum();
    let paid = (total + 99) / 100 * 100;

    NewSale {
        total_amount_cents: total,
        amount_paid_cents: paid,
        lines,
    }
}
