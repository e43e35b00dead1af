//! The `trigrade init` command.

use std::path::Path;

use anyhow::{Context, Result};

use trigrade_core::config::SAMPLE_CONFIG;
use trigrade_core::roster::default_roster;
use trigrade_report::export::write_roster;

pub fn execute() -> Result<()> {
    if Path::new("trigrade.toml").exists() {
        println!("trigrade.toml already exists, skipping.");
    } else {
        std::fs::write("trigrade.toml", SAMPLE_CONFIG)?;
        println!("Created trigrade.toml");
    }

    let roster_path = Path::new("roster.csv");
    if roster_path.exists() {
        println!("roster.csv already exists, skipping.");
    } else {
        let file = std::fs::File::create(roster_path).context("failed to create roster.csv")?;
        write_roster(file, &default_roster(), true)?;
        println!("Created roster.csv");
    }

    println!("\nNext steps:");
    println!("  1. Edit roster.csv with your class (columns ID, 이름)");
    println!("  2. Run: trigrade roster --import roster.csv");
    println!("  3. Run: trigrade generate --seed 42 --count 10");

    Ok(())
}
