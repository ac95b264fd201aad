use grove_core::StatsStore;

use super::grow::open_store;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let stats = open_store().load_or_default();
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
