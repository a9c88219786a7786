use std::env;
use std::fs;

use log::Level;

use dumptriage::{analyze_with_deadline, format_report, SizeCategory};

fn main() {
    simple_logger::init_with_level(Level::Debug).unwrap();

    let path = env::args().nth(1).unwrap_or_else(|| "./memory.dmp".into());
    let buffer = fs::read(&path).unwrap();

    let category = SizeCategory::from_len(buffer.len());
    log::info!("{}: {} bytes, category {:?}", path, buffer.len(), category);

    let data = analyze_with_deadline(&buffer, std::time::Duration::from_secs(30)).unwrap();

    println!("{}", format_report(&data));
}
