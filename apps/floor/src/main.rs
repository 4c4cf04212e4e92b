//! Tavola floor service binary.

fn main() {
    // Setup and the service run live in lib.rs
    if let Err(e) = tavola_floor_lib::run() {
        eprintln!("tavola-floor: {}", e);
        std::process::exit(1);
    }
}
