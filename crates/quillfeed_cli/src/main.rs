//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `quillfeed_search` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("quillfeed_search ping={}", quillfeed_search::ping());
    println!(
        "quillfeed_search version={}",
        quillfeed_search::engine_version()
    );
}
