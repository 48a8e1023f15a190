//! Binary entry point for `dep-switch`.

use std::process;

fn main() {
    if let Err(e) = dep_switch::run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
