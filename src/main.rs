//! veridoc CLI entry point
//!
//! Minimal by design: parse arguments, dispatch, print the error, exit
//! non-zero on failure. All logic lives in the cli module.

use veridoc::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
