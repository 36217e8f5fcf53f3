//! stratus CLI binary
//!
//! Minimal entrypoint: all logic is in the library. cli::run() handles all
//! output including errors; main only maps the exit code.

fn main() {
    if let Err(code) = stratus::cli::run() {
        std::process::exit(code.as_i32());
    }
}
