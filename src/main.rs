//! # Streaming Voxel World Demo
//!
//! Runs a headless walk through a generated world and logs streaming statistics.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [config.json]
//! ```

fn main() {
    if let Err(err) = streaming_voxel_world::run() {
        log::error!("{err}");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
