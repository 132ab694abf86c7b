//! # Asteroid Terrain Demo Entry Point
//!
//! Builds a demo asteroid world, meshes it, applies a carve edit, and logs
//! the resulting mesh statistics. An optional argument names a JSON world
//! configuration file.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release [config.json]
//! ```

fn main() {
    if let Err(error) = asteroid_terrain::run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
