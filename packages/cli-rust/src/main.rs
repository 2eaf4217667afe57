//! fleetlink CLI - Open Docker-over-SSH tunnels to fleet nodes
//!
//! This is the main entry point for the Rust CLI binary.

fn main() -> anyhow::Result<()> {
    fleetlink::run()
}
