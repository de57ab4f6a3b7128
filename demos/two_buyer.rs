//! Projection of the two-buyer protocol
//!
//! Builds the global choreography, prints it, then prints the local protocol
//! derived for each participant. Run with RUST_LOG=trace to watch the
//! projection walk the tree.

use rumpsteak_epp::testing::two_buyer;
use rumpsteak_epp::{format_global, format_projection, project};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let protocol = two_buyer()?;
    protocol.validate()?;

    let projections = project(&protocol)?;
    info!(roles = projections.len(), "Projected two-buyer protocol");

    print!("{}", format_global(&protocol));
    println!();
    print!("{}", format_projection(&projections));

    Ok(())
}
