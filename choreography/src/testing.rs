//! Sample protocols for tests, benches and demos
//!
//! Available with the `test-utils` feature.

use crate::ast::GlobalProtocol;
use crate::ast::ValidationError;

/// Two buyers negotiate a purchase from one seller.
///
/// `buyer1` asks for a title, learns the price and proposes a split to
/// `buyer2`, who then repeatedly decides to accept, quit or retry.
pub fn two_buyer() -> Result<GlobalProtocol, ValidationError> {
    GlobalProtocol::builder()
        .roles(["buyer1", "buyer2", "seller"])
        .transfer("buyer1", "seller", "title")
        .transfer("seller", "buyer1", "price")
        .transfer("buyer1", "buyer2", "split")
        .repeat(|body| {
            body.branch("buyer2", "buyer1", |b| {
                b.option("accept", |o| {
                    o.transfer("buyer1", "seller", "done").break_loop()
                })
                .option("quit", |o| {
                    o.transfer("buyer1", "seller", "done").break_loop()
                })
                .option("retry", |o| o.transfer("buyer1", "seller", "retry"))
            })
        })
        .build()
}

/// `A` pings `B`, `B` answers with `pong`.
pub fn ping_pong() -> Result<GlobalProtocol, ValidationError> {
    GlobalProtocol::builder()
        .roles(["A", "B"])
        .transfer("A", "B", "ping")
        .transfer("B", "A", "pong")
        .build()
}

/// `A` tells `B` its decision; `B` forwards `go` to `C` either way.
pub fn relayed_choice() -> Result<GlobalProtocol, ValidationError> {
    GlobalProtocol::builder()
        .roles(["A", "B", "C"])
        .branch("A", "B", |b| {
            b.option("yes", |o| o.transfer("B", "C", "go"))
                .option("no", |o| o.transfer("B", "C", "go"))
        })
        .build()
}
