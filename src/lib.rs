//! Multiparty session-type endpoint projection (Aura flavored).
//!
//! Write a protocol once from the global viewpoint and derive each
//! participant's local protocol from it:
//!
//! ```
//! use rumpsteak_epp::{project, render, GlobalProtocol, Role};
//!
//! let protocol = GlobalProtocol::builder()
//!     .roles(["A", "B", "C"])
//!     .branch("A", "B", |b| {
//!         b.option("yes", |o| o.transfer("B", "C", "go"))
//!             .option("no", |o| o.transfer("B", "C", "go"))
//!     })
//!     .build()
//!     .unwrap();
//!
//! let local = project(&protocol).unwrap();
//! assert_eq!(render(&local[&Role::new("C")]), "?B {\n\tgo {\n\t}\n}\n");
//! ```

pub use rumpsteak_epp_choreography as choreography;
pub use rumpsteak_epp_choreography::*;
