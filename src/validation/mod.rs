//! Construction-time validation of statechart graphs.
//!
//! The engine itself trusts its graph: a composite without an initial child or
//! a local transition between unrelated states would make dispatch
//! meaningless. Those defects are caught here, once, when the graph is built.
//!
//! Validation uses Stillwater's `Validation` type to accumulate ALL violations
//! instead of stopping at the first one, so a broken table is reported in a
//! single pass.
//!
//! # Example
//!
//! ```rust
//! use hsm_engine::builder::{BuildError, GraphBuilder};
//! use hsm_engine::validation::GraphViolation;
//!
//! let mut builder = GraphBuilder::<(), i32>::new();
//! let root = builder.root("ROOT");
//! let a = builder.state("A", root);
//! builder.state("A1", a);
//!
//! match builder.build() {
//!     Err(BuildError::InvalidGraph(violations)) => {
//!         assert!(violations.contains(&GraphViolation::MissingInitial {
//!             state: "A".to_string()
//!         }));
//!     }
//!     _ => panic!("A has a child but no initial state"),
//! }
//! ```

pub mod rules;
pub mod violations;

pub use rules::{validate, RuleResult};
pub use violations::GraphViolation;
