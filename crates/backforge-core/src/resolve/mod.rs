//! Foreign-key resolution.
//!
//! Every binary association gets exactly one [`ForeignKeyDecision`]. The
//! decisions are computed once per compile run into a [`ForeignKeyTable`]
//! that both synthesizers read.

mod decision;
mod resolver;

pub use decision::{Cardinality, ForeignKey, ForeignKeyDecision, ForeignKeyTable};
pub use resolver::ForeignKeyResolver;
