//! Recursive filter expressions built on `json-model`.
//!
//! A [`Filter`] joins clauses with a [`Conjunction`]; each clause is an open
//! union of a [`Condition`] leaf or another boxed [`Filter`]. Both enums are
//! open, so operators and conjunctions added server-side decode fine and only
//! fail on `validate()`.

pub mod filter;

pub use filter::{Clause, Condition, Conjunction, Filter, Operator};
