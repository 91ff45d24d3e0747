//! rosecheck: a property-based testing engine with integrated shrinking.
//!
//! A splittable pseudo-random source ([`data::Seed`]) drives a lazy rose
//! tree of candidate values ([`tree::Tree`]); a small generator algebra
//! ([`gen::Gen`], [`primitive`], [`combinator`]) builds composite values
//! that carry their own shrink strategy; [`property::quick_check`] sequences
//! random trials and, on the first failure, searches the failing tree for a
//! minimal counterexample.

pub mod combinator;
pub mod data;
pub mod error;
pub mod gen;
pub mod primitive;
pub mod property;
pub mod tree;

pub use combinator::*;
pub use data::{Seed, Size};
pub use error::{Error, Result};
pub use gen::{generate, sample, sample_seq, Gen};
pub use primitive::*;
pub use property::{for_all, quick_check, Outcome, Property, QuickCheckOpts, Report, ReportEvent, ShrinkResult, TrialResult};
pub use tree::{join, shrink_vec, zip2, zip_vec, Children, Tree};
