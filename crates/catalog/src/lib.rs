//! Catalog domain module: products and their perishable batches.
//!
//! This crate contains business rules for the catalog, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod batch;
pub mod product;

pub use batch::{Batch, NewBatch};
pub use product::{NewProduct, Product};
