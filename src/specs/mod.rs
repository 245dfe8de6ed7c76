// src/specs/mod.rs
//! # Scraping "specs" module
//!
//! Page-specific knowledge: *where the ground truth lives in the markup* and
//! *how to cut it into records*.
//!
//! ## What lives here
//! - **Pure text parsing** of the price page (`evaluate`), built on the
//!   literal scanners in `core::html`.
//! - **Scope rules** (`filter`): which groups and items are catalog entries.
//! - **Field layout** (`tokens`): the positional split of one listing.
//!
//! ## What does **not** live here
//! - Fetching (`core::net`), persistence and diffing (`store`), mail (`mail`).
//!
//! ## Conventions & invariants
//! - Filtering never fails; a skipped row is normal page furniture.
//! - Tokenizing fails loudly. A listing that does not match the layout means
//!   the page changed, and a half-parsed scrape must not reach the store.
//! - Specs are testable **offline** against captured or synthetic markup.
pub mod evaluate;
pub mod filter;
pub mod tokens;
