//! Board module tests.
//!
//! Tests are organized into separate files by category:
//! - `perft.rs` - Reference move counts for the legal generator
//! - `edge_cases.rs` - Pins, checks, en passant, castling and promotion
//! - `proptest.rs` - Property-based tests over random legal walks

mod proptest;
