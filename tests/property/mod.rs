//! Property-based tests

mod date_proptest;
mod pair_proptest;
