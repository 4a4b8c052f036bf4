//! Property-based tests

pub mod query_key_proptest;
