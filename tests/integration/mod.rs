//! Integration tests against a mock chat server

pub mod api_test;
pub mod config_test;
pub mod flows_test;
