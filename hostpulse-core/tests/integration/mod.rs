//! Integration test modules

mod credential_tests;
mod registry_tests;
