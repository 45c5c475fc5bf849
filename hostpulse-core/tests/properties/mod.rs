//! Property test modules

mod history_tests;
mod parser_tests;
mod profile_tests;
mod rate_tests;
