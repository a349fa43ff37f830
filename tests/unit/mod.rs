//! Unit test modules.

mod placeholder_test;
mod registry_test;
