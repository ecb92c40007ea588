//! Scenario tests exercising the field arithmetic through its public API.

pub mod logging;

#[cfg(test)]
mod integration;
