// Integration tests for pgdelta

pub mod cli;
pub mod diff;
pub mod helpers;
pub mod push;
pub mod unit;
