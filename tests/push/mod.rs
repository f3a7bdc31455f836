// Push flow against an in-memory database

pub mod apply;
pub mod hints;
