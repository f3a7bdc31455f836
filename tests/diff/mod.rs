// Diff engine tests: snapshot pairs in, statements out

pub mod columns;
pub mod constraints;
pub mod enums;
pub mod objects;
pub mod properties;
pub mod tables;
