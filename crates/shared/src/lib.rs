//! Types shared across the fundraiser client crates: domain records, exact
//! native-unit amount conversion, and the error taxonomy.

pub mod amount;
pub mod domain;
pub mod error;
