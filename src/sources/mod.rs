//! One reader per source format. Readers only extract; canonicalization
//! happens in [`crate::raw::RawMatchRecord::into_canonical`].

pub mod archive;
pub mod json_2018;
pub mod legacy_2014;
pub mod split_2022;
pub mod tabular;
