//! Scope computation over processed output.

pub mod histogram;

pub use histogram::HistogramData;
