//! Request middleware. Token authentication lives in the HTTP extractors,
//! not here.

pub mod trace;

pub use trace::Trace;
