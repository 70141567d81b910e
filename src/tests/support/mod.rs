// Shared test support code for the in-crate test cases.

pub mod common;
pub mod transport;

pub use common::*;
pub use transport::{FlakyTransport, GatedTransport};
