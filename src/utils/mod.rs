//! Small helpers shared by services and binaries.
//!
//! - [`destination`] - destination URL validation

pub mod destination;
