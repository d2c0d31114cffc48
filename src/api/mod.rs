//! HTTP boundary.
//!
//! Translates requests into service calls: a resolved token becomes a
//! `302 Found`, an unresolvable one a `404`.
//!
//! - [`dto`] - response bodies
//! - [`handlers`] - request handlers
//! - [`middleware`] - request tracing

pub mod dto;
pub mod handlers;
pub mod middleware;
