//! Domain layer: entities, token rules, repository contracts and the click
//! pipeline.
//!
//! - [`entities`] - short links and their statistics
//! - [`token`] - token shape check and normalization
//! - [`device`] - device classification from the `User-Agent` header
//! - [`repositories`] - data access traits implemented in
//!   [`crate::infrastructure::persistence`]
//! - [`click_event`] / [`click_worker`] - fire-and-forget click counting
//!
//! # Click Processing Flow
//!
//! 1. The redirect resolver classifies the request and builds a
//!    [`click_event::ClickEvent`]
//! 2. The event is pushed onto a bounded channel without waiting
//! 3. [`click_worker::run_click_worker`] applies it with retries
//! 4. Counters are persisted via [`repositories::StatsRepository`]

pub mod click_event;
pub mod click_worker;
pub mod device;
pub mod entities;
pub mod repositories;
pub mod token;
