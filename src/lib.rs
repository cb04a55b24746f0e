//! Formgate - Contact Form Rate Limiting and Relay Gating
//!
//! This crate implements the submission-throttling core of a contact form
//! that relays messages through a third-party email service. It tracks
//! attempts per client identity with a sliding window, escalates to a timed
//! block, and prunes stale state with a periodic background sweep. Because
//! there is no backend to resolve a real network address, identities are
//! heuristic browser fingerprints and the submission flow fails open when
//! one cannot be derived.

pub mod config;
pub mod contact;
pub mod error;
pub mod identity;
pub mod ratelimit;
