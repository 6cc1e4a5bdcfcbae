//! Turnstile - Fixed-Window Request Admission
//!
//! This crate implements an in-process fixed-window rate limiter. A
//! [`Limiter`](ratelimit::Limiter) admits at most `capacity` requests per
//! window and restarts its quota in full once the window has passed.
//!
//! ```
//! use turnstile::ratelimit::{IntervalUnit, Limiter};
//!
//! let limiter = Limiter::new(2, 1, IntervalUnit::Seconds)?;
//! assert!(limiter.try_admit());
//! assert!(limiter.try_admit());
//! assert!(!limiter.try_admit());
//! # Ok::<(), turnstile::error::TurnstileError>(())
//! ```

pub mod config;
pub mod error;
pub mod ratelimit;
pub mod simulate;
