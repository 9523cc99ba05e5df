//! # blindhub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a small **JSON API** to read and toggle the mode switches
//!   (`/api/modes`), force an evaluation (`/api/tick`) and inject smoke
//!   alarms (`/api/alarm`)
//! - Optionally serve simulator routes that change sensor readings, smoke
//!   zones and cover levels through a
//!   [`HostSimulator`](blindhub_app::ports::HostSimulator)
//! - Map HTTP requests into [`ControlSurface`](blindhub_app::ports::ControlSurface)
//!   calls (driving adapter)
//! - Map domain errors into HTTP status codes
//!
//! ## Dependency rule
//! Depends on `blindhub-app` (for the driving port) and `blindhub-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
