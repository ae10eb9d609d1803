//! Sector weather-impact scoring.
//!
//! The engine (`services::impact`, `services::trend`) is pure and
//! synchronous. `services::openweather` fetches the readings it scores and
//! `routes` exposes both over HTTP.

pub mod config;
pub mod errors;
pub mod helpers;
pub mod models;
pub mod routes;
pub mod services;
