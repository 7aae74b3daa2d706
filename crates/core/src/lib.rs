//! # Health Army Core
//!
//! Domain types and rules of the volunteer registry: the data model, the
//! error taxonomy, the authorization policy, the storage and notification
//! ports, and the [`service::VolunteerService`] that ties them together.
//! Nothing here knows about HTTP or PostgreSQL.

pub mod errors;
pub mod models;
pub mod notify;
pub mod policy;
pub mod repository;
pub mod service;
