//! Domain layer
//!
//! Contains pure business logic with no external dependencies.
//! - `entities`: Domain models representing core business concepts
//! - `policy`: Access rules evaluated before every protected operation
//! - `ports`: Trait definitions for external dependencies

pub mod entities;
pub mod policy;
pub mod ports;
