//! Domain layer: lineage entities, the arena tree and its queries
//!
//! This layer is independent of CLI and configuration concerns.

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;

pub use arena::{VampireId, VampireNode, VampireTree};
pub use builder::{Lineage, LineageBuilder};
pub use entities::*;
pub use error::{DomainError, DomainResult};
