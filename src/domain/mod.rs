//! Domain models for rescat
//!
//! This module contains pure domain objects: resource records and the
//! category paths derived from their identifiers. These types carry no I/O.

pub mod category;
pub mod resource;

pub use category::{CATEGORY_SEPARATOR, CategoryPath, DEFAULT_CATEGORY};
pub use resource::{Resource, ResourceType, SourceDescriptor, TransportScheme};
