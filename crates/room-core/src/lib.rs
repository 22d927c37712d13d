//! Room Editor Core
//!
//! This crate contains the scene object engine behind the room editor:
//! - Registry: live primitives and models keyed by user-chosen id
//! - Factory: raw form fields to validated scene objects
//! - Placement: room bounds checks for creation and movement
//! - Controller: selection state machine and keyboard manipulation
//! - Lights: four singleton light slots with helper gizmos
//!
//! Rendering, DOM wiring and input collection live behind the traits in
//! [`host`].

pub mod bounds;
pub mod config;
pub mod controller;
pub mod editor;
pub mod error;
pub mod factory;
pub mod form;
pub mod host;
pub mod import;
pub mod input;
pub mod lights;
pub mod mesh;
pub mod navigation;
pub mod object;
pub mod placement;
pub mod primitive;
pub mod registry;
pub mod schedule;
pub mod transform;

pub use bounds::*;
pub use config::*;
pub use controller::*;
pub use editor::*;
pub use error::*;
pub use form::*;
pub use host::*;
pub use import::ImportToken;
pub use input::*;
pub use lights::*;
pub use navigation::*;
pub use object::*;
pub use registry::*;
pub use schedule::*;
pub use transform::*;
