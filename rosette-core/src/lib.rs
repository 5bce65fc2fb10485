//! Rosette Core
//!
//! A reactive, declarative UI element graph. Application data is bound
//! through typed binders, element subtrees are synthesized from the bound
//! types, and a pull-based update loop keeps them in sync with the live
//! values. Concrete widget toolkits bind to the elements from outside.
//!
//! # Architecture
//!
//! - `reactive`: observable properties and subscription handles
//! - `binder`: getters, binders and their composition
//! - `shape`: per-type presentation descriptors and their cache
//! - `element`: the element graph, view bridges and the list container
//! - `build`: binder to element synthesis and custom presenters
//! - `ui`: hand-written element construction
//! - `update`: the per-frame update loop
//! - `persist`: the state storage boundary
//!
//! # Example
//!
//! ```rust,ignore
//! use rosette_core::binder::Binder;
//! use rosette_core::build::SliderRange;
//! use rosette_core::shape::Shared;
//! use rosette_core::ui;
//! use rosette_core::update::UpdateLoop;
//!
//! let speed = Shared::new(5i32);
//! let window = ui::window("Settings", vec![
//!     ui::slider("Speed", Binder::from_shared(&speed), SliderRange::new(0, 10)),
//! ])?;
//!
//! let mut update_loop = UpdateLoop::new();
//! update_loop.register(window);
//! update_loop.tick();
//! ```

pub mod binder;
pub mod build;
pub mod config;
pub mod element;
pub mod error;
pub mod persist;
pub mod reactive;
pub mod shape;
pub mod ui;
pub mod update;

pub use error::{Result, UiError};
