//! Value Binding
//!
//! Element synthesis works on *binders*: typed accessors that read and write
//! one live location without knowing where it lives.
//!
//! - [`Getter`]: read-only, optionally constant
//! - [`Binder`]: getter plus optional writer
//! - [`DynBinder`]: type-erased binder for member lookup by name
//!
//! Child binders (see [`Binder::child`]) compose parent access with a member
//! projection. Writes reassign the whole parent value.

mod accessor;
mod dyn_binder;
mod getter;

pub use accessor::Binder;
pub use dyn_binder::DynBinder;
pub use getter::Getter;
