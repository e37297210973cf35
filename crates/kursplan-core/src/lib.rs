//! State synchronisation for the class-schedule calendar.
//!
//! Selection and view live in [`persist::PersistentParameter`]s mirrored
//! into the URL and local storage. [`binding::CalendarBinding`] pushes them
//! into the external calendar widget, and [`overlay::OverlayController`]
//! owns the event popover. Everything runs on one thread over an injected
//! [`reactive::Store`].

pub mod api;
pub mod binding;
pub mod catalog;
pub mod config;
pub mod content;
pub mod error;
pub mod overlay;
pub mod persist;
pub mod position;
pub mod reactive;
pub mod runtime;
pub mod selection;
pub mod sidebar;
pub mod view;

pub use error::{
  Error,
  Result
};
