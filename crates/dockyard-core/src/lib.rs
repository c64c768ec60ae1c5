#![forbid(unsafe_code)]

//! Core: pixel geometry and normalized pointer input.
//!
//! # Role in Dockyard
//! `dockyard-core` is the input layer. It owns the coordinate types shared by
//! the layout engine and the interaction controllers, and the pointer event
//! vocabulary that host adapters translate platform input into.
//!
//! # How it fits in the system
//! `dockyard-layout` uses [`geometry::Rect`] to solve and hit-test layouts;
//! `dockyard-runtime` consumes [`event::PointerEvent`] values in its drag and
//! resize controllers.

pub mod event;
pub mod geometry;

pub use event::{PointerButton, PointerEvent, PointerEventKind};
pub use geometry::{Point, Rect};
