//! Core types for protractor diagrams.
//!
//! This crate holds the pieces every diagram generator shares:
//!
//! - [`geometry`]: points, directions, angles and the interior-sweep rule
//! - [`scene`]: the renderer-agnostic draw-instruction model
//! - [`stroke`]: solid and dashed line styles
//! - [`color`]: CSS color parsing for renderers

pub mod color;
pub mod geometry;
pub mod scene;
pub mod stroke;
