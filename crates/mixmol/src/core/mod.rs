//! Core building blocks shared by the layout engine, the recipe reader and
//! the preview renderer
//!
//! Nothing in here knows about corners, chains or rings; those live in
//! [`crate::layout`].

mod canvas;
mod error;
pub mod geometry;
pub mod logging;
mod seed;
mod text;
mod types;

pub use canvas::*;
pub use error::*;
pub use geometry::*;
pub use logging::*;
pub use seed::*;
pub use text::*;
pub use types::*;
