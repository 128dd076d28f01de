//! Tutorial step resolution and navigation for docsteps.
//!
//! Content flows through this crate in one direction:
//! content source → [`resolver`] → [`aggregator`] → [`navigation`].
//! [`cache`] memoizes built tutorials, [`catalog`] backs the tutorial list,
//! and [`location`] classifies router locations.

pub mod aggregator;
pub mod cache;
pub mod catalog;
pub mod location;
pub mod navigation;
pub mod resolver;
mod tutorial;

pub use tutorial::Tutorial;
