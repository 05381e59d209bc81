//! Lomography filter: a logistic tone curve on the red channel followed by a
//! soft radial vignette, tuned live with two sliders.

pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod io;
pub mod logger;
pub mod ops;
pub mod surface;
pub mod viewer;

pub use controller::{Event, Outcome, ParameterController};
pub use error::{LomoError, Result};
