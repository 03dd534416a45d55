#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::cast_precision_loss
)]

pub mod indexes;
pub mod input;
pub mod output;
pub mod product_space;
pub mod settings;

pub use econ_common;
pub use econ_complexity;
