//! Selection handling for the CaR viewer.
//!
//! A [`Session`] owns the [`car_ingest::ResultStore`] (or another record
//! lookup) for one results directory and turns each
//! [`car_model::Selection`] into a [`car_report::PlotSpec`] via [`resolve`]
//! and [`car_report::render`].

pub mod pipeline;
pub mod resolver;
pub mod session;

pub use pipeline::run_pipeline;
pub use resolver::resolve;
pub use session::Session;
