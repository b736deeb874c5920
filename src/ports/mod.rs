//! Ports - boundaries between the core and its drivers

pub mod observer;
pub mod solver;

pub use observer::TrainingObserver;
pub use solver::Solver;
