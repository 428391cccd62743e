// src/manager/mod.rs

//! The task pool and the algorithms that run it.
//!
//! - [`task_manager`] owns live instances, routes messages and steps the pool.
//! - [`manager_step`] defines the result type for a step.
//! - [`retention`] decides which spent instances can be deleted.

pub mod manager_step;
pub mod retention;
pub mod task_manager;

pub use manager_step::ManagerStep;
pub use task_manager::TaskManager;
