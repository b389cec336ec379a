//! # Commands
//!
//! Policy commands built on top of the management adapter.
//!
//! - `set_policy`: fetch, merge caller input, confirm, persist
//! - `show_policy`: fetch and return the stored policy

pub mod set_policy;
pub mod show_policy;
