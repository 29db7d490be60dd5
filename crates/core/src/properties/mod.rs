//! Property sets and the `.properties` text format.

pub mod format;
mod set;

pub use set::PropertySet;
