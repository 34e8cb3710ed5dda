pub mod format;
pub mod naming;
