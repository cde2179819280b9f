//! Foundation module - process-wide utilities

pub mod logging;
