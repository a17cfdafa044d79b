//! User interfaces binding to the console controller

pub mod cli;
