//! sdfont CLI library.

pub mod cli;
