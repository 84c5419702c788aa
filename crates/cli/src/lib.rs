//! Library half of the `roledir` binary: command definitions and the
//! per-invocation context.

pub mod commands;
pub mod context;
