//! Core library for the `restsampler` CLI.
//!
//! The [`sampler`] module executes one REST request per sample and captures
//! everything a load-testing harness reports about it: timing, status line,
//! headers, decoded body, redirect location and cookies. The [`stores`]
//! module provides the in-process collaborators (cookie jar, cache manager,
//! redirect follower) a [`sampler::Sampler`] can be wired with. The
//! remaining modules back the command-line application.
pub mod args;
pub mod config;
pub mod error;
pub mod logger;
pub mod sampler;
pub mod stores;
