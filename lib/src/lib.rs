#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod brute;
pub mod client;
pub mod engine;
pub mod error;
pub mod invocation;
pub mod probe;
pub mod publish;
pub mod report;
pub mod resolve;
pub mod target;
pub mod wordlist;

pub use error::Error;
