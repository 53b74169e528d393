#![no_std]
extern crate alloc;

pub mod adapter;
pub mod coverage;
pub mod error;
pub mod hasher;
pub mod verify;
pub mod witness;

pub use error::Error;
pub use verify::verify;
