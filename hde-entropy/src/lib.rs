// hde-entropy/src/lib.rs
#![no_std]

extern crate alloc; 

#[cfg(feature = "std")]
extern crate std;

pub mod entropy;
pub mod direction;
pub mod statistics;

pub use direction::{Direction, DirectionCount};
