//! Pointer strides walkthrough.
//!
//! A ten-element `f32` buffer is read through a dozen spellings of "the
//! element after the first": byte addresses, typed pointers, index syntax.
//! All of them agree except the one that adds a byte count to a typed
//! pointer, which advances by elements and lands on index 4.

pub mod address;
pub mod buffer;
pub mod config;
pub mod error;
pub mod raw;
pub mod report;
pub mod walkthrough;

pub use address::{Address, ElementPtr};
pub use buffer::{FloatBuffer, ELEMENT_WIDTH};
pub use config::{ConfigError, WalkthroughConfig};
pub use error::{Result, StrideError};
pub use walkthrough::{AccessForm, AddressCheck, Step, Trace, Walkthrough};
