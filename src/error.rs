use thiserror::Error;

use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, StrideError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrideError {
    #[error("element index {index} is out of bounds for a buffer of {len} elements")]
    OutOfBounds { index: usize, len: usize },

    #[error("byte offset {offset} is not a multiple of the element width ({width} bytes)")]
    Misaligned { offset: usize, width: usize },

    #[error("address {address:#x} lies outside the buffer at {base:#x} ({len_bytes} bytes)")]
    AddressOutsideBuffer {
        address: usize,
        base: usize,
        len_bytes: usize,
    },

    #[error("step '{label}' read {observed}, expected {expected}")]
    Divergence {
        label: String,
        expected: f32,
        observed: f32,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl StrideError {
    pub fn divergence(label: impl Into<String>, expected: f32, observed: f32) -> Self {
        Self::Divergence {
            label: label.into(),
            expected,
            observed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_display() {
        let error = StrideError::OutOfBounds { index: 12, len: 10 };
        let display = error.to_string();
        assert!(display.contains("12"));
        assert!(display.contains("10 elements"));
    }

    #[test]
    fn test_address_display_is_hex() {
        let error = StrideError::AddressOutsideBuffer {
            address: 0x1040,
            base: 0x1000,
            len_bytes: 40,
        };
        assert!(error.to_string().contains("0x1040"));
    }

    #[test]
    fn test_config_error_converts() {
        let error: StrideError = ConfigError::TooSmall { len: 3, min: 5 }.into();
        assert!(matches!(error, StrideError::Config(_)));
    }
}
