//! The same walkthrough with real raw pointers and integer addresses.

use std::mem::size_of;

use crate::buffer::FloatBuffer;
use crate::config::{ConfigError, MIN_ELEMENT_COUNT};
use crate::error::Result;

/// Integer addresses that should all name element 1, plus the base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawAddresses {
    pub base: usize,
    pub first_element: usize,
    pub plus_one: usize,
    pub index_one: usize,
    pub integer_plus_width: usize,
}

fn checked_block(len: usize) -> Result<FloatBuffer> {
    if len < MIN_ELEMENT_COUNT {
        return Err(ConfigError::TooSmall {
            len,
            min: MIN_ELEMENT_COUNT,
        }
        .into());
    }
    Ok(FloatBuffer::new(len))
}

/// Scratch values in the same order as [`crate::walkthrough::AccessForm::ALL`].
pub fn run_raw(len: usize) -> Result<Vec<f32>> {
    let block = checked_block(len)?;
    let my_float_ptr: *const f32 = block.as_ptr();
    let mut scratch = Vec::with_capacity(8);

    let mut float_array_address = my_float_ptr as usize;
    float_array_address += size_of::<f32>();

    // SAFETY: every pointer below is derived from `block`, which is alive for the
    // whole function and holds at least MIN_ELEMENT_COUNT elements. The largest
    // index touched is size_of::<f32>() == MIN_ELEMENT_COUNT - 1.
    unsafe {
        let my_other_float_ptr = float_array_address as *const f32;
        scratch.push(*my_other_float_ptr.add(0));
        scratch.push(*(float_array_address as *const f32).add(0));
        scratch.push(*my_other_float_ptr);
        scratch.push(*(float_array_address as *const f32));

        float_array_address = my_float_ptr as usize;
        scratch.push(*((float_array_address + size_of::<f32>()) as *const f32));
        scratch.push(*(float_array_address as *const f32).add(size_of::<f32>()));

        scratch.push(*my_float_ptr.add(1));
    }
    scratch.push(block.as_slice()[1]);

    Ok(scratch)
}

/// Reads element 1 by moving a pointer forward one element's worth of bytes.
pub fn read_via_byte_add(len: usize) -> Result<f32> {
    let block = checked_block(len)?;
    // SAFETY: one element's width past the start is element 1, inside `block`.
    let value = unsafe { *block.as_ptr().byte_add(size_of::<f32>()) };
    Ok(value)
}

pub fn address_identities(len: usize) -> Result<RawAddresses> {
    let block = checked_block(len)?;
    let my_float_ptr = block.as_ptr();
    Ok(RawAddresses {
        base: my_float_ptr as usize,
        first_element: &block.as_slice()[0] as *const f32 as usize,
        plus_one: my_float_ptr.wrapping_add(1) as usize,
        index_one: &block.as_slice()[1] as *const f32 as usize,
        integer_plus_width: my_float_ptr as usize + size_of::<f32>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StrideError;

    #[test]
    fn test_raw_sequence() {
        assert_eq!(
            run_raw(10).unwrap(),
            vec![1.0, 1.0, 1.0, 1.0, 1.0, 4.0, 1.0, 1.0]
        );
    }

    #[test]
    fn test_byte_add_reads_second_element() {
        assert_eq!(read_via_byte_add(10).unwrap(), 1.0);
    }

    #[test]
    fn test_raw_addresses_agree() {
        let addresses = address_identities(10).unwrap();
        assert_eq!(addresses.first_element, addresses.base);
        assert_eq!(addresses.plus_one, addresses.index_one);
        assert_eq!(addresses.index_one, addresses.integer_plus_width);
        assert_eq!(addresses.plus_one - addresses.base, 4);
    }

    #[test]
    fn test_raw_rejects_short_block() {
        assert!(matches!(run_raw(3), Err(StrideError::Config(_))));
    }
}
