use std::mem::size_of;
use std::ops::Index;

use crate::address::{Address, ElementPtr};
use crate::error::{Result, StrideError};

/// Width of one element in bytes.
pub const ELEMENT_WIDTH: usize = size_of::<f32>();

/// Contiguous, exclusively owned block of `f32` where element `i` holds `i`.
///
/// The storage is released when the buffer is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatBuffer {
    data: Vec<f32>,
}

impl FloatBuffer {
    pub fn new(len: usize) -> Self {
        let data = (0..len).map(|i| i as f32).collect();
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len_bytes(&self) -> usize {
        self.data.len() * ELEMENT_WIDTH
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_ptr(&self) -> *const f32 {
        self.data.as_ptr()
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.data.get(index).copied()
    }

    /// Integer value of the start of the buffer.
    pub fn base_address(&self) -> Address {
        Address::new(self.data.as_ptr() as usize)
    }

    /// Address of one element, the same as taking `&buf[index]` and casting it.
    pub fn address_of(&self, index: usize) -> Result<Address> {
        let element = self.data.get(index).ok_or(StrideError::OutOfBounds {
            index,
            len: self.len(),
        })?;
        Ok(Address::new(element as *const f32 as usize))
    }

    pub fn byte_offset_from_element_index(&self, index: usize) -> Result<usize> {
        if index >= self.len() {
            return Err(StrideError::OutOfBounds {
                index,
                len: self.len(),
            });
        }
        Ok(index * ELEMENT_WIDTH)
    }

    /// Fails when the offset splits an element or lies past the last one.
    pub fn element_index_from_byte_offset(&self, offset: usize) -> Result<usize> {
        if offset % ELEMENT_WIDTH != 0 {
            return Err(StrideError::Misaligned {
                offset,
                width: ELEMENT_WIDTH,
            });
        }
        let index = offset / ELEMENT_WIDTH;
        if index >= self.len() {
            return Err(StrideError::OutOfBounds {
                index,
                len: self.len(),
            });
        }
        Ok(index)
    }

    /// Byte offset of `address` from the start of the buffer.
    pub fn offset_of(&self, address: Address) -> Result<usize> {
        let base = self.base_address().get();
        match address.get().checked_sub(base) {
            Some(offset) if offset < self.len_bytes() => Ok(offset),
            _ => Err(StrideError::AddressOutsideBuffer {
                address: address.get(),
                base,
                len_bytes: self.len_bytes(),
            }),
        }
    }

    /// Treat `address` as a pointer to an element and load it.
    pub fn read_at(&self, address: Address) -> Result<f32> {
        let offset = self.offset_of(address)?;
        let index = self.element_index_from_byte_offset(offset)?;
        Ok(self.data[index])
    }

    /// Element pointer to the first element.
    pub fn cursor(&self) -> ElementPtr<'_> {
        ElementPtr::new(self, 0)
    }
}

impl Default for FloatBuffer {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_ELEMENT_COUNT)
    }
}

impl Index<usize> for FloatBuffer {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        &self.data[index]
    }
}
