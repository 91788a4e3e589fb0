//! Two kinds of arithmetic over the same memory.
//!
//! An [`Address`] is a plain integer: adding `n` moves it `n` bytes.
//! An [`ElementPtr`] knows its element type: adding `n` moves it `n` elements,
//! which is `n * ELEMENT_WIDTH` bytes.

use serde::Serialize;
use std::fmt;
use std::ops::{Add, AddAssign};

use crate::buffer::{FloatBuffer, ELEMENT_WIDTH};
use crate::error::{Result, StrideError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Address(usize);

impl Address {
    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> usize {
        self.0
    }

    /// Wraps like any integer; `FloatBuffer::read_at` rejects what lands outside.
    pub fn offset_bytes(self, bytes: usize) -> Self {
        Self(self.0.wrapping_add(bytes))
    }

    /// Reinterpret the address as a pointer to an element of `buffer`.
    pub fn cast(self, buffer: &FloatBuffer) -> Result<ElementPtr<'_>> {
        let offset = buffer.offset_of(self)?;
        let index = buffer.element_index_from_byte_offset(offset)?;
        Ok(ElementPtr::new(buffer, index))
    }
}

impl Add<usize> for Address {
    type Output = Address;

    fn add(self, bytes: usize) -> Address {
        self.offset_bytes(bytes)
    }
}

impl AddAssign<usize> for Address {
    fn add_assign(&mut self, bytes: usize) {
        self.0 = self.0.wrapping_add(bytes);
    }
}

impl From<Address> for usize {
    fn from(address: Address) -> usize {
        address.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Typed position inside a [`FloatBuffer`].
///
/// Like a raw pointer it may be moved past the end; only reading checks bounds.
/// Moving saturates at `usize::MAX`, which is always out of bounds.
#[derive(Clone, Copy)]
pub struct ElementPtr<'a> {
    buffer: &'a FloatBuffer,
    index: usize,
}

impl<'a> ElementPtr<'a> {
    pub(crate) fn new(buffer: &'a FloatBuffer, index: usize) -> Self {
        Self { buffer, index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Move forward by whole elements.
    pub fn add(self, count: usize) -> Self {
        Self::new(self.buffer, self.index.saturating_add(count))
    }

    /// The pointer as an integer.
    pub fn address(&self) -> Address {
        self.buffer.base_address() + self.index.wrapping_mul(ELEMENT_WIDTH)
    }

    /// Dereference.
    pub fn read(&self) -> Result<f32> {
        if self.index >= self.buffer.len() {
            return Err(StrideError::OutOfBounds {
                index: self.index,
                len: self.buffer.len(),
            });
        }
        self.buffer.read_at(self.address())
    }

    /// Index syntax: `p.at(i)` reads the same element as `(p + i).read()`.
    pub fn at(&self, offset: usize) -> Result<f32> {
        self.add(offset).read()
    }
}

impl<'a> Add<usize> for ElementPtr<'a> {
    type Output = ElementPtr<'a>;

    fn add(self, count: usize) -> ElementPtr<'a> {
        ElementPtr::add(self, count)
    }
}

impl PartialEq for ElementPtr<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.buffer, other.buffer) && self.index == other.index
    }
}

impl Eq for ElementPtr<'_> {}

impl fmt::Debug for ElementPtr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementPtr")
            .field("index", &self.index)
            .field("address", &format_args!("{}", self.address()))
            .finish()
    }
}
