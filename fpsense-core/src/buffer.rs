//! User buffer access
//!
//! Commands carry an opaque user buffer. Accessibility is checked up front
//! for the command's declared direction and size, before anything is
//! mutated; the copy itself can still fault.

use crate::error::Error;

/// Caller-supplied command buffer
pub trait UserBuffer {
    /// Check if `len` bytes can be read from the buffer
    fn readable(&self, len: usize) -> bool;

    /// Check if `len` bytes can be written to the buffer
    fn writable(&self, len: usize) -> bool;

    /// Copy `dst.len()` bytes out of the buffer
    fn read_into(&self, dst: &mut [u8]) -> Result<(), Error>;

    /// Copy `src` into the buffer
    fn write_from(&mut self, src: &[u8]) -> Result<(), Error>;
}

impl UserBuffer for [u8] {
    fn readable(&self, len: usize) -> bool {
        self.len() >= len
    }

    fn writable(&self, len: usize) -> bool {
        self.len() >= len
    }

    fn read_into(&self, dst: &mut [u8]) -> Result<(), Error> {
        let src = self.get(..dst.len()).ok_or(Error::BufferFault)?;
        dst.copy_from_slice(src);
        Ok(())
    }

    fn write_from(&mut self, src: &[u8]) -> Result<(), Error> {
        let dst = self.get_mut(..src.len()).ok_or(Error::BufferFault)?;
        dst.copy_from_slice(src);
        Ok(())
    }
}

/// Read-only view of a byte slice
#[derive(Debug, Clone, Copy)]
pub struct ReadOnly<'a>(pub &'a [u8]);

impl UserBuffer for ReadOnly<'_> {
    fn readable(&self, len: usize) -> bool {
        self.0.len() >= len
    }

    fn writable(&self, _len: usize) -> bool {
        false
    }

    fn read_into(&self, dst: &mut [u8]) -> Result<(), Error> {
        self.0.read_into(dst)
    }

    fn write_from(&mut self, _src: &[u8]) -> Result<(), Error> {
        Err(Error::BufferFault)
    }
}

/// Absent buffer, for commands that carry no payload
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBuffer;

impl UserBuffer for NoBuffer {
    fn readable(&self, len: usize) -> bool {
        len == 0
    }

    fn writable(&self, len: usize) -> bool {
        len == 0
    }

    fn read_into(&self, dst: &mut [u8]) -> Result<(), Error> {
        if dst.is_empty() {
            Ok(())
        } else {
            Err(Error::BufferFault)
        }
    }

    fn write_from(&mut self, src: &[u8]) -> Result<(), Error> {
        if src.is_empty() {
            Ok(())
        } else {
            Err(Error::BufferFault)
        }
    }
}
