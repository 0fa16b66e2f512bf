//! Query buffer cursors.
//!
//! Wire format of every field is big-endian; lists carry a `u16` length
//! prefix:
//! ```text
//! ┌──────────────┬─────────────────────────┐
//! │ Length (2B)  │ bytes (N B)             │
//! │ BE u16       │                         │
//! └──────────────┴─────────────────────────┘
//! ```
//!
//! Both cursors borrow transport-owned memory for the duration of a single
//! dispatch. A failed read or write never moves the cursor, and a write
//! either lands completely or not at all.

use super::status::QueryError;

/// Size of a list length prefix.
pub const LIST_HEADER_SIZE: usize = 2;

/// Read cursor over an untrusted request payload.
pub struct QueryRequest<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> QueryRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], QueryError> {
        if self.remaining() < n {
            return Err(QueryError::RequestTooSmall);
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], QueryError> {
        let bytes = self.take(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, QueryError> {
        self.take_array::<1>().map(|b| b[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, QueryError> {
        self.take_array().map(u16::from_be_bytes)
    }

    pub fn read_u32(&mut self) -> Result<u32, QueryError> {
        self.take_array().map(u32::from_be_bytes)
    }

    pub fn read_i8(&mut self) -> Result<i8, QueryError> {
        self.take_array().map(i8::from_be_bytes)
    }

    pub fn read_i16(&mut self) -> Result<i16, QueryError> {
        self.take_array().map(i16::from_be_bytes)
    }

    pub fn read_i32(&mut self) -> Result<i32, QueryError> {
        self.take_array().map(i32::from_be_bytes)
    }

    /// Read a length-prefixed byte list, borrowing it from the payload.
    ///
    /// A truncated header or a body shorter than the declared length is
    /// `RequestTooSmall`; the cursor is left where it was.
    pub fn read_u8_list(&mut self) -> Result<&'a [u8], QueryError> {
        let start = self.pos;
        let len = self.read_u16()? as usize;
        match self.take(len) {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                self.pos = start;
                Err(e)
            }
        }
    }
}

/// Write cursor over the transport's response buffer.
pub struct QueryResponse<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> QueryResponse<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Space still available.
    pub fn unused(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.pos]
    }

    /// Copy one or more slices as a single record, all or nothing.
    fn put(&mut self, parts: &[&[u8]]) -> Result<(), QueryError> {
        let total: usize = parts.iter().map(|p| p.len()).sum();
        if total > self.unused() {
            return Err(QueryError::ResponseTooLarge);
        }
        for part in parts {
            self.buf[self.pos..self.pos + part.len()].copy_from_slice(part);
            self.pos += part.len();
        }
        Ok(())
    }

    pub fn write_u8(&mut self, v: u8) -> Result<(), QueryError> {
        self.put(&[&[v][..]])
    }

    pub fn write_u16(&mut self, v: u16) -> Result<(), QueryError> {
        self.put(&[&v.to_be_bytes()[..]])
    }

    pub fn write_u32(&mut self, v: u32) -> Result<(), QueryError> {
        self.put(&[&v.to_be_bytes()[..]])
    }

    pub fn write_i8(&mut self, v: i8) -> Result<(), QueryError> {
        self.put(&[&v.to_be_bytes()[..]])
    }

    pub fn write_i16(&mut self, v: i16) -> Result<(), QueryError> {
        self.put(&[&v.to_be_bytes()[..]])
    }

    pub fn write_i32(&mut self, v: i32) -> Result<(), QueryError> {
        self.put(&[&v.to_be_bytes()[..]])
    }

    pub fn write_bool(&mut self, v: bool) -> Result<(), QueryError> {
        self.write_u8(u8::from(v))
    }

    /// Write a length header followed by `bytes` as one atomic record.
    pub fn write_u8_list(&mut self, bytes: &[u8]) -> Result<(), QueryError> {
        let len = u16::try_from(bytes.len()).map_err(|_| QueryError::ResponseTooLarge)?;
        self.put(&[&len.to_be_bytes()[..], bytes])
    }
}
