//! Fixed-width field buffer.
//!
//! A [`FieldBuffer`] owns one contiguous byte region laid out as a sequence
//! of fixed-size text fields. Values are packed left-justified and padded
//! with spaces, then unpacked in the same order. The region is reused across
//! records via [`FieldBuffer::clear`] so a tight ingestion loop never
//! reallocates.
//!
//! Every pack, unpack and load checks the target range against the buffer
//! capacity before touching a byte.

use crate::error::FieldBufferError;
use std::io::{self, Write};

/// Byte used to pad short values to their declared field size
pub const PAD_BYTE: u8 = b' ';

type BufferResult<T> = std::result::Result<T, FieldBufferError>;

/// Ordered list of declared field sizes in bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    sizes: Vec<usize>,
}

impl FieldSchema {
    /// Validate and build a schema; it must declare at least one field and
    /// every field must be at least one byte wide.
    pub fn new(sizes: impl Into<Vec<usize>>) -> BufferResult<Self> {
        let sizes = sizes.into();

        if sizes.is_empty() {
            return Err(FieldBufferError::invalid_schema("schema declares no fields"));
        }

        if let Some(index) = sizes.iter().position(|&size| size == 0) {
            return Err(FieldBufferError::invalid_schema(format!(
                "field {} has a declared size of 0",
                index
            )));
        }

        Ok(Self { sizes })
    }

    /// Number of declared fields, never zero
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Declared size of the field at `index`
    pub fn size(&self, index: usize) -> Option<usize> {
        self.sizes.get(index).copied()
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Sum of all declared sizes
    pub fn total_size(&self) -> usize {
        self.sizes.iter().sum()
    }
}

/// Lifecycle of the record currently held by a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferState {
    /// No field packed since construction or the last clear
    Empty,
    /// Some, but not all, declared fields packed
    Packing,
    /// Every declared field packed
    Full,
}

/// Reusable byte region holding one fixed-width record
#[derive(Debug, Clone)]
pub struct FieldBuffer {
    bytes: Vec<u8>,
    schema: FieldSchema,
    packed_fields: usize,
    pack_offset: usize,
    unpacked_fields: usize,
    unpack_offset: usize,
}

impl FieldBuffer {
    /// Create a buffer whose capacity is the sum of the schema's field sizes
    pub fn new(schema: FieldSchema) -> Self {
        let capacity = schema.total_size();
        Self::allocate(schema, capacity)
    }

    /// Validate `sizes` and create a schema-sized buffer
    pub fn from_sizes(sizes: &[usize]) -> BufferResult<Self> {
        Ok(Self::new(FieldSchema::new(sizes)?))
    }

    /// Create a buffer with an explicit byte capacity.
    ///
    /// The capacity may be smaller than the schema's total size; packing a
    /// field that would cross it then fails with
    /// [`FieldBufferError::BufferOverflow`].
    pub fn with_capacity(schema: FieldSchema, capacity: usize) -> BufferResult<Self> {
        if capacity == 0 {
            return Err(FieldBufferError::invalid_schema(
                "buffer capacity must be at least one byte",
            ));
        }
        Ok(Self::allocate(schema, capacity))
    }

    fn allocate(schema: FieldSchema, capacity: usize) -> Self {
        Self {
            bytes: vec![PAD_BYTE; capacity],
            schema,
            packed_fields: 0,
            pack_offset: 0,
            unpacked_fields: 0,
            unpack_offset: 0,
        }
    }

    /// Reset both cursors; schema and capacity are kept
    pub fn clear(&mut self) {
        self.packed_fields = 0;
        self.pack_offset = 0;
        self.rewind();
    }

    /// Reset only the unpack cursor so the packed record can be read again
    pub fn rewind(&mut self) {
        self.unpacked_fields = 0;
        self.unpack_offset = 0;
    }

    /// Write `text` into the next field slot.
    ///
    /// The value is left-justified and padded with spaces to the declared
    /// size. Longer values are truncated to the declared size, backing off to
    /// the previous character boundary so a multi-byte character is never
    /// split.
    pub fn pack(&mut self, text: &str) -> BufferResult<()> {
        let size = self
            .schema
            .size(self.packed_fields)
            .ok_or(FieldBufferError::SchemaExhausted {
                operation: "pack",
                field_count: self.schema.len(),
            })?;

        let start = self.pack_offset;
        let end = self.checked_end(start, size)?;
        let value = truncate_to_boundary(text, size);

        let slot = &mut self.bytes[start..end];
        slot[..value.len()].copy_from_slice(value.as_bytes());
        slot[value.len()..].fill(PAD_BYTE);

        self.pack_offset = end;
        self.packed_fields += 1;
        Ok(())
    }

    /// Read the next packed field, pad spaces included
    pub fn unpack(&mut self) -> BufferResult<&str> {
        if self.unpacked_fields >= self.packed_fields {
            return Err(FieldBufferError::SchemaExhausted {
                operation: "unpack",
                field_count: self.packed_fields,
            });
        }

        let field = self.unpacked_fields;
        let size = self
            .schema
            .size(field)
            .ok_or(FieldBufferError::SchemaExhausted {
                operation: "unpack",
                field_count: self.schema.len(),
            })?;

        let start = self.unpack_offset;
        let end = self.checked_end(start, size)?;

        self.unpack_offset = end;
        self.unpacked_fields += 1;

        std::str::from_utf8(&self.bytes[start..end])
            .map_err(|_| FieldBufferError::InvalidEncoding { field })
    }

    /// Number of fields packed into the current record
    pub fn field_count(&self) -> usize {
        self.packed_fields
    }

    pub fn state(&self) -> BufferState {
        match self.packed_fields {
            0 => BufferState::Empty,
            n if n >= self.schema.len() => BufferState::Full,
            _ => BufferState::Packing,
        }
    }

    /// Size of the byte region
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    /// Bytes of the fields packed so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.pack_offset]
    }

    /// Emit the packed record as one fixed-width line
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.as_bytes())?;
        writer.write_all(b"\n")
    }

    /// Replace the current record with a previously written fixed-width line.
    ///
    /// Only fields fully covered by `bytes` count as packed; a trailing
    /// partial field is ignored.
    pub fn load(&mut self, bytes: &[u8]) -> BufferResult<()> {
        if bytes.len() > self.bytes.len() {
            return Err(FieldBufferError::BufferOverflow {
                offset: 0,
                requested: bytes.len(),
                capacity: self.bytes.len(),
            });
        }

        self.clear();
        self.bytes[..bytes.len()].copy_from_slice(bytes);

        for &size in self.schema.sizes() {
            let end = self.pack_offset + size;
            if end > bytes.len() {
                break;
            }
            self.pack_offset = end;
            self.packed_fields += 1;
        }

        Ok(())
    }

    fn checked_end(&self, offset: usize, size: usize) -> BufferResult<usize> {
        offset
            .checked_add(size)
            .filter(|&end| end <= self.bytes.len())
            .ok_or(FieldBufferError::BufferOverflow {
                offset,
                requested: size,
                capacity: self.bytes.len(),
            })
    }
}

/// Longest prefix of `text` that fits in `max_bytes` without splitting a character
pub fn truncate_to_boundary(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
