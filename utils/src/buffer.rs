use cesu8::from_java_cesu8;
use thiserror::Error;

/// A buffer reader, used to marshall big-endian data from a generic byte array.
/// Every read either consumes exactly the bytes it needs, or fails without moving.
pub struct Buffer<'a> {
    buffer: &'a [u8],
    position: usize,
}

/// Errors related to reading from a [Buffer]
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum BufferError {
    #[error(
        "unexpected end of data at offset {position}: needed {requested} bytes, {available} available"
    )]
    UnexpectedEndOfData {
        position: usize,
        requested: usize,
        available: usize,
    },

    #[error("invalid cesu8 string at offset {position}")]
    InvalidCesu8String { position: usize },
}

type Result<T> = std::result::Result<T, BufferError>;

impl<'a> Buffer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Buffer {
            buffer: data,
            position: 0,
        }
    }

    /// Offset of the next byte that will be read
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    fn advance(&mut self, size: usize) -> Result<&'a [u8]> {
        if size > self.remaining() {
            Err(BufferError::UnexpectedEndOfData {
                position: self.position,
                requested: size,
                available: self.remaining(),
            })
        } else {
            let slice = &self.buffer[self.position..self.position + size];
            self.position += size;
            Ok(slice)
        }
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.advance(N)?;
        let mut array = [0u8; N];
        array.copy_from_slice(bytes);
        Ok(array)
    }

    /// Returns the next byte without consuming it
    pub fn peek_u8(&self) -> Result<u8> {
        self.buffer
            .get(self.position)
            .copied()
            .ok_or(BufferError::UnexpectedEndOfData {
                position: self.position,
                requested: 1,
                available: 0,
            })
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_array().map(u8::from_be_bytes)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_array().map(u16::from_be_bytes)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_array().map(u32::from_be_bytes)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        self.read_array().map(i8::from_be_bytes)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.read_array().map(i16::from_be_bytes)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.read_array().map(i32::from_be_bytes)
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        self.read_array().map(i64::from_be_bytes)
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.read_array().map(f32::from_be_bytes)
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.read_array().map(f64::from_be_bytes)
    }

    /// Reads a string in the JVM "modified UTF-8" encoding
    pub fn read_utf8(&mut self, len: usize) -> Result<String> {
        let position = self.position;
        self.advance(len)
            .and_then(|bytes| {
                from_java_cesu8(bytes).map_err(|_| BufferError::InvalidCesu8String { position })
            })
            .map(|cow_string| cow_string.into_owned())
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.advance(len)
    }

    pub fn has_more_data(&self) -> bool {
        self.position < self.buffer.len()
    }
}
