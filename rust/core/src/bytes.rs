// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Byte-order aware append-only writer
//!
//! Numeric values are laid out in host order and swapped only when the
//! configured byte order disagrees with the host, so the produced bytes are
//! identical on little- and big-endian machines.

use crate::error::{Error, Result};

/// Output representation of a writer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    Binary,
    Text,
}

/// Byte order used for multi-byte numeric writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    LittleEndian,
    BigEndian,
    /// Host order, never swapped
    Native,
}

impl ByteOrder {
    /// Byte order of the machine we are running on
    #[inline]
    pub fn host() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::BigEndian
        } else {
            ByteOrder::LittleEndian
        }
    }
}

/// Append-only byte buffer
#[derive(Debug, Clone)]
pub struct BytesWriter {
    bytes: Vec<u8>,
    representation: Representation,
    byte_order: ByteOrder,
}

impl BytesWriter {
    /// Create an empty writer
    pub fn new(representation: Representation, byte_order: ByteOrder) -> Self {
        Self {
            bytes: Vec::new(),
            representation,
            byte_order,
        }
    }

    /// Create an empty writer with preallocated capacity
    pub fn with_capacity(
        representation: Representation,
        byte_order: ByteOrder,
        capacity: usize,
    ) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
            representation,
            byte_order,
        }
    }

    #[inline]
    pub fn representation(&self) -> Representation {
        self.representation
    }

    #[inline]
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// True when numeric writes must be byte-swapped
    #[inline]
    pub fn is_endian_mismatch(&self) -> bool {
        match self.byte_order {
            ByteOrder::Native => false,
            order => order != ByteOrder::host(),
        }
    }

    #[inline]
    fn ensure_binary(&self) -> Result<()> {
        if self.representation != Representation::Binary {
            return Err(Error::NotBinary);
        }
        Ok(())
    }

    /// Append a 32-bit signed integer
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.ensure_binary()?;
        let value = if self.is_endian_mismatch() {
            value.swap_bytes()
        } else {
            value
        };
        self.bytes.extend_from_slice(&value.to_ne_bytes());
        Ok(())
    }

    /// Append a 32-bit unsigned integer
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.ensure_binary()?;
        let value = if self.is_endian_mismatch() {
            value.swap_bytes()
        } else {
            value
        };
        self.bytes.extend_from_slice(&value.to_ne_bytes());
        Ok(())
    }

    /// Append a 16-bit unsigned integer
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.ensure_binary()?;
        let value = if self.is_endian_mismatch() {
            value.swap_bytes()
        } else {
            value
        };
        self.bytes.extend_from_slice(&value.to_ne_bytes());
        Ok(())
    }

    /// Append a 4-byte IEEE-754 float
    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.ensure_binary()?;
        let bits = if self.is_endian_mismatch() {
            value.to_bits().swap_bytes()
        } else {
            value.to_bits()
        };
        self.bytes.extend_from_slice(&bits.to_ne_bytes());
        Ok(())
    }

    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Append a character, UTF-8 encoded
    #[inline]
    pub fn write_char(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.bytes.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
    }

    /// Append raw string bytes, no length prefix and no terminator
    #[inline]
    pub fn write_string(&mut self, s: &str) {
        self.bytes.extend_from_slice(s.as_bytes());
    }

    #[inline]
    pub fn get_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Take the accumulated buffer, leaving the writer empty
    pub fn take_bytes(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.bytes)
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary(order: ByteOrder) -> BytesWriter {
        BytesWriter::new(Representation::Binary, order)
    }

    #[test]
    fn test_write_char() {
        let mut writer = binary(ByteOrder::LittleEndian);
        writer.write_char('a');
        writer.write_char('b');
        writer.write_char('c');
        assert_eq!(writer.get_bytes(), b"abc");
    }

    #[test]
    fn test_write_byte_and_bytes() {
        let mut writer = binary(ByteOrder::LittleEndian);
        writer.write_byte(0xff);
        writer.write_bytes(&[0x0b, 0xca]);
        assert_eq!(writer.get_bytes(), &[0xff, 0x0b, 0xca]);
    }

    #[test]
    fn test_write_string_has_no_terminator() {
        let mut writer = BytesWriter::new(Representation::Text, ByteOrder::Native);
        writer.write_string("solid");
        assert_eq!(writer.get_bytes(), b"solid");
        assert_eq!(writer.len(), 5);
    }

    #[test]
    fn test_write_i32_little_endian() {
        let mut writer = binary(ByteOrder::LittleEndian);
        writer.write_i32(1).unwrap();
        assert_eq!(writer.get_bytes(), &[0x01, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_write_i32_big_endian() {
        let mut writer = binary(ByteOrder::BigEndian);
        writer.write_i32(1).unwrap();
        assert_eq!(writer.get_bytes(), &[0x00, 0x00, 0x00, 0x01]);
    }

    #[test]
    fn test_write_i32_native_never_swaps() {
        let mut writer = binary(ByteOrder::Native);
        writer.write_i32(0x0102_0304).unwrap();
        assert_eq!(writer.get_bytes(), &0x0102_0304i32.to_ne_bytes());
        assert!(!writer.is_endian_mismatch());
    }

    #[test]
    fn test_write_f32_both_orders() {
        let mut le = binary(ByteOrder::LittleEndian);
        le.write_f32(1.0).unwrap();
        assert_eq!(le.get_bytes(), &[0x00, 0x00, 0x80, 0x3f]);

        let mut be = binary(ByteOrder::BigEndian);
        be.write_f32(1.0).unwrap();
        assert_eq!(be.get_bytes(), &[0x3f, 0x80, 0x00, 0x00]);
    }

    #[test]
    fn test_write_u16_u32() {
        let mut writer = binary(ByteOrder::LittleEndian);
        writer.write_u32(12).unwrap();
        writer.write_u16(0x0201).unwrap();
        assert_eq!(writer.get_bytes(), &[12, 0, 0, 0, 0x01, 0x02]);
    }

    #[test]
    fn test_numeric_write_rejected_in_text_mode() {
        let mut writer = BytesWriter::new(Representation::Text, ByteOrder::LittleEndian);
        assert_eq!(writer.write_i32(1), Err(Error::NotBinary));
        assert_eq!(writer.write_f32(1.0), Err(Error::NotBinary));
        assert!(writer.is_empty());
    }

    #[test]
    fn test_clear_and_take() {
        let mut writer = binary(ByteOrder::LittleEndian);
        writer.write_bytes(&[1, 2, 3]);
        writer.clear();
        assert!(writer.is_empty());

        writer.write_byte(9);
        assert_eq!(writer.take_bytes(), vec![9]);
        assert!(writer.is_empty());
    }
}
