use stacktoken_types::{Address, Amount, TimestampMs, ADDRESS_LEN};

use crate::CodecError;

/// Sequential big-endian reader over one encoded record.
///
/// The offset only moves forward. A read that fails leaves it where it was,
/// including compound reads such as a length prefix followed by its payload.
#[derive(Debug)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        let have = self.remaining();
        if have < n {
            return Err(CodecError::UnexpectedEof {
                offset: self.offset,
                need: n,
                have,
            });
        }
        let out = &self.buf[self.offset..self.offset + n];
        self.offset += n;
        Ok(out)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let b = self.take(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(b);
        Ok(out)
    }

    // Rewind on failure so multi-step reads are all-or-nothing.
    fn atomic<T>(
        &mut self,
        read: impl FnOnce(&mut Self) -> Result<T, CodecError>,
    ) -> Result<T, CodecError> {
        let start = self.offset;
        let res = read(self);
        if res.is_err() {
            self.offset = start;
        }
        res
    }

    /// Read a big-endian unsigned integer of 1, 4 or 8 bytes.
    pub fn read_fixed_uint(&mut self, width: usize) -> Result<u64, CodecError> {
        if !matches!(width, 1 | 4 | 8) {
            return Err(CodecError::UnsupportedWidth(width));
        }
        let b = self.take(width)?;
        Ok(b.iter().fold(0u64, |acc, &x| (acc << 8) | u64::from(x)))
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_be_bytes(self.take_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, CodecError> {
        Ok(u64::from_be_bytes(self.take_array()?))
    }

    /// 4-byte big-endian length `L`, then `L` raw bytes.
    pub fn read_length_prefixed_bytes(&mut self) -> Result<&'a [u8], CodecError> {
        self.atomic(|c| {
            let len = c.read_u32()? as usize;
            c.take(len)
        })
    }

    pub fn read_utf8_string(&mut self) -> Result<String, CodecError> {
        self.atomic(|c| {
            let bytes = c.read_length_prefixed_bytes()?;
            std::str::from_utf8(bytes)
                .map(str::to_owned)
                .map_err(|_| CodecError::InvalidUtf8)
        })
    }

    pub fn read_address(&mut self) -> Result<Address, CodecError> {
        self.take_array::<ADDRESS_LEN>().map(Address::from_bytes)
    }

    /// Length-prefixed big-endian unsigned integer of any size. A zero
    /// length decodes as zero.
    pub fn read_big_uint(&mut self) -> Result<Amount, CodecError> {
        self.read_length_prefixed_bytes().map(Amount::from_be_bytes)
    }

    /// One presence byte, then the value only if the byte is nonzero.
    pub fn read_optional_u64(&mut self) -> Result<Option<u64>, CodecError> {
        self.atomic(|c| match c.read_u8()? {
            0 => Ok(None),
            _ => c.read_u64().map(Some),
        })
    }

    /// Read one ordinal byte and look it up in `table`.
    ///
    /// A tag outside the table is still consumed, so a caller that maps it
    /// to a fallback value continues with the next field.
    pub fn read_enum_byte<T: Copy>(
        &mut self,
        table: &[T],
        type_name: &'static str,
    ) -> Result<T, CodecError> {
        let tag = self.read_u8()?;
        table
            .get(tag as usize)
            .copied()
            .ok_or(CodecError::InvalidEnumTag { tag, type_name })
    }

    /// One byte; zero is false and any other value is true.
    pub fn read_bool(&mut self) -> Result<bool, CodecError> {
        self.read_u8().map(|b| b != 0)
    }

    /// u64 seconds on the wire, milliseconds in memory.
    pub fn read_timestamp_ms(&mut self) -> Result<TimestampMs, CodecError> {
        self.atomic(|c| {
            let secs = c.read_u64()?;
            TimestampMs::from_secs(secs).ok_or(CodecError::TimestampOverflow(secs))
        })
    }
}
