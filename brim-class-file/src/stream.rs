use crate::{
    error::{self, ClassFileError},
    item::{ClassFileItem, ConstantPool},
};

/// A cursor over the raw bytes of a class file.
///
/// The whole file is materialized up front, so reads never block; a read
/// or skip that would pass the end of the buffer fails instead.
pub struct ClassFileStream<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ClassFileStream<'a> {
    /// Create a new stream over a byte buffer.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// The current offset into the buffer.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Read a sequence of `length` `T`s from this stream.
    pub fn read_sequence<T: ClassFileItem>(
        &mut self,
        constant_pool: Option<&ConstantPool>,
        length: usize,
    ) -> error::Result<Vec<T>> {
        let mut v = Vec::with_capacity(length);
        for _ in 0..length {
            v.push(T::read_from_stream(self, constant_pool)?);
        }
        Ok(v)
    }

    /// Read an unsigned 4-byte big-endian integer from the stream.
    pub fn read_u4(&mut self) -> error::Result<u32> {
        Ok(u32::from_be_bytes(self.read::<4>()?))
    }

    /// Read an unsigned 2-byte big-endian integer from the stream.
    pub fn read_u2(&mut self) -> error::Result<u16> {
        Ok(u16::from_be_bytes(self.read::<2>()?))
    }

    /// Read an unsigned byte from the stream.
    pub fn read_u1(&mut self) -> error::Result<u8> {
        Ok(self.read::<1>()?[0])
    }

    /// Utility method to read `S` bytes from the stream.
    pub fn read<const S: usize>(&mut self) -> error::Result<[u8; S]> {
        let mut w = [0; S];
        let bytes = self
            .data
            .get(self.pos..self.pos + S)
            .ok_or(ClassFileError::Truncated(self.pos))?;
        w.copy_from_slice(bytes);
        self.pos += S;
        Ok(w)
    }

    /// Utility method to read `l` bytes from the stream with runtime length.
    pub fn read_dynamic(&mut self, l: usize) -> error::Result<Vec<u8>> {
        let bytes = self
            .data
            .get(self.pos..self.pos + l)
            .ok_or(ClassFileError::Truncated(self.pos))?;
        self.pos += l;
        Ok(bytes.to_vec())
    }

    /// Advance the stream `n` bytes without reading them.
    pub fn skip(&mut self, n: usize) -> error::Result<()> {
        if self.pos + n > self.data.len() {
            return Err(ClassFileError::Truncated(self.pos));
        }
        self.pos += n;
        Ok(())
    }
}

impl ClassFileItem for u16 {
    fn read_from_stream(
        s: &mut ClassFileStream<'_>,
        _cp: Option<&ConstantPool>,
    ) -> error::Result<Self>
    where
        Self: std::marker::Sized,
    {
        s.read_u2()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_are_big_endian() {
        let mut s = ClassFileStream::new(&[0xca, 0xfe, 0xba, 0xbe, 0x00, 0x34, 0x7f]);
        assert_eq!(s.read_u4().unwrap(), 0xcafe_babe);
        assert_eq!(s.read_u2().unwrap(), 0x34);
        assert_eq!(s.read_u1().unwrap(), 0x7f);
        assert_eq!(s.pos(), 7);
    }

    #[test]
    fn skip_advances_without_reading() {
        let mut s = ClassFileStream::new(&[0, 0, 0, 0, 0, 0, 0xab]);
        s.skip(6).unwrap();
        assert_eq!(s.pos(), 6);
        assert_eq!(s.read_u1().unwrap(), 0xab);
    }

    #[test]
    fn reads_past_the_end_fail() {
        let mut s = ClassFileStream::new(&[0x00]);
        assert!(matches!(s.read_u2(), Err(ClassFileError::Truncated(0))));
        assert!(matches!(s.skip(2), Err(ClassFileError::Truncated(0))));
        assert_eq!(s.read_u1().unwrap(), 0x00);
    }
}
