//! An owned byte buffer with bounds-checked access.

use core::cmp::Ordering;

use exif_container_types::exif::Endianness;

/// A growable buffer of bytes.
///
/// Every accessor checks its bounds. Out-of-range reads give `None` and
/// out-of-range writes give `false`; nothing here panics.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct DataBuf {
    data: Vec<u8>,
}

impl DataBuf {
    /// An empty buffer.
    pub const fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Allocates a zeroed buffer of `size` bytes.
    pub fn alloc(size: usize) -> Self {
        Self {
            data: vec![0_u8; size],
        }
    }

    /// Grows or shrinks the buffer. New bytes are zeroed.
    pub fn resize(&mut self, size: usize) {
        self.data.resize(size, 0_u8);
    }

    /// Drops all contents.
    pub fn reset(&mut self) {
        self.data.clear();
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// The bytes from `offset` to the end.
    ///
    /// `offset == size()` gives an empty slice. Anything past that is `None`.
    ///
    /// ```
    /// use exif_container::data_buf::DataBuf;
    ///
    /// let buf = DataBuf::from(vec![1_u8, 2, 3]);
    /// assert_eq!(buf.data(1), Some([2_u8, 3].as_slice()));
    /// assert_eq!(buf.data(3), Some([].as_slice()));
    /// assert_eq!(buf.data(4), None);
    /// ```
    pub fn data(&self, offset: usize) -> Option<&[u8]> {
        self.data.get(offset..)
    }

    /// Mutable version of [`DataBuf::data`].
    pub fn data_mut(&mut self, offset: usize) -> Option<&mut [u8]> {
        self.data.get_mut(offset..)
    }

    pub fn read_u8(&self, offset: usize) -> Option<u8> {
        self.data.get(offset).copied()
    }

    pub fn write_u8(&mut self, offset: usize, value: u8) -> bool {
        match self.data.get_mut(offset) {
            Some(b) => {
                *b = value;
                true
            }
            None => false,
        }
    }

    /// Reads a `u16` in the given byte order.
    pub fn read_u16(&self, offset: usize, endianness: Endianness) -> Option<u16> {
        let bytes: [u8; 2] = self.window(offset, 2)?.try_into().ok()?;
        Some(endianness.u16_from(bytes))
    }

    /// Reads a `u32` in the given byte order.
    pub fn read_u32(&self, offset: usize, endianness: Endianness) -> Option<u32> {
        let bytes: [u8; 4] = self.window(offset, 4)?.try_into().ok()?;
        Some(endianness.u32_from(bytes))
    }

    /// Writes a `u32` in the given byte order.
    pub fn write_u32(&mut self, offset: usize, value: u32, endianness: Endianness) -> bool {
        let Some(end) = offset.checked_add(4) else {
            return false;
        };
        match self.data.get_mut(offset..end) {
            Some(dst) => {
                dst.copy_from_slice(&endianness.u32_to(value));
                true
            }
            None => false,
        }
    }

    /// Compares the bytes at `offset` against `other`, like `memcmp`.
    ///
    /// Returns `None` if `other` doesn't fit in the buffer at `offset`.
    ///
    /// ```
    /// use core::cmp::Ordering;
    /// use exif_container::data_buf::DataBuf;
    ///
    /// let buf = DataBuf::from(b"xxExif\0\0".to_vec());
    /// assert_eq!(buf.cmp_bytes(2, b"Exif"), Some(Ordering::Equal));
    /// assert_eq!(buf.cmp_bytes(6, b"Exif"), None);
    /// ```
    pub fn cmp_bytes(&self, offset: usize, other: &[u8]) -> Option<Ordering> {
        Some(self.window(offset, other.len())?.cmp(other))
    }

    fn window(&self, offset: usize, len: usize) -> Option<&[u8]> {
        self.data.get(offset..offset.checked_add(len)?)
    }
}

impl From<Vec<u8>> for DataBuf {
    fn from(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl From<&[u8]> for DataBuf {
    fn from(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }
}

impl AsRef<[u8]> for DataBuf {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use core::cmp::Ordering;

    use exif_container_types::exif::Endianness;

    use super::DataBuf;
    use crate::util::logger;

    #[test]
    fn u32_respects_byte_order() {
        logger();

        let mut buf = DataBuf::alloc(8);
        assert!(buf.write_u32(0, 0x0102_0304, Endianness::Big));
        assert!(buf.write_u32(4, 0x0102_0304, Endianness::Little));
        assert_eq!(buf.as_slice(), &[1, 2, 3, 4, 4, 3, 2, 1]);

        assert_eq!(buf.read_u32(0, Endianness::Big), Some(0x0102_0304));
        assert_eq!(buf.read_u32(4, Endianness::Little), Some(0x0102_0304));
        assert_eq!(buf.read_u16(0, Endianness::Big), Some(0x0102));
        assert_eq!(buf.read_u16(6, Endianness::Little), Some(0x0102));
    }

    #[test]
    fn out_of_range_fails_closed() {
        logger();

        let mut buf = DataBuf::alloc(4);
        assert_eq!(buf.read_u8(4), None);
        assert!(!buf.write_u8(4, 1));
        assert_eq!(buf.read_u32(1, Endianness::Big), None);
        assert_eq!(buf.read_u16(3, Endianness::Big), None);
        assert_eq!(buf.read_u16(usize::MAX, Endianness::Big), None);
        assert!(!buf.write_u32(1, 7, Endianness::Big));
        assert!(!buf.write_u32(usize::MAX - 1, 7, Endianness::Big));
        assert_eq!(buf.cmp_bytes(usize::MAX, b"a"), None);

        // nothing changed
        assert_eq!(buf.as_slice(), &[0, 0, 0, 0]);
    }

    #[test]
    fn cmp_bytes_orders_like_memcmp() {
        logger();

        let buf = DataBuf::from(b"abcd".as_slice());
        assert_eq!(buf.cmp_bytes(1, b"bc"), Some(Ordering::Equal));
        assert_eq!(buf.cmp_bytes(1, b"bd"), Some(Ordering::Less));
        assert_eq!(buf.cmp_bytes(0, b"ab"), Some(Ordering::Equal));
        assert_eq!(buf.cmp_bytes(0, b""), Some(Ordering::Equal));
    }

    #[test]
    fn resize_and_reset() {
        logger();

        let mut buf = DataBuf::from(vec![1_u8, 2]);
        buf.resize(4);
        assert_eq!(buf.as_slice(), &[1, 2, 0, 0]);
        buf.reset();
        assert!(buf.is_empty());
        assert_eq!(buf.data(0), Some([].as_slice()));
    }
}
