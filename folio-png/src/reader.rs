/// A reader for reading bytes from a byte stream.
#[derive(Debug, Clone)]
pub(crate) struct Reader<'a> {
    /// The underlying data.
    data: &'a [u8],
    /// The position in bytes.
    cur_pos: usize,
}

impl<'a> Reader<'a> {
    #[inline(always)]
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, cur_pos: 0 }
    }

    #[inline(always)]
    pub(crate) fn at_end(&self) -> bool {
        self.cur_pos >= self.data.len()
    }

    /// Read the given number of bytes.
    #[inline(always)]
    pub(crate) fn read_bytes(&mut self, len: usize) -> Option<&'a [u8]> {
        let start = self.cur_pos;
        let end = start.checked_add(len)?;
        let bytes = self.data.get(start..end)?;
        self.cur_pos = end;

        Some(bytes)
    }

    /// Read a single byte.
    #[inline(always)]
    pub(crate) fn read_byte(&mut self) -> Option<u8> {
        let byte = self.data.get(self.cur_pos).copied()?;
        self.cur_pos += 1;

        Some(byte)
    }

    /// Skip the given number of bytes.
    #[inline(always)]
    pub(crate) fn skip_bytes(&mut self, len: usize) -> Option<()> {
        self.read_bytes(len).map(|_| ())
    }

    /// Read an u32 number.
    #[inline(always)]
    pub(crate) fn read_u32(&mut self) -> Option<u32> {
        Some(u32::from_be_bytes(self.read_bytes(4)?.try_into().ok()?))
    }

    /// Read a 4-byte chunk type tag.
    #[inline(always)]
    pub(crate) fn read_tag(&mut self) -> Option<[u8; 4]> {
        self.read_bytes(4)?.try_into().ok()
    }
}
