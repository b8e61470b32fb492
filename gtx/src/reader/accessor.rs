use crate::error::Error;
use std::io::SeekFrom;

macro_rules! buf_try_get_impl {
    ($this:ident, $typ:tt::$conv:tt) => {{
        const SIZE: usize = core::mem::size_of::<$typ>();
        let mut buf = [0; SIZE];
        $this.copy_to_slice(&mut buf)?;
        Ok($typ::$conv(buf))
    }};
}

/// Cursor over a byte source. Every getter fails with
/// [`Error::BrokenFile`] instead of reading past the end.
#[allow(clippy::len_without_is_empty)]
pub trait Accessor {
    fn pos(&self) -> usize;
    fn len(&self) -> usize;
    fn try_seek(&mut self, style: SeekFrom) -> Result<u64, Error>;
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error>;

    #[inline]
    fn remaining(&self) -> usize {
        self.len().saturating_sub(self.pos())
    }

    #[inline]
    fn advance(&mut self, nbytes: usize) -> Result<(), Error> {
        if nbytes > self.remaining() {
            return Err(Error::BrokenFile);
        }
        self.try_seek(SeekFrom::Current(nbytes as i64))?;
        Ok(())
    }

    /// Like [`advance`](Accessor::advance) but stops at the end of the source.
    #[inline]
    fn skip(&mut self, nbytes: usize) -> Result<(), Error> {
        self.advance(nbytes.min(self.remaining()))
    }

    #[inline]
    fn copy_to_slice(&mut self, dst: &mut [u8]) -> Result<(), Error> {
        let n = self.read(dst)?;
        if n != dst.len() {
            return Err(Error::BrokenFile);
        }
        Ok(())
    }

    fn get_u32_be(&mut self) -> Result<u32, Error> {
        buf_try_get_impl!(self, u32::from_be_bytes)
    }

    #[inline]
    fn get_magic(&mut self) -> Result<[u8; 4], Error> {
        let mut magic = [0; 4];
        self.copy_to_slice(&mut magic)?;
        Ok(magic)
    }
}
