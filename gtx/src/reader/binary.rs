use crate::Error;
use crate::reader::Accessor;
use std::io;
use std::io::{ErrorKind, Read, SeekFrom};

pub struct BinaryAccessor<T> {
    data: T,
    pos: u64,
    size: u64,
}

impl<T: AsRef<[u8]>> BinaryAccessor<T> {
    pub fn new(data: T) -> BinaryAccessor<T> {
        let size = data.as_ref().len() as u64;
        BinaryAccessor { data, pos: 0, size }
    }
}

impl<T: AsRef<[u8]>> Read for BinaryAccessor<T> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let data = self.data.as_ref();
        let pos = self.pos.min(data.len() as u64);
        let (_, mut r) = data.split_at(pos as usize);
        let n = Read::read(&mut r, buf)?;
        self.pos += n as u64;
        Ok(n)
    }
}

impl<T: AsRef<[u8]>> Accessor for BinaryAccessor<T> {
    #[inline]
    fn pos(&self) -> usize {
        self.pos as usize
    }

    #[inline]
    fn len(&self) -> usize {
        self.size as usize
    }

    #[inline]
    fn try_seek(&mut self, style: SeekFrom) -> Result<u64, Error> {
        let (base_pos, offset) = match style {
            SeekFrom::Start(n) => {
                self.pos = n;
                return Ok(n);
            }
            SeekFrom::End(n) => (self.size, n),
            SeekFrom::Current(n) => (self.pos, n),
        };

        match base_pos.checked_add_signed(offset) {
            Some(n) => {
                self.pos = n;
                Ok(self.pos)
            }
            None => Err(Error::IO(io::Error::new(
                ErrorKind::InvalidInput,
                "invalid seek to a negative or overflowing position",
            ))),
        }
    }

    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        Ok(Read::read(self, buf)?)
    }
}
