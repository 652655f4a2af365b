use super::errors::{ErrorKind, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use log::{trace, warn};
use math::{PlaneD, Vec3d, Vec3f};
use std::io::{self, Read, Seek, SeekFrom};

const MAX_STRING_LEN: u32 = 1 << 16;

/// Sequential little-endian reader over a seekable stream. Values are returned in host order.
///
/// When `dump` is set every read is traced, with its offset, at `trace` level; the decoder toggles
/// it around regions it wants to inspect.
pub struct Reader<R> {
    inner: R,
    dump: bool,
}

macro_rules! read_scalar {
    ($(#[$attr:meta])* $name:ident, $type:ty, $method:ident) => {
        $(#[$attr])*
        pub fn $name(&mut self) -> Result<$type> {
            let offset = self.position();
            let value = self
                .inner
                .$method::<LittleEndian>()
                .map_err(ErrorKind::on_read(offset, stringify!($type)))?;
            if self.dump {
                trace!("{:#010x} {:>3} {:?}", offset, stringify!($type), value);
            }
            Ok(value)
        }
    };
}

impl<R: Read + Seek> Reader<R> {
    pub fn new(inner: R, dump: bool) -> Self {
        Reader { inner, dump }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    #[inline]
    pub fn dump(&self) -> bool {
        self.dump
    }

    /// Enables or disables tracing, returning the previous state.
    pub fn set_dump(&mut self, dump: bool) -> bool {
        std::mem::replace(&mut self.dump, dump)
    }

    pub fn tell(&mut self) -> Result<u64> {
        self.inner
            .seek(SeekFrom::Current(0))
            .map_err(ErrorKind::on_seek(0))
    }

    pub fn seek(&mut self, to: SeekFrom) -> Result<u64> {
        let target = match to {
            SeekFrom::Start(offset) => offset as i64,
            SeekFrom::Current(offset) | SeekFrom::End(offset) => offset,
        };
        self.inner.seek(to).map_err(ErrorKind::on_seek(target))
    }

    /// Skips `len` bytes. Negative lengths seek backwards.
    pub fn skip(&mut self, len: i64) -> Result<()> {
        self.seek(SeekFrom::Current(len)).map(|_| ())
    }

    /// Consumes `len` bytes without keeping them. Unlike `skip`, running out of input is an error.
    pub fn discard(&mut self, len: u64) -> Result<()> {
        let offset = self.position();
        let consumed = io::copy(&mut (&mut self.inner).take(len), &mut io::sink())
            .map_err(ErrorKind::on_read(offset, "bytes"))?;
        if consumed < len {
            return Err(ErrorKind::TruncatedInput {
                offset: offset + consumed,
                reading: "bytes",
            }
            .into());
        }
        if self.dump {
            trace!("{:#010x} ... {} bytes skipped", offset, len);
        }
        Ok(())
    }

    fn position(&mut self) -> u64 {
        self.inner.seek(SeekFrom::Current(0)).unwrap_or(0)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let offset = self.position();
        let value = self
            .inner
            .read_u8()
            .map_err(ErrorKind::on_read(offset, "u8"))?;
        if self.dump {
            trace!("{:#010x}  u8 {:#04x}", offset, value);
        }
        Ok(value)
    }

    read_scalar!(read_i16, i16, read_i16);
    read_scalar!(read_u16, u16, read_u16);
    read_scalar!(read_i32, i32, read_i32);
    read_scalar!(read_u32, u32, read_u32);
    read_scalar!(read_i64, i64, read_i64);
    read_scalar!(read_u64, u64, read_u64);
    read_scalar!(read_f32, f32, read_f32);
    read_scalar!(read_f64, f64, read_f64);

    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let offset = self.position();
        let mut bytes = vec![0u8; len];
        self.inner
            .read_exact(&mut bytes)
            .map_err(ErrorKind::on_read(offset, "bytes"))?;
        if self.dump {
            trace!("{:#010x} raw {:02x?}", offset, bytes);
        }
        Ok(bytes)
    }

    pub fn read_rgb(&mut self) -> Result<[u8; 3]> {
        Ok([self.read_u8()?, self.read_u8()?, self.read_u8()?])
    }

    /// Reads a `u32` length followed by that many Latin-1 bytes. Trailing NULs are dropped.
    pub fn read_string(&mut self) -> Result<String> {
        let offset = self.position();
        let len = self.read_u32()?;
        if len > MAX_STRING_LEN {
            return Err(ErrorKind::CorruptCount {
                what: "string length",
                count: i64::from(len),
            }
            .into());
        }
        let bytes = self.read_bytes(len as usize)?;
        let end = bytes
            .iter()
            .rposition(|&byte| byte != 0)
            .map_or(0, |last| last + 1);
        let string: String = bytes[..end].iter().map(|&byte| char::from(byte)).collect();
        if self.dump {
            trace!("{:#010x} str {:?}", offset, string);
        }
        Ok(string)
    }

    /// Reads a table size, rejecting negative values.
    pub fn read_count(&mut self, what: &'static str) -> Result<usize> {
        let count = self.read_i32()?;
        if count < 0 {
            return Err(ErrorKind::CorruptCount {
                what,
                count: i64::from(count),
            }
            .into());
        }
        Ok(count as usize)
    }

    pub fn read_vector3(&mut self) -> Result<Vec3d> {
        Ok(Vec3d::new(self.read_f64()?, self.read_f64()?, self.read_f64()?))
    }

    pub fn read_vector3f(&mut self) -> Result<Vec3f> {
        Ok(Vec3f::new(self.read_f32()?, self.read_f32()?, self.read_f32()?))
    }

    pub fn read_plane(&mut self) -> Result<PlaneD> {
        let normal = self.read_vector3()?;
        let d = self.read_f64()?;
        Ok(PlaneD::new(normal, d))
    }

    /// Reads `len` bytes expected to all equal `value`. A mismatch is only reported, the bytes are
    /// consumed either way. Returns whether the run matched.
    pub fn expect_bytes(&mut self, value: u8, len: usize, what: &str) -> Result<bool> {
        let offset = self.position();
        let matched = self.read_bytes(len)?.iter().all(|&byte| byte == value);
        if !matched {
            warn!(
                "Expected {} bytes of {:#04x} ({}) at offset {:#x}.",
                len, value, what, offset
            );
        }
        Ok(matched)
    }
}
