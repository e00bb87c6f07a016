//Little endian field codec for save states, plus the optional zlib wrapper.

use std::io::{self, prelude::*};

impl<R: Read + ?Sized> ReadExt for R {}

pub trait ReadExt: Read {
    fn read_u8(&mut self) -> io::Result<u8> {
        let mut b = 0;
        self.read_exact(std::slice::from_mut(&mut b))?;
        Ok(b)
    }
    fn read_u16(&mut self) -> io::Result<u16> {
        let mut bs = [0; 2];
        self.read_exact(&mut bs)?;
        Ok(u16::from_le_bytes(bs))
    }
    fn read_u32(&mut self) -> io::Result<u32> {
        let mut bs = [0; 4];
        self.read_exact(&mut bs)?;
        Ok(u32::from_le_bytes(bs))
    }
    fn read_i32(&mut self) -> io::Result<i32> {
        let mut bs = [0; 4];
        self.read_exact(&mut bs)?;
        Ok(i32::from_le_bytes(bs))
    }
    fn read_bool(&mut self) -> io::Result<bool> {
        Ok(self.read_u8()? != 0)
    }
}

impl<W: Write + ?Sized> WriteExt for W {}

pub trait WriteExt: Write {
    fn write_u8(&mut self, v: u8) -> io::Result<()> {
        self.write_all(&[v])
    }
    fn write_u16(&mut self, v: u16) -> io::Result<()> {
        self.write_all(&v.to_le_bytes())
    }
    fn write_u32(&mut self, v: u32) -> io::Result<()> {
        self.write_all(&v.to_le_bytes())
    }
    fn write_i32(&mut self, v: i32) -> io::Result<()> {
        self.write_all(&v.to_le_bytes())
    }
    fn write_bool(&mut self, v: bool) -> io::Result<()> {
        self.write_u8(v as u8)
    }
}

#[cfg(feature = "flate2")]
pub fn deflate(data: &[u8]) -> anyhow::Result<Vec<u8>> {
    let mut z = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    z.write_all(data)?;
    Ok(z.finish()?)
}

#[cfg(not(feature = "flate2"))]
pub fn deflate(_: &[u8]) -> anyhow::Result<Vec<u8>> {
    Err(anyhow::anyhow!("compressed states are not supported"))
}

#[cfg(feature = "flate2")]
pub fn inflate(data: &[u8]) -> anyhow::Result<Vec<u8>> {
    let mut z = flate2::read::ZlibDecoder::new(data);
    let mut res = Vec::new();
    z.read_to_end(&mut res)?;
    Ok(res)
}

#[cfg(not(feature = "flate2"))]
pub fn inflate(_: &[u8]) -> anyhow::Result<Vec<u8>> {
    Err(anyhow::anyhow!("compressed states are not supported"))
}
