//ROM images: raw dumps, or the first .rom/.bin inside a zip archive.

use std::io;
use std::path::Path;

use anyhow::{Context, anyhow};

use crate::memory::CP500_ROM_SIZE;

fn is_zip(data: &[u8]) -> bool {
    data.starts_with(b"PK\x03\x04")
}

/// Validates an image and unpacks it if it is archived.
pub fn rom_image(data: &[u8]) -> anyhow::Result<Vec<u8>> {
    let image = if is_zip(data) {
        rom_from_zip(data).context("reading ROM archive")?
    } else {
        data.to_vec()
    };
    if image.is_empty() {
        return Err(anyhow!("empty ROM image"));
    }
    if image.len() > CP500_ROM_SIZE {
        return Err(anyhow!("ROM image too big: {} bytes, at most {}", image.len(), CP500_ROM_SIZE));
    }
    Ok(image)
}

pub fn rom_from_file(path: impl AsRef<Path>) -> anyhow::Result<Vec<u8>> {
    let path = path.as_ref();
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    rom_image(&data)
}

#[cfg(feature = "zip")]
fn rom_from_zip(data: &[u8]) -> io::Result<Vec<u8>> {
    use std::io::{Cursor, Read};

    let mut zip = zip::ZipArchive::new(Cursor::new(data))?;
    for i in 0..zip.len() {
        let mut ze = zip.by_index(i)?;
        let Some(name) = ze.enclosed_name() else { continue };
        let ext = name
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        if let Some("rom" | "bin") = ext.as_deref() {
            log::info!("unzipping ROM {}", name.to_string_lossy());
            let mut res = Vec::new();
            ze.read_to_end(&mut res)?;
            return Ok(res);
        }
    }
    Err(io::ErrorKind::InvalidData.into())
}

#[cfg(not(feature = "zip"))]
fn rom_from_zip(_data: &[u8]) -> io::Result<Vec<u8>> {
    Err(io::ErrorKind::Unsupported.into())
}
