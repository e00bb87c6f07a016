use std::io::{self, Read, Write};

pub const MAX_ROM_SIZE: usize = 0x3800;
pub const CP500_ROM_SIZE: usize = 0x4000;
//3K: the CP-500 M80 has three 1K pages of 80x24 video
pub const MAX_VIDEO_SIZE: usize = 0x0c00;
pub const MAX_MEMORY_SIZE: usize = 0x200000;
pub const MAX_SUPERMEM_SIZE: usize = 0x80000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Store {
    Rom,
    Cp500Rom,
    Ram,
    Video,
    SuperMem,
}

/// A physical byte: the result of decoding a logical address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub store: Store,
    pub index: usize,
}

impl Cell {
    pub fn new(store: Store, index: usize) -> Cell {
        Cell { store, index }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

/// The physical stores. Every address the decoder builds is reduced to one
/// of these arrays, so no access can reach outside of them.
pub struct Memory {
    rom: Vec<u8>,
    cp500_rom: Vec<u8>,
    ram: Vec<u8>,
    video: Vec<u8>,
    supermem: Vec<u8>,
    pub rom_size: usize,
    pub video_size: usize,
}

impl Memory {
    pub fn new() -> Self {
        Memory {
            rom: vec![0; MAX_ROM_SIZE],
            cp500_rom: vec![0; CP500_ROM_SIZE],
            ram: vec![0; MAX_MEMORY_SIZE],
            video: vec![0; MAX_VIDEO_SIZE],
            supermem: vec![0; MAX_SUPERMEM_SIZE],
            rom_size: 0,
            video_size: 1024,
        }
    }
    fn store(&self, store: Store) -> &[u8] {
        match store {
            Store::Rom => &self.rom,
            Store::Cp500Rom => &self.cp500_rom,
            Store::Ram => &self.ram,
            Store::Video => &self.video,
            Store::SuperMem => &self.supermem,
        }
    }
    fn store_mut(&mut self, store: Store) -> &mut [u8] {
        match store {
            Store::Rom => &mut self.rom,
            Store::Cp500Rom => &mut self.cp500_rom,
            Store::Ram => &mut self.ram,
            Store::Video => &mut self.video,
            Store::SuperMem => &mut self.supermem,
        }
    }
    //RAM indices wrap at the end of the 2MB store; anything else out of
    //range floats
    pub fn get(&self, cell: Cell) -> u8 {
        let index = match cell.store {
            Store::Ram => cell.index & (MAX_MEMORY_SIZE - 1),
            _ => cell.index,
        };
        self.store(cell.store).get(index).copied().unwrap_or(0xff)
    }
    pub fn set(&mut self, cell: Cell, value: u8) {
        let index = match cell.store {
            Store::Ram => cell.index & (MAX_MEMORY_SIZE - 1),
            _ => cell.index,
        };
        if let Some(b) = self.store_mut(cell.store).get_mut(index) {
            *b = value;
        }
    }
    pub fn ram(&self, index: usize) -> u8 {
        self.get(Cell::new(Store::Ram, index))
    }
    pub fn set_ram(&mut self, index: usize, value: u8) {
        self.set(Cell::new(Store::Ram, index), value);
    }
    pub fn rom(&self) -> &[u8] {
        &self.rom
    }
    pub fn cp500_rom(&self) -> &[u8] {
        &self.cp500_rom
    }
    pub fn video(&self) -> &[u8] {
        &self.video
    }

    /// Writes a ROM byte. The CP-500 copy is the one the A11 flip-flop
    /// switches from, so it gets the byte too.
    pub fn rom_program(&mut self, addr: usize, value: u8) {
        if let Some(b) = self.rom.get_mut(addr) {
            *b = value;
        }
        if let Some(b) = self.cp500_rom.get_mut(addr) {
            *b = value;
        }
    }
    pub fn load_rom(&mut self, data: &[u8]) {
        self.rom.fill(0);
        self.cp500_rom.fill(0);
        for (addr, &b) in data.iter().take(CP500_ROM_SIZE).enumerate() {
            self.rom_program(addr, b);
        }
        self.rom_size = data.len().min(MAX_ROM_SIZE);
    }
    /// Shows one of the two 14K halves of the CP-500 EPROM in the ROM store.
    pub fn cp500_switch_rom(&mut self, a11: bool) {
        let start = if a11 { 0x800 } else { 0 };
        let end = (start + MAX_ROM_SIZE).min(CP500_ROM_SIZE);
        let n = end - start;
        self.rom[..n].copy_from_slice(&self.cp500_rom[start..end]);
    }

    pub fn clear_ram(&mut self) {
        self.ram.fill(0);
        self.supermem.fill(0);
    }
    pub fn clear_video(&mut self) {
        self.video.fill(0);
    }

    pub fn save(&self, mut w: impl Write) -> io::Result<()> {
        w.write_all(&self.ram)?;
        w.write_all(&self.supermem)?;
        w.write_all(&self.rom)?;
        w.write_all(&self.cp500_rom)?;
        w.write_all(&self.video)?;
        Ok(())
    }
    pub fn load(&mut self, mut r: impl Read) -> io::Result<()> {
        r.read_exact(&mut self.ram)?;
        r.read_exact(&mut self.supermem)?;
        r.read_exact(&mut self.rom)?;
        r.read_exact(&mut self.cp500_rom)?;
        r.read_exact(&mut self.video)?;
        Ok(())
    }
}

impl Default for Memory {
    fn default() -> Self {
        Memory::new()
    }
}
