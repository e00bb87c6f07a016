//Address decoder: logical address + current configuration -> what answers.
//Everything here is a pure function; the machine performs the access.

use crate::banks::{
    Banks, Cp500Map, ExpansionCard, MemoryMap, Model1Map, Model4Map,
    GENIE_IO, GENIE_ROM, GENIE_VIDEO0, GENIE_VIDEO1, VIDEO_START,
};
use crate::config::Model;
use crate::memory::{Access, Cell, Store};

pub const RAM_START: u16 = 0x4000;
pub const KEYBOARD_START: u16 = 0x3800;
pub const PRINTER_ADDRESS: u16 = 0x37e8;

/// Model I memory mapped registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MmioReg {
    /// 0x37E0-0x37E3: interrupt latch on read, drive select on write
    LatchSelect,
    /// 0x37EC: status on read, command on write
    DiskStatusCommand,
    DiskTrack,
    DiskSector,
    DiskData,
    Printer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Plain storage
    Cell(Cell),
    /// Character video, `gate` emulates the missing bit 6 of an unmodified Model I
    Screen { index: usize, gate: bool },
    /// Model III video, seen through the graphics card first
    Model3Video(usize),
    /// CP-500 80x24 window: store index and offset inside the 1K window
    Cp500Video { index: usize, window: u16 },
    Register(MmioReg),
    Keyboard(u16),
    Hrg(u16),
    Fixed(u8),
    /// Nothing connected: reads 0xFF, writes vanish
    Floating,
}

impl Target {
    /// The backing byte, if the address resolves to storage.
    pub fn cell(self) -> Option<Cell> {
        match self {
            Target::Cell(c) => Some(c),
            Target::Screen { index, .. } | Target::Model3Video(index) | Target::Cp500Video { index, .. } => {
                Some(Cell::new(Store::Video, index))
            }
            _ => None,
        }
    }
}

/// The parts of the configuration the decoder needs besides the banks.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub model: Model,
    pub rom_size: usize,
    pub lowercase: bool,
}

fn ram(index: usize) -> Target {
    Target::Cell(Cell::new(Store::Ram, index))
}

fn offset(addr: u16, off: i32) -> usize {
    (addr as i32).wrapping_add(off) as u32 as usize
}

fn banked(addr: u16, banks: &Banks) -> Target {
    ram(offset(addr, banks.bank_offset[(addr >> 15) as usize]))
}

fn screen(addr: u16, banks: &Banks) -> Target {
    Target::Screen { index: offset(addr, banks.video_offset), gate: false }
}

pub fn resolve(addr: u16, access: Access, banks: &Banks, layout: &Layout) -> Target {
    if let Some(t) = overlay(addr, access, banks, layout) {
        return t;
    }
    let read = access == Access::Read;
    match banks.map {
        MemoryMap::Model1(map) => model1(map, addr, access, banks, layout),
        MemoryMap::Model3 => model3(addr, access, banks, layout),
        MemoryMap::Cp500(map) => match map {
            Cp500Map::ExtraRom => {
                if read && (0x3000..=0x3fff).contains(&addr) {
                    Target::Cell(Cell::new(Store::Cp500Rom, (addr | 0x0800) as usize))
                } else {
                    model3(addr, access, banks, layout)
                }
            }
            Cp500Map::Flat => ram(addr as usize),
            Cp500Map::Video80 => {
                if addr >= RAM_START {
                    ram(addr as usize)
                } else if addr >= VIDEO_START {
                    Target::Cp500Video { index: offset(addr, banks.video_offset), window: addr - VIDEO_START }
                } else if read && addr >= KEYBOARD_START {
                    Target::Keyboard(addr)
                } else {
                    Target::Floating
                }
            }
        },
        MemoryMap::Model4(map) => model4(map, false, false, addr, access, banks, layout),
        MemoryMap::Model4P { map, rom_in } => model4(map, true, rom_in, addr, access, banks, layout),
    }
}

//Cards that sit between the Z80 and the system get the first look
fn overlay(addr: u16, access: Access, banks: &Banks, layout: &Layout) -> Option<Target> {
    let read = access == Access::Read;
    match banks.card {
        ExpansionCard::Genie { mask, .. } => {
            let on = |bit: u8| mask & bit == 0;
            let t = if on(GENIE_ROM) && read && (addr as usize) < layout.rom_size {
                Target::Cell(Cell::new(Store::Rom, addr as usize))
            } else if on(GENIE_VIDEO0) && (0x3c00..=0x3fff).contains(&addr) {
                Target::Screen { index: (addr - VIDEO_START) as usize, gate: false }
            } else if on(GENIE_VIDEO1) && (0x4000..=0x43ff).contains(&addr) {
                Target::Screen { index: (addr - VIDEO_START) as usize, gate: false }
            } else if on(GENIE_IO) && (0x37e0..=0x37ef).contains(&addr) {
                model1_mmio(addr, access, banks, layout)
            } else if on(GENIE_IO) && read && (KEYBOARD_START..=0x38c0).contains(&addr) {
                Target::Keyboard(addr)
            } else if on(GENIE_IO) && read && (0x38c1..=0x38ff).contains(&addr) {
                Target::Fixed(0x00)
            } else {
                ram(addr as usize)
            };
            Some(t)
        }
        ExpansionCard::SuperMem { base, hi } => {
            let window = if hi { 0x8000 } else { 0 };
            if (addr ^ window) & 0x8000 == 0 {
                Some(Target::Cell(Cell::new(Store::SuperMem, base as usize + (addr & 0x7fff) as usize)))
            } else {
                None
            }
        }
        _ => None,
    }
}

fn model1_ram(addr: u16, access: Access, banks: &Banks) -> Target {
    let reg = banks.selector_reg();
    let mut index = addr as usize;
    if reg & 7 == 6 && addr >= 0xc000 {
        //no low 16K of RAM to show up there
        if access == Access::Write && reg & 8 == 0 {
            return Target::Floating;
        }
        index &= 0x3fff;
    }
    //odd modes bank the low half
    let bank = if reg & 1 != 0 { 0 } else { 0x8000 };
    if addr & 0x8000 == bank {
        index += banks.bank_base as usize;
    }
    ram(index)
}

fn model1_mmio(addr: u16, access: Access, banks: &Banks, layout: &Layout) -> Target {
    let read = access == Access::Read;
    let selector = matches!(banks.card, ExpansionCard::Selector { .. });
    match addr {
        a if a >= VIDEO_START => Target::Screen {
            index: offset(a, banks.video_offset),
            gate: !read && layout.model == Model::One && !layout.lowercase,
        },
        a if read && (a as usize) < layout.rom_size => Target::Cell(Cell::new(Store::Rom, a as usize)),
        0x37e0..=0x37e3 => Target::Register(MmioReg::LatchSelect),
        0x37e8 => Target::Register(MmioReg::Printer),
        0x37ec => Target::Register(MmioReg::DiskStatusCommand),
        0x37ed => Target::Register(MmioReg::DiskTrack),
        0x37ee => Target::Register(MmioReg::DiskSector),
        0x37ef => Target::Register(MmioReg::DiskData),
        //with a selector 768 bytes poke through the hole
        a if a >= 0x3900 && selector => model1_ram(a, access, banks),
        a if read && a >= KEYBOARD_START => Target::Keyboard(a),
        _ => Target::Floating,
    }
}

fn model1(map: Model1Map, addr: u16, access: Access, banks: &Banks, layout: &Layout) -> Target {
    use Model1Map::*;
    match map {
        Stock | LowRamHigh => {
            if addr < RAM_START {
                model1_mmio(addr, access, banks, layout)
            } else {
                model1_ram(addr, access, banks)
            }
        }
        IoHigh => {
            if (0xf7e0..=0xf7ff).contains(&addr) {
                model1_mmio(addr & 0x3fff, access, banks, layout)
            } else {
                model1_ram(addr, access, banks)
            }
        }
        RomDisabled => {
            if (0x37e0..RAM_START).contains(&addr) {
                model1_mmio(addr, access, banks, layout)
            } else {
                model1_ram(addr, access, banks)
            }
        }
        Cpm => {
            if addr >= 0xf7e0 {
                model1_mmio(addr & 0x3fff, access, banks, layout)
            } else {
                model1_ram(addr, access, banks)
            }
        }
        RamHigh | RamLow => model1_ram(addr, access, banks),
        NotUseful => Target::Floating,
        Hrg => {
            if addr < RAM_START {
                Target::Hrg(addr)
            } else {
                model1_ram(addr, access, banks)
            }
        }
    }
}

fn model3(addr: u16, access: Access, banks: &Banks, layout: &Layout) -> Target {
    match access {
        Access::Read => {
            if addr >= RAM_START {
                ram(addr as usize)
            } else if addr == PRINTER_ADDRESS {
                Target::Register(MmioReg::Printer)
            } else if (addr as usize) < layout.rom_size {
                Target::Cell(Cell::new(Store::Rom, addr as usize))
            } else if addr >= VIDEO_START {
                Target::Model3Video((addr - VIDEO_START) as usize)
            } else if addr >= KEYBOARD_START {
                Target::Keyboard(addr)
            } else {
                Target::Floating
            }
        }
        Access::Write => {
            if addr >= RAM_START {
                ram(addr as usize)
            } else if addr >= VIDEO_START {
                Target::Model3Video(offset(addr, banks.video_offset))
            } else if addr == PRINTER_ADDRESS {
                Target::Register(MmioReg::Printer)
            } else {
                Target::Floating
            }
        }
    }
}

//`p4` tells the 4P maps, where the boot ROM can leave map 0, from the Model 4 ones
fn model4(map: Model4Map, p4: bool, rom_in: bool, addr: u16, access: Access, banks: &Banks, layout: &Layout) -> Target {
    let read = access == Access::Read;
    let rom = (addr as usize) < layout.rom_size;
    match map {
        Model4Map::Map0 if !read => {
            if addr >= RAM_START {
                banked(addr, banks)
            } else if addr >= VIDEO_START {
                screen(addr, banks)
            } else if addr == PRINTER_ADDRESS {
                Target::Register(MmioReg::Printer)
            } else {
                Target::Floating
            }
        }
        //only the plain Model 4 has its ROM fixed in map 0
        Model4Map::Map0 if !p4 => {
            if addr >= RAM_START {
                banked(addr, banks)
            } else if addr == PRINTER_ADDRESS {
                Target::Register(MmioReg::Printer)
            } else if rom {
                Target::Cell(Cell::new(Store::Rom, addr as usize))
            } else if addr >= VIDEO_START {
                screen(addr, banks)
            } else if addr >= KEYBOARD_START {
                Target::Keyboard(addr)
            } else {
                Target::Floating
            }
        }
        Model4Map::Map0 | Model4Map::Map1 => {
            if read && rom_in && rom {
                Target::Cell(Cell::new(Store::Rom, addr as usize))
            } else if addr >= RAM_START || addr < KEYBOARD_START {
                banked(addr, banks)
            } else if addr >= VIDEO_START {
                screen(addr, banks)
            } else if read {
                Target::Keyboard(addr)
            } else {
                Target::Floating
            }
        }
        Model4Map::Map2 => {
            if addr < 0xf400 {
                banked(addr, banks)
            } else if addr >= 0xf800 {
                Target::Screen { index: (addr - 0xf800) as usize, gate: false }
            } else if read {
                Target::Keyboard(addr)
            } else {
                Target::Floating
            }
        }
        Model4Map::Map3 => banked(addr, banks),
    }
}
