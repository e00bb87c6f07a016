//Prologica CP-500, a Model III clone. The M80 revision adds a CP/M memory
//map and an 80x24 screen.
//
//Modes are switched by *reading* port 0xF4: the hardware looks at the whole
//address bus, so the value of A during the IN picks the mode.

use crate::banks::{Banks, Cp500Variant, ExpansionCard};
use crate::config::Model;
use crate::memory::Memory;
use crate::peripherals::Peripherals;
use crate::quirks::CloneId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cp500Mode {
    /// Stock Model III map
    Standard,
    /// 0x3000-0x37FF shows the monitor in the extra 2K of the EPROM
    ExtraRom,
    /// 64K of RAM
    Flat,
    /// 64K of RAM, 80x24 video; `first_row` is the first screen row seen
    /// through the 1K window, `page` the window offset in video memory
    Video80 { first_row: u8, page: i32 },
}

impl Cp500Mode {
    /// Mode for the A register value. Only the values SO-08 and the ROM use
    /// are known.
    pub fn from_a(a: u8) -> Option<Cp500Mode> {
        let mode = match a {
            0x00 => Cp500Mode::Standard,
            0x20 => Cp500Mode::ExtraRom,
            0x1c | 0x1d => Cp500Mode::Flat,
            0x05 | 0x45 | 0x85 => Cp500Mode::Video80 { first_row: a >> 3, page: (a >> 6) as i32 * 1024 },
            _ => return None,
        };
        Some(mode)
    }
    fn submap(self) -> u8 {
        match self {
            Cp500Mode::Standard => 0,
            Cp500Mode::ExtraRom => 1,
            Cp500Mode::Flat => 2,
            Cp500Mode::Video80 { .. } => 3,
        }
    }
}

pub fn clone_id(variant: Cp500Variant) -> CloneId {
    match variant {
        Cp500Variant::M80 => CloneId::Cp500M80,
        _ => CloneId::Cp500,
    }
}

/// The M80 video has three banks of 8 rows by 128 columns, of which only the
/// first 80 columns are displayed. Returns the cell in the linear 80-column
/// layout used by the screen.
pub fn reproject(window: u16, first_row: u8) -> Option<usize> {
    let col = (window % 128) as usize;
    if col < 80 {
        let row = (window / 128) as usize + first_row as usize;
        Some(row * 80 + col)
    } else {
        None
    }
}

/// Read of ports 0xF4-0xF7 with `a` on the high half of the address bus.
/// Toggles the A11 flip-flop and switches mode; returns the quirks that now
/// apply.
pub fn port_read(a: u8, banks: &mut Banks, memory: &mut Memory, dev: &mut impl Peripherals) -> CloneId {
    let (mut variant, a11, mut first_row) = match banks.card {
        ExpansionCard::Cp500 { variant, a11, first_row } => (variant, a11, first_row),
        _ => (Cp500Variant::Unknown, false, 0),
    };
    //every read flips A11, showing the other 14K of the 16K EPROM
    let a11 = !a11;
    memory.cp500_switch_rom(a11);

    let Some(mode) = Cp500Mode::from_a(a) else {
        log::error!("CP-500: IN from port 0xF4 with A={:02x} is not a known mode", a);
        panic!("CP-500: unimplemented mode {:02x}", a);
    };
    banks.select_map(Model::Three, mode.submap());
    match mode {
        Cp500Mode::Standard | Cp500Mode::ExtraRom => {
            if variant == Cp500Variant::Unknown {
                variant = Cp500Variant::Original;
            }
        }
        Cp500Mode::Flat => variant = Cp500Variant::M80,
        Cp500Mode::Video80 { first_row: row, page } => {
            dev.screen_80x24(true);
            variant = Cp500Variant::M80;
            first_row = row;
            banks.set_video_offset(page);
        }
    }
    log::debug!("CP-500: mode A={:02x}, {:?}", a, variant);
    banks.card = ExpansionCard::Cp500 { variant, a11, first_row };
    clone_id(variant)
}
