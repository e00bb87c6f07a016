//Bank and expansion registers: everything that changes how an address is decoded.

use crate::config::{ExpansionKind, Model, Speedup};

/// Model I sub-maps. Selector modes 0-7 map one to one, the system byte kits
/// add the all-RAM and HRG layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Model1Map {
    Stock,
    /// Selector mode 1: all RAM, I/O at 0xF7E0-0xF7FF
    IoHigh,
    /// Selector mode 2: ROM disabled
    RomDisabled,
    /// Selector mode 3: CP/M, I/O from 0xF7E0 up
    Cpm,
    /// Selector mode 4 or system byte: all RAM, banking the high half
    RamHigh,
    /// Selector mode 5: all RAM, banking the low half
    RamLow,
    /// Selector mode 6: low 16K of RAM duplicated at 0xC000
    LowRamHigh,
    /// Selector mode 7, documented as "not useful"
    NotUseful,
    /// LNW80 / SpeedMaster hi-res graphics in the low 16K
    Hrg,
}

impl Model1Map {
    fn from_selector(mode: u8) -> Model1Map {
        use Model1Map::*;
        match mode & 7 {
            0 => Stock,
            1 => IoHigh,
            2 => RomDisabled,
            3 => Cpm,
            4 => RamHigh,
            5 => RamLow,
            6 => LowRamHigh,
            _ => NotUseful,
        }
    }
}

/// CP-500 layouts beyond the stock Model III one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cp500Map {
    /// 0x3000-0x37FF shows the extra 2K of the system EPROM
    ExtraRom,
    /// Flat 64K of RAM (CP/M)
    Flat,
    /// 64K of RAM plus a 1K window on the 80x24 video memory
    Video80,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Model4Map {
    Map0,
    Map1,
    Map2,
    Map3,
}

impl Model4Map {
    pub fn from_bits(bits: u8) -> Model4Map {
        match bits & 3 {
            0 => Model4Map::Map0,
            1 => Model4Map::Map1,
            2 => Model4Map::Map2,
            _ => Model4Map::Map3,
        }
    }
    pub fn bits(self) -> u8 {
        self as u8
    }
}

/// The active decode rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryMap {
    Model1(Model1Map),
    Model3,
    Cp500(Cp500Map),
    Model4(Model4Map),
    Model4P { map: Model4Map, rom_in: bool },
}

impl MemoryMap {
    pub fn power_on(model: Model, rom_visible: bool) -> MemoryMap {
        MemoryMap::new(model, 0, rom_visible)
    }
    /// Map for `model` with sub-map `which`. On a Model III the sub-maps 1-3
    /// only exist in the CP-500.
    pub fn new(model: Model, which: u8, rom_visible: bool) -> MemoryMap {
        match model {
            Model::One => MemoryMap::Model1(Model1Map::from_selector(which)),
            Model::Three => match which & 3 {
                0 => MemoryMap::Model3,
                1 => MemoryMap::Cp500(Cp500Map::ExtraRom),
                2 => MemoryMap::Cp500(Cp500Map::Flat),
                _ => MemoryMap::Cp500(Cp500Map::Video80),
            },
            Model::Four => MemoryMap::Model4(Model4Map::from_bits(which)),
            Model::FourP => MemoryMap::Model4P { map: Model4Map::from_bits(which), rom_in: rom_visible },
        }
    }
    /// The machine family this map belongs to.
    pub fn model(self) -> Model {
        match self {
            MemoryMap::Model1(_) => Model::One,
            MemoryMap::Model3 | MemoryMap::Cp500(_) => Model::Three,
            MemoryMap::Model4(_) => Model::Four,
            MemoryMap::Model4P { .. } => Model::FourP,
        }
    }
    /// Numeric code, as stored in save files: model in the high nibble,
    /// sub-map in the low bits, 4P ROM-in in bit 2.
    pub fn code(self) -> u8 {
        use Model1Map::*;
        match self {
            MemoryMap::Model1(m) => match m {
                Stock => 0x10,
                IoHigh => 0x11,
                RomDisabled => 0x12,
                Cpm => 0x13,
                RamHigh => 0x14,
                RamLow => 0x15,
                LowRamHigh => 0x16,
                NotUseful => 0x17,
                Hrg => 0x20,
            },
            MemoryMap::Model3 => 0x30,
            MemoryMap::Cp500(Cp500Map::ExtraRom) => 0x31,
            MemoryMap::Cp500(Cp500Map::Flat) => 0x32,
            MemoryMap::Cp500(Cp500Map::Video80) => 0x33,
            MemoryMap::Model4(m) => 0x40 | m.bits(),
            MemoryMap::Model4P { map, rom_in } => 0x50 | if rom_in { 4 } else { 0 } | map.bits(),
        }
    }
    pub fn from_code(code: u8) -> Option<MemoryMap> {
        let map = match code {
            0x10..=0x17 => MemoryMap::Model1(Model1Map::from_selector(code)),
            0x20 => MemoryMap::Model1(Model1Map::Hrg),
            0x30..=0x33 => MemoryMap::new(Model::Three, code, false),
            0x40..=0x43 => MemoryMap::Model4(Model4Map::from_bits(code)),
            0x50..=0x57 => MemoryMap::Model4P { map: Model4Map::from_bits(code), rom_in: code & 4 != 0 },
            _ => return None,
        };
        Some(map)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenieKind {
    Eg3200,
    Genie3s,
}

/// Which CP-500 hardware revision the running software has revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cp500Variant {
    Unknown,
    Original,
    M80,
}

/// State of the one expansion that is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionCard {
    None,
    Selector { reg: u8 },
    /// A20-A16 of the alternate 64K bank
    Huffman { bank: u8 },
    /// Bits 4-1 of the sound port
    HyperMem { bank: u8 },
    /// `base` is the physical offset of the 32K window, `hi` is true when the
    /// window replaces the upper half of the address space
    SuperMem { base: u32, hi: bool },
    /// EG 3200 / Genie IIIs bank register, inverted logic: a 0 bit switches
    /// the bank in
    Genie { kind: GenieKind, mask: u8 },
    Cp500 { variant: Cp500Variant, a11: bool, first_row: u8 },
}

pub const GENIE_ROM: u8 = 1 << 0;
pub const GENIE_VIDEO0: u8 = 1 << 1;
pub const GENIE_VIDEO1: u8 = 1 << 2;
pub const GENIE_IO: u8 = 1 << 3;

impl ExpansionCard {
    /// Power-on state of a card, before any port has been written.
    pub fn installed(kind: ExpansionKind) -> ExpansionCard {
        match kind {
            ExpansionKind::None => ExpansionCard::None,
            ExpansionKind::Selector => ExpansionCard::Selector { reg: 0 },
            ExpansionKind::Huffman => ExpansionCard::Huffman { bank: 1 },
            ExpansionKind::HyperMem => ExpansionCard::HyperMem { bank: 0 },
            ExpansionKind::SuperMem => ExpansionCard::SuperMem { base: 0, hi: true },
        }
    }
    /// Bit set to 0 means the bank is switched in.
    pub fn genie_bank_enabled(&self, bit: u8) -> Option<bool> {
        match self {
            ExpansionCard::Genie { mask, .. } => Some(mask & bit == 0),
            _ => None,
        }
    }
    /// Fixed-width encoding for save files: tag, two bytes and a word.
    pub fn encode(&self) -> (u8, u8, u8, u32) {
        match *self {
            ExpansionCard::None => (0, 0, 0, 0),
            ExpansionCard::Selector { reg } => (1, reg, 0, 0),
            ExpansionCard::Huffman { bank } => (2, bank, 0, 0),
            ExpansionCard::HyperMem { bank } => (3, bank, 0, 0),
            ExpansionCard::SuperMem { base, hi } => (4, hi as u8, 0, base),
            ExpansionCard::Genie { kind, mask } => (5, kind as u8, mask, 0),
            ExpansionCard::Cp500 { variant, a11, first_row } => (6, variant as u8, a11 as u8, first_row as u32),
        }
    }
    pub fn decode(tag: u8, a: u8, b: u8, c: u32) -> Option<ExpansionCard> {
        let card = match tag {
            0 => ExpansionCard::None,
            1 => ExpansionCard::Selector { reg: a },
            2 => ExpansionCard::Huffman { bank: a & 0x1f },
            3 => ExpansionCard::HyperMem { bank: a & 0x1e },
            4 => ExpansionCard::SuperMem { base: c, hi: a != 0 },
            5 => {
                let kind = match a {
                    0 => GenieKind::Eg3200,
                    1 => GenieKind::Genie3s,
                    _ => return None,
                };
                ExpansionCard::Genie { kind, mask: b }
            }
            6 => {
                let variant = match a {
                    0 => Cp500Variant::Unknown,
                    1 => Cp500Variant::Original,
                    2 => Cp500Variant::M80,
                    _ => return None,
                };
                ExpansionCard::Cp500 { variant, a11: b != 0, first_row: c as u8 }
            }
            _ => return None,
        };
        Some(card)
    }
}

pub const VIDEO_START: u16 = 0x3c00;
pub const VIDEO_PAGE_0: i32 = 0;
pub const VIDEO_PAGE_1: i32 = 1024;

pub struct Banks {
    pub map: MemoryMap,
    /// Physical RAM offsets added to the lower and upper 32K (Model 4/4P)
    pub bank_offset: [i32; 2],
    /// Offset of the alternate bank selected by the active card
    pub bank_base: u32,
    /// Added to a video address to reach the video store
    pub video_offset: i32,
    pub rom_visible: bool,
    /// Last Model 4 bank command, replayed when `bank_base` moves
    pub bank_command: u8,
    pub card: ExpansionCard,
    /// Model I system byte (speed-up / banking kits, Genie IIIs)
    pub system_byte: u8,
}

impl Banks {
    pub fn new(model: Model, card: ExpansionCard) -> Banks {
        let rom_visible = model == Model::FourP;
        let mut banks = Banks {
            map: MemoryMap::power_on(model, rom_visible),
            bank_offset: [0; 2],
            bank_base: model.default_bank_base(),
            video_offset: -(VIDEO_START as i32) + VIDEO_PAGE_0,
            rom_visible,
            bank_command: 0,
            card: ExpansionCard::None,
            system_byte: 0,
        };
        banks.enable(card);
        banks
    }

    /// Makes `card` the active expansion. Whatever was active before is gone,
    /// so Huffman/HyperMem and Selector/SuperMem can never coexist.
    pub fn enable(&mut self, card: ExpansionCard) {
        if self.card != card {
            log::debug!("expansion {:?} -> {:?}", self.card, card);
            //nothing of the old card survives it
            if matches!(self.card, ExpansionCard::Selector { .. }) {
                if let MemoryMap::Model1(_) = self.map {
                    self.map = MemoryMap::Model1(Model1Map::Stock);
                }
            }
            self.bank_base = self.map.model().default_bank_base();
            self.bank_command(self.bank_command);
        }
        self.card = card;
        match card {
            ExpansionCard::Selector { reg } => self.selector_out(reg),
            ExpansionCard::Huffman { bank } => self.write_bank_base(bank),
            ExpansionCard::HyperMem { bank } => self.write_bank_base(bank),
            _ => {}
        }
    }

    pub fn selector_reg(&self) -> u8 {
        match self.card {
            ExpansionCard::Selector { reg } => reg,
            _ => 0,
        }
    }

    pub fn set_video_page(&mut self, page1: bool) {
        self.video_offset = -(VIDEO_START as i32) + if page1 { VIDEO_PAGE_1 } else { VIDEO_PAGE_0 };
    }
    //CP-500 80x24 mode uses 1K pages anywhere in its 3K of video memory
    pub fn set_video_offset(&mut self, offset: i32) {
        self.video_offset = -(VIDEO_START as i32) + offset;
    }

    pub fn select_map(&mut self, model: Model, which: u8) {
        let map = MemoryMap::new(model, which, self.rom_visible);
        if map != self.map {
            log::debug!("memory map {:02x} -> {:02x}", self.map.code(), map.code());
        }
        self.map = map;
    }

    pub fn set_rom_visible(&mut self, rom_in: bool) {
        self.rom_visible = rom_in;
        if let MemoryMap::Model4P { map, .. } = self.map {
            self.map = MemoryMap::Model4P { map, rom_in };
        }
    }

    /// Model 4 bank command: which 32K of physical RAM each half of the
    /// address space sees.
    pub fn bank_command(&mut self, command: u8) {
        let base = self.bank_base as i32;
        let offsets = match command {
            //L64 lower / upper
            0 => Some([0, 0]),
            //L64 lower / H64 lower
            2 => Some([0, base - (1 << 15)]),
            //L64 lower / H64 upper
            3 => Some([0, base]),
            //H64 lower / L64 upper
            6 => Some([base, 0]),
            //H64 upper / L64 upper
            7 => Some([(1 << 15) + base, 0]),
            _ => None,
        };
        match offsets {
            Some(o) => self.bank_offset = o,
            None => log::warn!("unknown bank command {}", command),
        }
        self.bank_command = command;
    }

    /// Write to the bank register of the active card.
    pub fn write_bank_base(&mut self, bits: u8) {
        match &mut self.card {
            ExpansionCard::Huffman { bank } => {
                *bank = bits & 0x1f;
                self.bank_base = (*bank as u32) << 16;
                self.bank_command(self.bank_command);
            }
            ExpansionCard::HyperMem { bank } => {
                //bank 0 is the upper 64K
                *bank = bits & 0x1e;
                self.bank_base = (*bank as u32 + 2) << 15;
                self.bank_command(self.bank_command);
            }
            ExpansionCard::SuperMem { base, hi } => {
                //bit 5 set flips the low 32K instead of the high one
                *hi = bits & 0x20 == 0;
                *base = ((bits & 0x0f) as u32) << 15;
            }
            _ => {}
        }
    }

    pub fn read_bank_base(&self) -> u8 {
        match self.card {
            ExpansionCard::Huffman { bank } => bank & 0x1f,
            ExpansionCard::SuperMem { base, hi } => (base >> 15) as u8 | if hi { 0 } else { 0x20 },
            //HyperMem is write only
            _ => 0xff,
        }
    }

    /// Model I memory selector.
    /// Bits 2-0 mode, bit 3 external RAM, bits 5-4 external bank.
    pub fn selector_out(&mut self, value: u8) {
        if let ExpansionCard::Selector { reg } = &mut self.card {
            *reg = value;
        }
        self.map = MemoryMap::Model1(Model1Map::from_selector(value));
        self.bank_base = if value & 0x08 != 0 {
            //the low 64K is the base memory
            let mut base = 0x8000 + (((value & 0x30) as u32) << 11);
            if value & 1 != 0 {
                base += 0x8000;
            }
            base
        } else {
            0
        };
    }

    /// Model I system byte on port 0xFE. Returns the new HRG state when the
    /// kit drives it.
    pub fn system_byte_out(&mut self, value: u8, speedup: Speedup) -> Option<bool> {
        let mut map = Model1Map::Stock;
        let mut hrg = None;
        if speedup > Speedup::Banking {
            //TCS SpeedMaster CP/M banking
            if speedup == Speedup::SpeedMaster && value & 1 != 0 {
                map = Model1Map::RamHigh;
            }
            //HRG only in the TRS-80 memory map
            if map == Model1Map::Stock {
                if value & (1 << 3) != 0 {
                    map = Model1Map::Hrg;
                }
                hrg = Some(value & (1 << 1) != 0);
            }
        } else if matches!(value, 0x10 | 0x11 | 0x54) {
            map = Model1Map::RamHigh;
        }
        self.map = MemoryMap::Model1(map);
        self.system_byte = value;
        hrg
    }
}
