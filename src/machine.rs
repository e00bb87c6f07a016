use std::io::{self, Read, Write};

use anyhow::anyhow;

use crate::banks::{Banks, Cp500Variant, ExpansionCard, MemoryMap};
use crate::bus::Bus;
use crate::config::{CloneModel, ExpansionKind, MachineConfig, Model};
use crate::cp500;
use crate::crtc::Crtc;
use crate::decode::{self, Layout, MmioReg, Target};
use crate::io::IoLatches;
use crate::memory::{Access, Cell, MAX_VIDEO_SIZE, Memory, Store};
use crate::peripherals::{DiskReg, GrafyxReg, Peripherals};
use crate::quirks::{self, CloneId, CloneQuirks};
use crate::rom;
use crate::state::{self, ReadExt, WriteExt};

/// A complete TRS-80 minus the CPU: memory, banking hardware and port
/// decoding, with the devices in `P`.
pub struct Machine<P> {
    pub(crate) config: MachineConfig,
    pub(crate) memory: Memory,
    pub(crate) banks: Banks,
    pub(crate) io: IoLatches,
    pub(crate) crtc: Crtc,
    pub(crate) clone_id: CloneId,
    pub(crate) quirks: &'static CloneQuirks,
    pub dev: P,
}

//Model I video without the lowercase modification: the gate in Z30 makes up
//the missing bit 6
fn lowercase_gate(value: u8) -> u8 {
    if value & 0xa0 != 0 { value & 0xbf } else { value | 0x40 }
}

impl<P: Peripherals> Machine<P> {
    pub fn new(config: MachineConfig, dev: P) -> Machine<P> {
        let config = config.sanitized();
        let banks = Banks::new(config.model, ExpansionCard::None);
        let mut machine = Machine {
            config,
            memory: Memory::new(),
            banks,
            io: IoLatches::default(),
            crtc: Crtc::new(),
            clone_id: CloneId::None,
            quirks: quirks::lookup(CloneId::None),
            dev,
        };
        machine.reset(true);
        machine
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }
    pub fn banks(&self) -> &Banks {
        &self.banks
    }
    pub fn memory(&self) -> &Memory {
        &self.memory
    }
    pub fn io_latches(&self) -> &IoLatches {
        &self.io
    }
    pub fn crtc(&self) -> &Crtc {
        &self.crtc
    }
    pub fn clone_id(&self) -> CloneId {
        self.clone_id
    }
    pub fn quirks(&self) -> &'static CloneQuirks {
        self.quirks
    }

    fn layout(&self) -> Layout {
        Layout {
            model: self.config.model,
            rom_size: self.memory.rom_size,
            lowercase: self.config.lowercase,
        }
    }

    /// Reset button (`poweron == false`) or power cycle.
    pub fn reset(&mut self, poweron: bool) {
        let model = self.config.model;
        log::info!("{} reset, model {}", if poweron { "power-on" } else { "soft" }, model.number());

        self.banks = Banks::new(model, ExpansionCard::installed(self.config.expansion));
        let id = CloneId::from(self.config.clone);
        if self.config.clone == Some(CloneModel::Cp500) {
            self.banks.enable(ExpansionCard::Cp500 { variant: Cp500Variant::Unknown, a11: false, first_row: 0 });
            self.memory.cp500_switch_rom(false);
        }
        self.set_clone_id(id);

        if poweron {
            self.io = IoLatches::default();
            self.crtc = Crtc::new();
        }
        if model == Model::FourP {
            self.io.rominimage = 1;
        }
        if model.is_model4() {
            self.io.ctrlimage = 0;
            self.dev.screen_inverse(false);
            self.dev.screen_80x24(false);
        }
        if model != Model::One {
            self.dev.grafyx_write(GrafyxReg::Mode, 0);
            self.dev.interrupt_mask_write(0);
            self.dev.nmi_mask_write(0);
        }
        if model == Model::Three {
            self.dev.grafyx_m3_reset();
        }
        if model == Model::One {
            self.dev.hrg_onoff(false);
        }
        self.dev.timer_interrupt(false);

        if poweron || model.is_model4() {
            self.memory.clear_ram();
            self.memory.clear_video();
            if model.is_model4() {
                self.memory.video_size = MAX_VIDEO_SIZE;
            } else {
                self.memory.video_size = 1024;
                //random seed buffer
                for i in 0x4090..=0x4092 {
                    self.memory.set_ram(i, 0x7f);
                }
            }
            self.dev.timer_init();
        } else {
            self.dev.timer_speed(0);
            self.dev.reset_button_interrupt(true);
        }
        self.dev.screen_init();
    }

    /// Replaces the configuration and powers the machine on again.
    pub fn set_config(&mut self, config: MachineConfig) {
        let config = config.sanitized();
        log::info!("configuration {:?}", config);
        self.config = config;
        self.reset(true);
    }

    /// Plugs a memory card in, unplugging whatever card was there.
    pub fn set_expansion(&mut self, kind: ExpansionKind) {
        self.config = MachineConfig { expansion: kind, ..self.config.clone() }.sanitized();
        if self.config.clone.is_some_and(CloneModel::has_banking) {
            return;
        }
        self.banks.enable(ExpansionCard::installed(self.config.expansion));
    }

    pub fn load_rom(&mut self, data: &[u8]) -> anyhow::Result<()> {
        let image = rom::rom_image(data)?;
        self.memory.load_rom(&image);
        log::info!("ROM loaded, {} bytes", image.len());
        Ok(())
    }
    /// ROM patching, the only way into the ROM stores.
    pub fn rom_program(&mut self, addr: usize, value: u8) {
        self.memory.rom_program(addr, value);
    }

    pub fn read(&mut self, addr: u16) -> u8 {
        match decode::resolve(addr, Access::Read, &self.banks, &self.layout()) {
            Target::Cell(c) => self.memory.get(c),
            Target::Screen { index, .. } | Target::Cp500Video { index, .. } => {
                self.memory.get(Cell::new(Store::Video, index))
            }
            Target::Model3Video(index) => match self.dev.grafyx_m3_read(index) {
                Some(v) => v,
                None => self.memory.get(Cell::new(Store::Video, index)),
            },
            Target::Register(r) => match r {
                MmioReg::LatchSelect => self.dev.interrupt_latch_read(),
                MmioReg::DiskStatusCommand => self.dev.disk_read(DiskReg::StatusCommand),
                MmioReg::DiskTrack => self.dev.disk_read(DiskReg::Track),
                MmioReg::DiskSector => self.dev.disk_read(DiskReg::Sector),
                MmioReg::DiskData => self.dev.disk_read(DiskReg::Data),
                MmioReg::Printer => self.dev.printer_read(),
            },
            Target::Keyboard(a) => self.dev.keyboard_read(a),
            Target::Hrg(_) => self.dev.hrg_read_data(),
            Target::Fixed(v) => v,
            Target::Floating => 0xff,
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        match decode::resolve(addr, Access::Write, &self.banks, &self.layout()) {
            Target::Cell(c) => self.memory.set(c, value),
            Target::Screen { index, gate } => {
                let value = if gate { lowercase_gate(value) } else { value };
                self.screen_write(index, value);
            }
            Target::Model3Video(index) => {
                if !self.dev.grafyx_m3_write(index, value) {
                    self.screen_write(index, value);
                }
            }
            Target::Cp500Video { index, window } => {
                let cell = Cell::new(Store::Video, index);
                if self.memory.get(cell) != value {
                    self.memory.set(cell, value);
                    let first_row = match self.banks.card {
                        ExpansionCard::Cp500 { first_row, .. } => first_row,
                        _ => 0,
                    };
                    if let Some(pos) = cp500::reproject(window, first_row) {
                        self.dev.screen_write_char(pos, value);
                    }
                }
            }
            Target::Register(r) => match r {
                MmioReg::LatchSelect => self.dev.disk_select_write(value, self.quirks),
                MmioReg::DiskStatusCommand => self.dev.disk_write(DiskReg::StatusCommand, value),
                MmioReg::DiskTrack => self.dev.disk_write(DiskReg::Track, value),
                MmioReg::DiskSector => self.dev.disk_write(DiskReg::Sector, value),
                MmioReg::DiskData => self.dev.disk_write(DiskReg::Data, value),
                MmioReg::Printer => self.dev.printer_write(value),
            },
            Target::Hrg(a) => {
                self.dev.hrg_write_addr(a, 0x3fff);
                self.dev.hrg_write_data(value);
            }
            Target::Keyboard(_) | Target::Fixed(_) | Target::Floating => {}
        }
    }

    fn screen_write(&mut self, index: usize, value: u8) {
        let cell = Cell::new(Store::Video, index & 0x7ff);
        if self.memory.get(cell) != value {
            self.memory.set(cell, value);
            self.dev.screen_write_char(cell.index, value);
        }
    }

    /// The storage byte behind `addr`, if there is one for this kind of
    /// access. Only valid until the next bank or map change.
    pub fn raw_cell(&self, addr: u16, access: Access) -> Option<Cell> {
        decode::resolve(addr, access, &self.banks, &self.layout()).cell()
    }

    /// Reads up to `max` bytes from storage, stopping at a NUL or a carriage
    /// return. Stops early at the first address that is not plain storage.
    pub fn read_string(&self, addr: u16, max: usize) -> Vec<u8> {
        let mut res = Vec::new();
        let mut addr = addr;
        while res.len() < max {
            let Some(cell) = self.raw_cell(addr, Access::Read) else { break };
            let b = self.memory.get(cell);
            if b == 0 || b == b'\r' {
                break;
            }
            res.push(b);
            addr = addr.wrapping_add(1);
        }
        res
    }

    pub fn save_state(&self, mut w: impl Write) -> io::Result<()> {
        let b = &self.banks;
        self.memory.save(&mut w)?;
        w.write_u32(self.memory.rom_size as u32)?;
        w.write_u32(self.memory.video_size as u32)?;
        w.write_u8(b.map.code())?;
        w.write_i32(b.bank_offset[0])?;
        w.write_i32(b.bank_offset[1])?;
        w.write_i32(b.video_offset)?;
        w.write_bool(b.rom_visible)?;
        w.write_u32(b.bank_base)?;
        w.write_u8(b.bank_command)?;
        let (tag, ca, cb, cc) = b.card.encode();
        w.write_u8(tag)?;
        w.write_u8(ca)?;
        w.write_u8(cb)?;
        w.write_u32(cc)?;
        w.write_u8(b.system_byte)?;
        w.write_u8(self.clone_id as u8)?;
        w.write_bool(self.io.modesel)?;
        w.write_u8(self.io.modeimage)?;
        w.write_u8(self.io.ctrlimage)?;
        w.write_u8(self.io.rominimage)?;
        w.write_u8(self.io.rtc_reg)?;
        w.write_u8(self.crtc.cursor_start)?;
        w.write_u16(self.crtc.cursor_pos)?;
        w.write_bool(self.crtc.cursor_visible)?;
        Ok(())
    }

    /// Restores a state written by `save_state`. Nothing is touched unless
    /// the whole state is readable and consistent.
    pub fn load_state(&mut self, mut r: impl Read) -> anyhow::Result<()> {
        let mut memory = Memory::new();
        memory.load(&mut r)?;
        memory.rom_size = r.read_u32()? as usize;
        memory.video_size = r.read_u32()? as usize;
        let code = r.read_u8()?;
        let map = MemoryMap::from_code(code).ok_or_else(|| anyhow!("invalid memory map {:02x}", code))?;
        if map.model() != self.config.model {
            return Err(anyhow!("state is for a {:?} machine, this is a {:?}", map.model(), self.config.model));
        }
        let bank_offset = [r.read_i32()?, r.read_i32()?];
        let video_offset = r.read_i32()?;
        let rom_visible = r.read_bool()?;
        let bank_base = r.read_u32()?;
        let bank_command = r.read_u8()?;
        let (tag, ca, cb) = (r.read_u8()?, r.read_u8()?, r.read_u8()?);
        let cc = r.read_u32()?;
        let card = ExpansionCard::decode(tag, ca, cb, cc).ok_or_else(|| anyhow!("invalid expansion card {}", tag))?;
        let system_byte = r.read_u8()?;
        let id = r.read_u8()?;
        let clone_id = CloneId::from_u8(id).ok_or_else(|| anyhow!("invalid clone {}", id))?;
        let io = IoLatches {
            modesel: r.read_bool()?,
            modeimage: r.read_u8()?,
            ctrlimage: r.read_u8()?,
            rominimage: r.read_u8()?,
            rtc_reg: r.read_u8()?,
        };
        let crtc = Crtc {
            cursor_start: r.read_u8()?,
            cursor_pos: r.read_u16()?,
            cursor_visible: r.read_bool()?,
        };
        if memory.rom_size > memory.rom().len() || memory.video_size > MAX_VIDEO_SIZE {
            return Err(anyhow!("invalid store sizes {} / {}", memory.rom_size, memory.video_size));
        }

        self.memory = memory;
        self.banks = Banks {
            map,
            bank_offset,
            bank_base,
            video_offset,
            rom_visible,
            bank_command,
            card,
            system_byte,
        };
        self.io = io;
        self.crtc = crtc;
        self.set_clone_id(clone_id);
        Ok(())
    }

    pub fn save_state_compressed(&self) -> anyhow::Result<Vec<u8>> {
        let mut data = Vec::new();
        self.save_state(&mut data)?;
        state::deflate(&data)
    }

    pub fn load_state_compressed(&mut self, data: &[u8]) -> anyhow::Result<()> {
        let data = state::inflate(data)?;
        self.load_state(&data[..])
    }
}

impl<P: Peripherals> Bus for Machine<P> {
    fn peek(&mut self, addr: impl Into<u16>) -> u8 {
        self.read(addr.into())
    }
    fn poke(&mut self, addr: impl Into<u16>, value: u8) {
        self.write(addr.into(), value)
    }
    fn do_in(&mut self, port: impl Into<u16>) -> u8 {
        self.io_read(port.into())
    }
    fn do_out(&mut self, port: impl Into<u16>, value: u8) {
        self.io_write(port.into(), value)
    }
}
