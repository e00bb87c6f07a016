//Port dispatcher. Order: clock cards, then the Genie port map when its banks
//are active, then the ports every model shares, then the per-model maps.

use crate::banks::{ExpansionCard, GenieKind};
use crate::config::{CloneModel, Model, Speedup};
use crate::cp500;
use crate::machine::Machine;
use crate::peripherals::{
    DiskReg, GrafyxReg, LoweReg, OrchChannel, Peripherals, UartReg, hard,
};
use crate::quirks::{self, CloneId};
use crate::regs::{ControlChanges, ControlRegister, ModeRegister, Model1Output};
use crate::rtc;

/// Write-only latches that some ports echo back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoLatches {
    /// Model I 32 chars/line mode
    pub modesel: bool,
    /// Model III/4 mode register (0xEC), 0xF1 on the Genie
    pub modeimage: u8,
    /// Model 4 control register (0x84), or the 6845 register select
    pub ctrlimage: u8,
    /// Model 4P boot ROM enable (0x9C)
    pub rominimage: u8,
    /// Genie clock digit select
    pub rtc_reg: u8,
}

impl Default for IoLatches {
    fn default() -> Self {
        IoLatches {
            modesel: false,
            modeimage: 0x08,
            ctrlimage: 0,
            rominimage: 0,
            rtc_reg: 0,
        }
    }
}

//Genie hard disk ports 0x48-0x4F and 0x50-0x57, renumbered as the Radio Shack ones
fn genie_hard(port: u8) -> u8 {
    hard::DATA | (port & 7)
}

impl<P: Peripherals> Machine<P> {
    fn genie(&self) -> Option<GenieKind> {
        match self.banks.card {
            ExpansionCard::Genie { kind, .. } => Some(kind),
            _ => None,
        }
    }

    /// IN instruction. The high byte of `port` is what the Z80 puts on
    /// A15-A8, the A register for `IN A,(n)`.
    pub fn io_read(&mut self, port: u16) -> u8 {
        let p = port as u8;
        let value = self.port_in(p, (port >> 8) as u8);
        if self.config.io_trace {
            log::debug!("in ({:02x}) => {:02x}", p, value);
        }
        value
    }

    pub fn io_write(&mut self, port: u16, value: u8) {
        let p = port as u8;
        if self.config.io_trace {
            log::debug!("out ({:02x}), {:02x}", p, value);
        }
        self.port_out(p, value);
    }

    fn port_in(&mut self, p: u8, a: u8) -> u8 {
        let genie = self.genie();
        if rtc::claims(p, genie) {
            let now = self.dev.now();
            return rtc::read(p, genie, self.io.rtc_reg, &now);
        }
        if let Some(kind) = genie {
            return self.genie_in(p, kind);
        }
        match p {
            0x00 => return self.dev.joystick_read(),
            hard::WP | hard::CONTROL | hard::DATA..=hard::STATUS => return self.dev.hard_disk_read(p),
            0xe8..=0xeb => return self.dev.uart_read(UartReg::from_port(p)),
            0x43 if !self.config.model.is_model4() && matches!(self.banks.card, ExpansionCard::SuperMem { .. }) => {
                return self.banks.read_bank_base();
            }
            _ => {}
        }
        if self.config.model == Model::One {
            self.model1_in(p)
        } else {
            self.model34_in(p, a)
        }
    }

    fn genie_in(&mut self, p: u8, kind: GenieKind) -> u8 {
        let genie3s = kind == GenieKind::Genie3s;
        match p {
            0x48..=0x57 => self.dev.hard_disk_read(genie_hard(p)),
            0xe0..=0xe3 => self.dev.interrupt_latch_read(),
            0xe8..=0xeb if genie3s => self.dev.printer_read(),
            0xec..=0xef if genie3s => self.dev.disk_read(DiskReg::from_port(p)),
            0xf1 => self.io.modeimage,
            0xf7 => self.crtc.read(self.io.ctrlimage),
            0xf9 => match self.banks.card {
                ExpansionCard::Genie { kind: GenieKind::Genie3s, mask } => mask,
                _ => 0x00,
            },
            0xfa => self.banks.system_byte,
            0xfd => self.dev.printer_read(),
            0xfe | 0xff => self.model1_latch_in(),
            _ => 0xff,
        }
    }

    fn model1_latch_in(&mut self) -> u8 {
        (if self.io.modesel { 0x3f } else { 0x7f }) | self.dev.cassette_in()
    }

    fn model1_in(&mut self, p: u8) -> u8 {
        match p {
            //0x00 would be HRG off, but the joystick owns it
            0x01 => {
                self.dev.hrg_onoff(true);
                0xff
            }
            0x04 => self.dev.hrg_read_data(),
            0xec => self.dev.lowe_le18_read(),
            0xf0..=0xf7 if self.dev.stringy_installed() => self.dev.stringy_read(p & 7),
            0xf9 => self.dev.uart_read(UartReg::Data),
            //Genie location of the printer port
            0xfd => self.dev.printer_read(),
            0xfe if self.config.speedup.has_system_byte() => self.banks.system_byte,
            0xff => self.model1_latch_in(),
            _ => 0xff,
        }
    }

    fn model34_in(&mut self, p: u8, a: u8) -> u8 {
        match p {
            0x82 => self.dev.grafyx_read_data(),
            0x94 => self.banks.read_bank_base(),
            0x9c..=0x9f if self.config.model == Model::FourP => self.io.rominimage,
            0xe0..=0xe3 => {
                let value = self.dev.interrupt_latch_read();
                if self.quirks.interrupt_latch_clears_timer {
                    self.dev.timer_interrupt(false);
                }
                value
            }
            0xe4 => self.dev.nmi_latch_read(),
            0xec..=0xef => {
                //timer acknowledge
                self.dev.timer_interrupt(false);
                0xff
            }
            0xf0..=0xf3 => self.dev.disk_read(DiskReg::from_port(p)),
            0xf4..=0xf7 => {
                if matches!(self.banks.card, ExpansionCard::Cp500 { .. }) {
                    let id = cp500::port_read(a, &mut self.banks, &mut self.memory, &mut self.dev);
                    self.set_clone_id(id);
                    0x00
                } else {
                    0xff
                }
            }
            0xf8..=0xfb => self.dev.printer_read() | (self.io.ctrlimage & 0x0f),
            0xfc | 0xfd | 0xff => (self.io.modeimage & 0x7e) | self.dev.cassette_in(),
            _ => 0xff,
        }
    }

    fn port_out(&mut self, p: u8, value: u8) {
        if let Some(kind) = self.genie() {
            self.genie_out(p, value, kind);
            return;
        }
        match p {
            hard::WP | hard::CONTROL | hard::DATA..=hard::STATUS => self.dev.hard_disk_write(p, value),
            0xe8..=0xeb => self.dev.uart_write(UartReg::from_port(p), value),
            0x43 if !self.config.model.is_model4() => self.banks.write_bank_base(value),
            _ => {}
        }
        if self.config.model == Model::One {
            self.model1_out(p, value);
        } else {
            self.model34_out(p, value);
        }
    }

    fn genie_out(&mut self, p: u8, value: u8, kind: GenieKind) {
        let genie3s = kind == GenieKind::Genie3s;
        match p {
            0x48..=0x57 => self.dev.hard_disk_write(genie_hard(p), value),
            0x5b if genie3s => self.io.rtc_reg = value,
            0xe0 if !genie3s => self.io.rtc_reg = value,
            0xe0..=0xe3 => self.dev.disk_select_write(value, self.quirks),
            0xe8..=0xeb if genie3s => self.dev.printer_write(value),
            0xec..=0xef if genie3s => self.dev.disk_write(DiskReg::from_port(p), value),
            0xf1 => self.io.modeimage = value,
            0xf5 if !genie3s => self.dev.screen_inverse(value & 1 != 0),
            0xf6 => self.io.ctrlimage = value,
            0xf7 => self.crtc.write(self.io.ctrlimage, value, &mut self.dev),
            0xf9 if genie3s => self.banks.card = ExpansionCard::Genie { kind, mask: value },
            0xfa if genie3s => self.banks.system_byte = value,
            0xfa => self.banks.card = ExpansionCard::Genie { kind, mask: value },
            0xfd => self.dev.printer_write(value),
            0xfe | 0xff => self.model1_latch_out(value),
            _ => {}
        }
    }

    fn model1_latch_out(&mut self, value: u8) {
        let out = Model1Output::decode(value);
        self.io.modesel = out.expanded;
        self.dev.screen_expanded(out.expanded);
        self.dev.cassette_motor(out.cassette_motor);
        self.dev.cassette_out(out.cassette_out);
    }

    //First write to the bank register of a Genie switches its banks on
    fn genie_activate(&mut self, kind: GenieKind, mask: u8) {
        log::info!("{:?} banks enabled, mask {:02x}", kind, mask);
        self.banks.enable(ExpansionCard::Genie { kind, mask });
        self.dev.disk_doubler_percom();
        self.dev.timer_init();
        self.dev.screen_inverse(false);
        self.dev.screen_init();
    }

    fn model1_out(&mut self, p: u8, value: u8) {
        let speedup = self.config.speedup;
        match p {
            0x00 | 0x01 => self.dev.hrg_onoff(p == 1),
            0x02 => self.dev.hrg_write_addr(value as u16, 0x00ff),
            0x03 => self.dev.hrg_write_addr((value as u16) << 8, 0x3f00),
            0x05 => self.dev.hrg_write_data(value),
            //the selector does not decode A5
            0x1f | 0x3f => {
                if matches!(self.banks.card, ExpansionCard::Selector { .. }) {
                    self.banks.selector_out(value);
                }
            }
            0xb5 => self.dev.orch_out(OrchChannel::Right, value),
            0xb9 => self.dev.orch_out(OrchChannel::Left, value),
            //80x22 homebrew 6845 board, not with the LNW80/SpeedMaster system byte
            0xd0 | 0x10 if speedup <= Speedup::Banking => self.io.ctrlimage = value,
            0xd1 | 0x11 if speedup <= Speedup::Banking => {
                self.crtc.write(self.io.ctrlimage, value, &mut self.dev)
            }
            0xec => {
                if self.dev.lowe_le18_installed() {
                    self.dev.lowe_le18_write(LoweReg::Data, value);
                } else if speedup == Speedup::Seatronics {
                    self.dev.timer_speed(value);
                }
            }
            0xed => self.dev.lowe_le18_write(LoweReg::X, value),
            0xee => self.dev.lowe_le18_write(LoweReg::Y, value),
            0xef => self.dev.lowe_le18_write(LoweReg::Control, value),
            0xf0..=0xf7 => {
                if self.dev.stringy_installed() {
                    self.dev.stringy_write(p & 7, value);
                }
            }
            0xf8 => self.dev.uart_write(UartReg::Data, value),
            0xf9 if speedup < Speedup::Banking && self.config.clone == Some(CloneModel::Genie3s) => {
                self.genie_activate(GenieKind::Genie3s, value)
            }
            0xfa if speedup < Speedup::Banking && self.config.clone == Some(CloneModel::Eg3200) => {
                self.genie_activate(GenieKind::Eg3200, value)
            }
            0xfd => self.dev.printer_write(value),
            //usual location of the clock speed-up kits
            0xfe if speedup == Speedup::None => {}
            0xfe if speedup < Speedup::Banking => self.dev.timer_speed(value),
            0xfe => {
                if let Some(on) = self.banks.system_byte_out(value, speedup) {
                    self.dev.hrg_onoff(on);
                }
            }
            0xff => self.model1_latch_out(value),
            _ => {}
        }
    }

    fn control_out(&mut self, value: u8) {
        let ch = ControlChanges::between(self.io.ctrlimage, value);
        let c = ControlRegister::decode(value);
        if ch.video_page {
            self.banks.set_video_page(c.video_page);
        }
        if ch.bank_command {
            self.banks.bank_command(c.bank_command);
        }
        if ch.inverse {
            self.dev.screen_inverse(c.inverse);
        }
        if ch.mode_80x24 {
            self.dev.screen_80x24(c.mode_80x24);
        }
        if ch.map {
            self.banks.select_map(self.config.model, c.map);
        }
        self.io.ctrlimage = value;
    }

    fn model34_out(&mut self, p: u8, value: u8) {
        let model = self.config.model;
        match p {
            //Sprinter III
            0x5f if model == Model::Three => self.dev.timer_speed(value),
            0x75 => self.dev.orch_out(OrchChannel::Right, value),
            0x79 => self.dev.orch_out(OrchChannel::Left, value),
            0x80 => self.dev.grafyx_write(GrafyxReg::X, value),
            0x81 => self.dev.grafyx_write(GrafyxReg::Y, value),
            0x82 => self.dev.grafyx_write(GrafyxReg::Data, value),
            0x83 => self.dev.grafyx_write(GrafyxReg::Mode, value),
            0x84..=0x87 if model.is_model4() => self.control_out(value),
            0x8c if model.is_model4() => self.dev.grafyx_write(GrafyxReg::XOffset, value),
            0x8d if model.is_model4() => self.dev.grafyx_write(GrafyxReg::YOffset, value),
            0x8e if model.is_model4() => self.dev.grafyx_write(GrafyxReg::Overlay, value),
            0x90..=0x93 => {
                //HyperMem takes bits 4-1, bit 0 is still the speaker
                if p == 0x90 && model.is_model4() && matches!(self.banks.card, ExpansionCard::HyperMem { .. }) {
                    self.banks.write_bank_base(value);
                }
                self.dev.sound_out(value & 1 != 0);
            }
            0x94 if model.is_model4() && matches!(self.banks.card, ExpansionCard::Huffman { .. }) => {
                self.banks.write_bank_base(value)
            }
            0x9c..=0x9f if model == Model::FourP => {
                self.io.rominimage = value & 1;
                self.banks.set_rom_visible(value & 1 != 0);
            }
            0xe0..=0xe3 => self.dev.interrupt_mask_write(value),
            0xe4..=0xe7 => self.dev.nmi_mask_write(value),
            0xec..=0xef => {
                self.io.modeimage = value;
                let m = ModeRegister::decode(value);
                self.dev.cassette_motor(m.cassette_motor);
                self.dev.screen_expanded(m.expanded);
                self.dev.screen_alternate(m.alternate);
                self.dev.timer_speed(m.raw);
            }
            0xf0..=0xf3 => self.dev.disk_write(DiskReg::from_port(p), value),
            0xf4..=0xf7 => self.dev.disk_select_write(value, self.quirks),
            0xf8..=0xfb => self.dev.printer_write(value),
            0xfc..=0xff => {
                if model == Model::Three && value & 0x20 != 0 && self.dev.grafyx_microlabs() {
                    self.dev.grafyx_m3_write_mode(value);
                } else {
                    self.dev.cassette_out(value & 3);
                }
            }
            _ => {}
        }
    }

    pub(crate) fn set_clone_id(&mut self, id: CloneId) {
        if id != self.clone_id {
            log::debug!("clone quirks: {}", quirks::lookup(id).name);
        }
        self.clone_id = id;
        self.quirks = quirks::lookup(id);
    }
}
