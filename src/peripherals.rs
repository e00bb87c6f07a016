//Devices behind the bus. The core only forwards register accesses; the
//defaults model an empty expansion bus.

use chrono::{Local, NaiveDateTime};

use crate::quirks::CloneQuirks;

/// FD1771/FD1793 registers, numbered as on the Model III ports 0xF0-0xF3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskReg {
    /// Status on read, command on write
    StatusCommand,
    Track,
    Sector,
    Data,
}

impl DiskReg {
    pub fn from_port(port: u8) -> DiskReg {
        match port & 3 {
            0 => DiskReg::StatusCommand,
            1 => DiskReg::Track,
            2 => DiskReg::Sector,
            _ => DiskReg::Data,
        }
    }
}

/// Radio Shack hard disk register numbers (0xC0-0xCF).
pub mod hard {
    pub const WP: u8 = 0xc0;
    pub const CONTROL: u8 = 0xc1;
    pub const DATA: u8 = 0xc8;
    /// Status on read, command on write
    pub const STATUS: u8 = 0xcf;
}

/// TR1865 UART on ports 0xE8-0xEB; each port has a read and a write meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UartReg {
    /// Modem status / reset
    ModemReset,
    /// Switches / baud rate
    SwitchesBaud,
    /// Status / control
    StatusControl,
    Data,
}

impl UartReg {
    pub fn from_port(port: u8) -> UartReg {
        match port & 3 {
            0 => UartReg::ModemReset,
            1 => UartReg::SwitchesBaud,
            2 => UartReg::StatusControl,
            _ => UartReg::Data,
        }
    }
}

/// Tandy/Micro-Labs hi-res graphics board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrafyxReg {
    X,
    Y,
    Data,
    Mode,
    XOffset,
    YOffset,
    Overlay,
}

/// Lowe Electronics LE18 graphics on ports 0xEC-0xEF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoweReg {
    Data,
    X,
    Y,
    Control,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchChannel {
    Left = 1,
    Right = 2,
}

/// Everything outside of the memory and port decoders. Reads default to
/// what an empty bus returns.
#[allow(unused_variables)]
pub trait Peripherals {
    fn keyboard_read(&mut self, addr: u16) -> u8 {
        0x00
    }
    fn printer_read(&mut self) -> u8 {
        0xff
    }
    fn printer_write(&mut self, value: u8) {}
    /// A character cell changed, `index` is linear in the 80-column layout.
    fn screen_write_char(&mut self, index: usize, value: u8) {}

    fn disk_read(&mut self, reg: DiskReg) -> u8 {
        0xff
    }
    fn disk_write(&mut self, reg: DiskReg, value: u8) {}
    fn disk_select_write(&mut self, value: u8, quirks: &CloneQuirks) {}
    /// Percom doubler, forced when the EG 3200 banks get activated
    fn disk_doubler_percom(&mut self) {}
    fn hard_disk_read(&mut self, reg: u8) -> u8 {
        0xff
    }
    fn hard_disk_write(&mut self, reg: u8, value: u8) {}

    fn interrupt_latch_read(&mut self) -> u8 {
        0xff
    }
    fn interrupt_mask_write(&mut self, value: u8) {}
    fn nmi_latch_read(&mut self) -> u8 {
        0xff
    }
    fn nmi_mask_write(&mut self, value: u8) {}
    fn timer_interrupt(&mut self, on: bool) {}
    fn reset_button_interrupt(&mut self, on: bool) {}
    fn timer_speed(&mut self, value: u8) {}
    fn timer_init(&mut self) {}

    fn grafyx_write(&mut self, reg: GrafyxReg, value: u8) {}
    fn grafyx_read_data(&mut self) -> u8 {
        0xff
    }
    fn grafyx_microlabs(&self) -> bool {
        false
    }
    fn grafyx_m3_write_mode(&mut self, value: u8) {}
    /// Model III video read; `None` lets the character video answer.
    fn grafyx_m3_read(&mut self, index: usize) -> Option<u8> {
        None
    }
    /// Model III video write; `true` if the graphics board took it.
    fn grafyx_m3_write(&mut self, index: usize, value: u8) -> bool {
        false
    }
    fn grafyx_m3_reset(&mut self) {}

    fn hrg_onoff(&mut self, on: bool) {}
    fn hrg_write_addr(&mut self, addr: u16, mask: u16) {}
    fn hrg_write_data(&mut self, value: u8) {}
    fn hrg_read_data(&mut self) -> u8 {
        0xff
    }

    fn uart_read(&mut self, reg: UartReg) -> u8 {
        0xff
    }
    fn uart_write(&mut self, reg: UartReg, value: u8) {}

    fn sound_out(&mut self, on: bool) {}
    fn orch_out(&mut self, channel: OrchChannel, value: u8) {}

    fn cassette_motor(&mut self, on: bool) {}
    fn cassette_out(&mut self, value: u8) {}
    /// Only bits 7 and 0 are significant
    fn cassette_in(&mut self) -> u8 {
        0
    }

    fn screen_expanded(&mut self, on: bool) {}
    fn screen_alternate(&mut self, on: bool) {}
    fn screen_inverse(&mut self, on: bool) {}
    fn screen_80x24(&mut self, on: bool) {}
    fn screen_init(&mut self) {}
    /// 0 in any field means "unchanged"
    fn m6845_screen(&mut self, chars: u8, lines: u8, raster: u8) {}
    fn m6845_cursor(&mut self, pos: u16, line: u8, visible: bool) {}

    fn joystick_read(&mut self) -> u8 {
        0xff
    }
    fn lowe_le18_installed(&self) -> bool {
        false
    }
    fn lowe_le18_read(&mut self) -> u8 {
        0xff
    }
    fn lowe_le18_write(&mut self, reg: LoweReg, value: u8) {}
    fn stringy_installed(&self) -> bool {
        false
    }
    fn stringy_read(&mut self, reg: u8) -> u8 {
        0xff
    }
    fn stringy_write(&mut self, reg: u8, value: u8) {}

    /// Wall clock for the RTC cards.
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A bare machine: nothing plugged in.
#[derive(Debug, Default)]
pub struct NullPeripherals;

impl Peripherals for NullPeripherals {}
