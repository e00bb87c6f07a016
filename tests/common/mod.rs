#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use trs80_bus::peripherals::{DiskReg, Peripherals};
use trs80_bus::{Machine, MachineConfig, Model};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ScreenChar(usize, u8),
    ScreenInit,
    Expanded(bool),
    Alternate(bool),
    Inverse(bool),
    Mode80x24(bool),
    CassetteMotor(bool),
    TimerSpeed(u8),
    TimerInit,
    Percom,
    Hrg(bool),
    HrgAddr(u16, u16),
    HrgData(u8),
    Disk(DiskReg, u8),
    Printer(u8),
    CrtcScreen(u8, u8, u8),
    CrtcCursor(u16, u8, bool),
}

/// What the recorder answers for HRG and disk reads.
pub const HRG_BYTE: u8 = 0xa5;
pub const DISK_BYTE: u8 = 0x5c;

/// Devices that remember what the machine asked of them.
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<Event>,
}

impl Recorder {
    pub fn take(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
    pub fn saw(&self, e: &Event) -> bool {
        self.events.contains(e)
    }
}

impl Peripherals for Recorder {
    fn screen_write_char(&mut self, index: usize, value: u8) {
        self.events.push(Event::ScreenChar(index, value));
    }
    fn screen_init(&mut self) {
        self.events.push(Event::ScreenInit);
    }
    fn screen_expanded(&mut self, on: bool) {
        self.events.push(Event::Expanded(on));
    }
    fn screen_alternate(&mut self, on: bool) {
        self.events.push(Event::Alternate(on));
    }
    fn screen_inverse(&mut self, on: bool) {
        self.events.push(Event::Inverse(on));
    }
    fn screen_80x24(&mut self, on: bool) {
        self.events.push(Event::Mode80x24(on));
    }
    fn cassette_motor(&mut self, on: bool) {
        self.events.push(Event::CassetteMotor(on));
    }
    fn timer_speed(&mut self, value: u8) {
        self.events.push(Event::TimerSpeed(value));
    }
    fn timer_init(&mut self) {
        self.events.push(Event::TimerInit);
    }
    fn disk_doubler_percom(&mut self) {
        self.events.push(Event::Percom);
    }
    fn hrg_onoff(&mut self, on: bool) {
        self.events.push(Event::Hrg(on));
    }
    fn hrg_write_addr(&mut self, addr: u16, mask: u16) {
        self.events.push(Event::HrgAddr(addr, mask));
    }
    fn hrg_write_data(&mut self, value: u8) {
        self.events.push(Event::HrgData(value));
    }
    fn hrg_read_data(&mut self) -> u8 {
        HRG_BYTE
    }
    fn disk_read(&mut self, _reg: DiskReg) -> u8 {
        DISK_BYTE
    }
    fn disk_write(&mut self, reg: DiskReg, value: u8) {
        self.events.push(Event::Disk(reg, value));
    }
    fn printer_write(&mut self, value: u8) {
        self.events.push(Event::Printer(value));
    }
    fn m6845_screen(&mut self, chars: u8, lines: u8, raster: u8) {
        self.events.push(Event::CrtcScreen(chars, lines, raster));
    }
    fn m6845_cursor(&mut self, pos: u16, line: u8, visible: bool) {
        self.events.push(Event::CrtcCursor(pos, line, visible));
    }
    fn now(&self) -> NaiveDateTime {
        //a Friday
        NaiveDate::from_ymd_opt(2024, 3, 29)
            .and_then(|d| d.and_hms_opt(17, 45, 9))
            .unwrap()
    }
}

pub fn machine(config: MachineConfig) -> Machine<Recorder> {
    let mut m = Machine::new(config, Recorder::default());
    m.dev.take();
    m
}

pub fn model(model: Model) -> Machine<Recorder> {
    machine(MachineConfig::new(model))
}

/// 16K image where every byte holds its page number.
pub fn page_rom() -> Vec<u8> {
    (0..0x4000).map(|i| (i >> 8) as u8).collect()
}
