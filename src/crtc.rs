//Motorola 6845 CRT controller, only the registers the screen cares about.

use crate::peripherals::Peripherals;

const R_CHARS: u8 = 0x01;
const R_LINES: u8 = 0x06;
const R_RASTER: u8 = 0x09;
const R_CURSOR_START: u8 = 0x0a;
const R_CURSOR_HI: u8 = 0x0e;
const R_CURSOR_LO: u8 = 0x0f;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Crtc {
    pub cursor_start: u8,
    pub cursor_pos: u16,
    pub cursor_visible: bool,
}

impl Crtc {
    pub fn new() -> Crtc {
        Crtc::default()
    }
    /// Data write to the register selected by `reg`.
    pub fn write(&mut self, reg: u8, value: u8, dev: &mut impl Peripherals) {
        match reg {
            R_CHARS => dev.m6845_screen(if value <= 80 { value } else { 0 }, 0, 0),
            R_LINES => dev.m6845_screen(0, if value <= 32 { value } else { 0 }, 0),
            R_RASTER => {
                dev.m6845_screen(0, 0, if value < 16 { value + 1 } else { 0 });
                dev.m6845_cursor(self.cursor_pos, self.cursor_start, self.cursor_visible);
            }
            R_CURSOR_START => {
                //blink mode 01 hides the cursor
                self.cursor_visible = value & 0x20 == 0 || value & 0x40 != 0;
                self.cursor_start = value & 0x0f;
                dev.m6845_cursor(self.cursor_pos, self.cursor_start, self.cursor_visible);
            }
            R_CURSOR_HI => {
                if self.cursor_visible {
                    dev.m6845_cursor(self.cursor_pos, 0, false);
                }
                self.cursor_pos = (((value & 0x3f) as u16) << 8) | (self.cursor_pos & 0x00ff);
            }
            R_CURSOR_LO => {
                self.cursor_pos = value as u16 | (self.cursor_pos & 0xff00);
                if self.cursor_visible {
                    dev.m6845_cursor(self.cursor_pos, self.cursor_start, true);
                }
            }
            _ => {}
        }
    }
    pub fn read(&self, reg: u8) -> u8 {
        match reg {
            R_CURSOR_HI => (self.cursor_pos >> 8) as u8,
            R_CURSOR_LO => self.cursor_pos as u8,
            _ => 0xff,
        }
    }
}
