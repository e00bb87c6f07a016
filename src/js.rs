//Browser facade: a machine whose devices are a keyboard matrix and a text
//screen that the page polls.

use wasm_bindgen::prelude::*;

use crate::config::{MachineConfig, Model};
use crate::machine::Machine;
use crate::peripherals::Peripherals;

#[derive(Default)]
struct WebDevices {
    keys: [u8; 8],
    screen_dirty: bool,
}

impl Peripherals for WebDevices {
    fn keyboard_read(&mut self, addr: u16) -> u8 {
        self.keys
            .iter()
            .enumerate()
            .filter(|&(row, _)| addr & (1 << row) != 0)
            .fold(0, |acc, (_, &k)| acc | k)
    }
    fn screen_write_char(&mut self, _index: usize, _value: u8) {
        self.screen_dirty = true;
    }
    fn screen_init(&mut self) {
        self.screen_dirty = true;
    }
}

#[wasm_bindgen(start)]
pub fn init() {
    let _ = console_log::init_with_level(log::Level::Info);
}

#[wasm_bindgen]
pub struct Trs80 {
    machine: Machine<WebDevices>,
}

#[wasm_bindgen]
impl Trs80 {
    #[wasm_bindgen(constructor)]
    pub fn new(model: u8) -> Result<Trs80, JsError> {
        let model = Model::from_number(model).ok_or_else(|| JsError::new("unknown model"))?;
        let machine = Machine::new(MachineConfig::new(model), WebDevices::default());
        Ok(Trs80 { machine })
    }
    pub fn load_rom(&mut self, data: &[u8]) -> Result<(), JsError> {
        self.machine.load_rom(data).map_err(|e| JsError::new(&format!("{:#}", e)))
    }
    pub fn reset(&mut self, poweron: bool) {
        self.machine.reset(poweron);
    }
    pub fn peek(&mut self, addr: u16) -> u8 {
        self.machine.read(addr)
    }
    pub fn poke(&mut self, addr: u16, value: u8) {
        self.machine.write(addr, value);
    }
    pub fn port_in(&mut self, port: u16) -> u8 {
        self.machine.io_read(port)
    }
    pub fn port_out(&mut self, port: u16, value: u8) {
        self.machine.io_write(port, value);
    }
    pub fn key_down(&mut self, row: usize, bit: u8) {
        if let Some(k) = self.machine.dev.keys.get_mut(row) {
            *k |= 1 << (bit & 7);
        }
    }
    pub fn key_up(&mut self, row: usize, bit: u8) {
        if let Some(k) = self.machine.dev.keys.get_mut(row) {
            *k &= !(1 << (bit & 7));
        }
    }
    pub fn reset_input(&mut self) {
        self.machine.dev.keys = [0; 8];
    }
    /// The video store, if it changed since the last call.
    pub fn take_screen(&mut self) -> Option<Vec<u8>> {
        if !std::mem::take(&mut self.machine.dev.screen_dirty) {
            return None;
        }
        Some(self.machine.memory().video().to_vec())
    }
    pub fn snapshot(&self) -> Result<Vec<u8>, JsError> {
        self.machine.save_state_compressed().map_err(|e| JsError::new(&format!("{:#}", e)))
    }
    pub fn load_snapshot(&mut self, data: &[u8]) -> Result<(), JsError> {
        self.machine.load_state_compressed(data).map_err(|e| JsError::new(&format!("{:#}", e)))
    }
}
