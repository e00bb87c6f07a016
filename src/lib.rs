#[cfg(feature="zip")]
extern crate zip;

pub mod bus;
pub mod config;
pub mod quirks;
pub mod banks;
pub mod memory;
pub mod decode;
pub mod regs;
pub mod crtc;
pub mod rtc;
pub mod cp500;
pub mod peripherals;
pub mod io;
pub mod machine;
pub mod state;
pub mod rom;

#[cfg(target_arch = "wasm32")]
mod js;

pub use bus::Bus;
pub use config::{CloneModel, ExpansionKind, MachineConfig, Model, Speedup};
pub use machine::Machine;
pub use memory::{Access, Cell, Store};
pub use peripherals::{NullPeripherals, Peripherals};
pub use quirks::{CloneId, CloneQuirks};
