use anyhow::{Context, anyhow};
use std::env;

use trs80_bus::decode::{self, Layout};
use trs80_bus::memory::Access;
use trs80_bus::{Bus, Machine, MachineConfig, Model, NullPeripherals};

struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }
    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            println!("[{}] {}", record.level(), record.args());
        }
    }
    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

fn parse_number(s: &str) -> anyhow::Result<u32> {
    let n = match s.strip_prefix("0x") {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    n.with_context(|| format!("invalid number '{}'", s))
}

fn main() -> anyhow::Result<()> {
    log::set_logger(&LOGGER).map_err(|e| anyhow!("{}", e))?;
    log::set_max_level(log::LevelFilter::Info);

    let mut args = env::args();
    let _program = args
        .next()
        .ok_or_else(|| anyhow!("Missing command line argument"))?;
    let usage = "usage: console <model 1|3|4|5> <rom> [addr [len]] [state]";

    let model = args.next().ok_or_else(|| anyhow!(usage))?;
    let model = Model::from_number(parse_number(&model)? as u8)
        .ok_or_else(|| anyhow!("unknown model {}", model))?;
    let rom = args.next().ok_or_else(|| anyhow!(usage))?;
    let addr = args.next().map(|s| parse_number(&s)).transpose()?.unwrap_or(0);
    let len = args.next().map(|s| parse_number(&s)).transpose()?.unwrap_or(0x40);
    let state = args.next();

    let mut machine = Machine::new(MachineConfig::new(model), NullPeripherals);
    let image = trs80_bus::rom::rom_from_file(&rom)?;
    machine.load_rom(&image)?;

    let layout = Layout {
        model,
        rom_size: machine.memory().rom_size,
        lowercase: machine.config().lowercase,
    };
    println!("map {:?}", machine.banks().map);
    for page in (0..0x10000u32).step_by(0x1000) {
        let page = page as u16;
        println!(
            "{:04x}: R {:?} / W {:?}",
            page,
            decode::resolve(page, Access::Read, machine.banks(), &layout),
            decode::resolve(page, Access::Write, machine.banks(), &layout),
        );
    }

    let addr = addr as u16;
    for row in (0..len).step_by(16) {
        let base = addr.wrapping_add(row as u16);
        let bytes: Vec<String> = (0..16u16.min((len - row) as u16))
            .map(|i| format!("{:02x}", machine.peek(base.wrapping_add(i))))
            .collect();
        println!("{:04x}: {}", base, bytes.join(" "));
    }

    if let Some(state) = state {
        let data = machine.save_state_compressed()?;
        std::fs::write(&state, data).with_context(|| format!("writing {}", state))?;
        log::info!("state saved to {}", state);
    }
    Ok(())
}
