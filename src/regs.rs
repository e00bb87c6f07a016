//Composite port registers, decoded once when written.

/// Model 4 control register, ports 0x84-0x87.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlRegister {
    pub video_page: bool,
    pub bank_command: u8,
    pub inverse: bool,
    pub mode_80x24: bool,
    pub map: u8,
}

impl ControlRegister {
    pub fn decode(value: u8) -> ControlRegister {
        ControlRegister {
            video_page: value & 0x80 != 0,
            bank_command: (value & 0x70) >> 4,
            inverse: value & 0x08 != 0,
            mode_80x24: value & 0x04 != 0,
            map: value & 0x03,
        }
    }
}

/// Fields that differ between two writes of the control register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlChanges {
    pub video_page: bool,
    pub bank_command: bool,
    pub inverse: bool,
    pub mode_80x24: bool,
    pub map: bool,
}

impl ControlChanges {
    pub fn between(old: u8, new: u8) -> ControlChanges {
        let x = old ^ new;
        ControlChanges {
            video_page: x & 0x80 != 0,
            bank_command: x & 0x70 != 0,
            inverse: x & 0x08 != 0,
            mode_80x24: x & 0x04 != 0,
            map: x & 0x03 != 0,
        }
    }
}

/// Model III/4 mode register, ports 0xEC-0xEF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeRegister {
    pub cassette_motor: bool,
    pub expanded: bool,
    /// Alternate character set, active low in the register
    pub alternate: bool,
    /// Clock speed is bit 6, the timer wants the whole byte
    pub raw: u8,
}

impl ModeRegister {
    pub fn decode(value: u8) -> ModeRegister {
        ModeRegister {
            cassette_motor: value & 0x02 != 0,
            expanded: value & 0x04 != 0,
            alternate: value & 0x08 == 0,
            raw: value,
        }
    }
}

/// Model I cassette/video latch, port 0xFF (0xFE-0xFF on the Genie).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Model1Output {
    pub expanded: bool,
    pub cassette_motor: bool,
    pub cassette_out: u8,
}

impl Model1Output {
    pub fn decode(value: u8) -> Model1Output {
        Model1Output {
            expanded: value & 0x08 != 0,
            cassette_motor: value & 0x04 != 0,
            cassette_out: value & 0x03,
        }
    }
}
