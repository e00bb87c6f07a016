//Per clone behavioral deviations. The table is looked up, never computed.

use crate::config::CloneModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneId {
    None = 0,
    Cp500 = 1,
    Cp500M80 = 2,
    Eg3200 = 3,
    Genie3s = 4,
    Lnw80 = 5,
    SpeedMaster = 6,
}

impl CloneId {
    pub fn from_u8(v: u8) -> Option<CloneId> {
        Some(match v {
            0 => CloneId::None,
            1 => CloneId::Cp500,
            2 => CloneId::Cp500M80,
            3 => CloneId::Eg3200,
            4 => CloneId::Genie3s,
            5 => CloneId::Lnw80,
            6 => CloneId::SpeedMaster,
            _ => return None,
        })
    }
}

impl From<Option<CloneModel>> for CloneId {
    fn from(clone: Option<CloneModel>) -> Self {
        match clone {
            None => CloneId::None,
            Some(CloneModel::Cp500) => CloneId::Cp500,
            Some(CloneModel::Eg3200) => CloneId::Eg3200,
            Some(CloneModel::Genie3s) => CloneId::Genie3s,
            Some(CloneModel::Lnw80) => CloneId::Lnw80,
            Some(CloneModel::SpeedMaster) => CloneId::SpeedMaster,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct CloneQuirks {
    pub name: &'static str,
    /// Disk side is selected with bit 4 instead of bit 3
    pub disk_side_select_bit4: bool,
    /// A disk select write with the wait bit set must not fire a pending
    /// disk interrupt early
    pub disk_select_ignore_wait: bool,
    /// Reading the interrupt latch clears the latched timer interrupt
    pub interrupt_latch_clears_timer: bool,
}

const NO_QUIRKS: CloneQuirks = CloneQuirks {
    name: "",
    disk_side_select_bit4: false,
    disk_select_ignore_wait: false,
    interrupt_latch_clears_timer: false,
};

const CP500: CloneQuirks = CloneQuirks {
    name: "CP-500",
    ..NO_QUIRKS
};

const CP500_M80: CloneQuirks = CloneQuirks {
    name: "CP-500 M80",
    disk_side_select_bit4: false,
    disk_select_ignore_wait: true,
    interrupt_latch_clears_timer: true,
};

const EG3200: CloneQuirks = CloneQuirks {
    name: "EACA EG 3200 Genie III",
    disk_side_select_bit4: true,
    ..NO_QUIRKS
};

const GENIE3S: CloneQuirks = CloneQuirks {
    name: "TCS Genie IIIs",
    disk_side_select_bit4: true,
    ..NO_QUIRKS
};

const LNW80: CloneQuirks = CloneQuirks {
    name: "LNW80",
    ..NO_QUIRKS
};

const SPEEDMASTER: CloneQuirks = CloneQuirks {
    name: "TCS SpeedMaster",
    disk_side_select_bit4: true,
    ..NO_QUIRKS
};

pub fn lookup(clone: CloneId) -> &'static CloneQuirks {
    match clone {
        CloneId::None => &NO_QUIRKS,
        CloneId::Cp500 => &CP500,
        CloneId::Cp500M80 => &CP500_M80,
        CloneId::Eg3200 => &EG3200,
        CloneId::Genie3s => &GENIE3S,
        CloneId::Lnw80 => &LNW80,
        CloneId::SpeedMaster => &SPEEDMASTER,
    }
}
