//Machine configuration: which model, which clone, which memory card.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Model {
    One,
    Three,
    Four,
    FourP,
}

impl Model {
    //The number the machine family is usually known by (4P is 5)
    pub fn number(self) -> u8 {
        match self {
            Model::One => 1,
            Model::Three => 3,
            Model::Four => 4,
            Model::FourP => 5,
        }
    }
    pub fn from_number(n: u8) -> Option<Model> {
        match n {
            1 => Some(Model::One),
            3 => Some(Model::Three),
            4 => Some(Model::Four),
            5 => Some(Model::FourP),
            _ => None,
        }
    }
    pub fn is_model4(self) -> bool {
        matches!(self, Model::Four | Model::FourP)
    }
    //Physical offset of the alternate bank with no card answering
    pub fn default_bank_base(self) -> u32 {
        if self == Model::One { 0 } else { 0x10000 }
    }
}

/// Third party machines that run on top of a stock model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneModel {
    /// Prologica CP-500 (Model III compatible), including the M80 variant
    Cp500,
    /// EACA EG 3200 Genie III (Model I compatible)
    Eg3200,
    /// TCS Genie IIIs (Model I compatible)
    Genie3s,
    /// LNW Research LNW80 (Model I compatible)
    Lnw80,
    /// TCS Genie IIs / SpeedMaster (Model I compatible)
    SpeedMaster,
}

impl CloneModel {
    //These clones bring their own bank registers in place of a memory card
    pub fn has_banking(self) -> bool {
        matches!(self, CloneModel::Cp500 | CloneModel::Eg3200 | CloneModel::Genie3s)
    }
}

/// Memory expansion installed in the machine.
/// Only one of them can be plugged at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionKind {
    None,
    /// Model I memory selector on ports 0x1F/0x3F
    Selector,
    /// Dave Huffman style 2MB expansion on port 0x94 (4/4P)
    Huffman,
    /// Anitek HyperMem on port 0x90 (4/4P)
    HyperMem,
    /// Alpha Technology SuperMem on port 0x43 (I/III)
    SuperMem,
}

/// Model I clock speed-up and banking kits answering on port 0xFE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Speedup {
    None = 0,
    Archbold = 1,
    Holmes = 2,
    Seatronics = 3,
    Banking = 4,
    Lnw80 = 5,
    SpeedMaster = 6,
}

impl Speedup {
    //Kits 4 and above replace the speed register with a system byte
    pub fn has_system_byte(self) -> bool {
        self >= Speedup::Banking
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineConfig {
    pub model: Model,
    pub clone: Option<CloneModel>,
    pub expansion: ExpansionKind,
    pub speedup: Speedup,
    /// Model I lowercase modification installed
    pub lowercase: bool,
    /// Log every IN/OUT at debug level
    pub io_trace: bool,
}

impl Default for MachineConfig {
    fn default() -> Self {
        MachineConfig {
            model: Model::One,
            clone: None,
            expansion: ExpansionKind::None,
            speedup: Speedup::None,
            lowercase: true,
            io_trace: false,
        }
    }
}

impl MachineConfig {
    pub fn new(model: Model) -> Self {
        MachineConfig { model, ..Default::default() }
    }
    pub fn with_clone(mut self, clone: CloneModel) -> Self {
        self.clone = Some(clone);
        self
    }
    pub fn with_expansion(mut self, expansion: ExpansionKind) -> Self {
        self.expansion = expansion;
        self
    }
    pub fn with_speedup(mut self, speedup: Speedup) -> Self {
        self.speedup = speedup;
        self
    }
    //Cards that the selected model cannot host are dropped with a warning
    pub fn sanitized(mut self) -> Self {
        let ok = match self.expansion {
            ExpansionKind::None => true,
            ExpansionKind::Selector => self.model == Model::One,
            ExpansionKind::Huffman | ExpansionKind::HyperMem => self.model.is_model4(),
            ExpansionKind::SuperMem => !self.model.is_model4(),
        };
        if !ok {
            log::warn!("{:?} is not available on {:?}, ignoring it", self.expansion, self.model);
            self.expansion = ExpansionKind::None;
        }
        let clone_ok = match self.clone {
            None => true,
            Some(CloneModel::Cp500) => self.model == Model::Three,
            Some(_) => self.model == Model::One,
        };
        if !clone_ok {
            log::warn!("{:?} is not a {:?} clone, ignoring it", self.clone, self.model);
            self.clone = None;
        }
        if self.clone.is_some_and(CloneModel::has_banking) && self.expansion != ExpansionKind::None {
            log::warn!("{:?} cannot be used with the {:?}, ignoring it", self.expansion, self.clone);
            self.expansion = ExpansionKind::None;
        }
        self
    }
}
