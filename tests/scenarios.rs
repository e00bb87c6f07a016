mod common;

use common::{DISK_BYTE, Event, HRG_BYTE, machine, model, page_rom};
use trs80_bus::banks::{ExpansionCard, GENIE_ROM, GenieKind, MemoryMap, Model1Map, Model4Map};
use trs80_bus::peripherals::DiskReg;
use trs80_bus::io::IoLatches;
use trs80_bus::memory::{Access, Cell, Store};
use trs80_bus::{Bus, CloneId, CloneModel, ExpansionKind, MachineConfig, Model, Speedup};

#[test]
fn model1_ram_round_trip() {
    let mut m = model(Model::One);
    m.write(0x4000, 0x41);
    assert_eq!(m.read(0x4000), 0x41);
    assert_eq!(m.memory().ram(0x4000), 0x41);
}

#[test]
fn selector_banks_the_low_half() {
    let mut m = machine(MachineConfig::new(Model::One).with_expansion(ExpansionKind::Selector));
    m.load_rom(&page_rom()).unwrap();
    assert_eq!(m.read(0x0100), 0x01);

    //mode 1, external RAM in the low half
    m.io_write(0x1f, 0x09);
    assert_eq!(m.banks().map, MemoryMap::Model1(Model1Map::IoHigh));
    assert_eq!(m.raw_cell(0x0000, Access::Read), Some(Cell::new(Store::Ram, 0x10000)));
    m.write(0x0100, 0x77);
    assert_eq!(m.read(0x0100), 0x77);
    assert_eq!(m.memory().ram(0x10100), 0x77);
}

#[test]
fn selector_mode0_keeps_the_rom() {
    let mut m = machine(MachineConfig::new(Model::One).with_expansion(ExpansionKind::Selector));
    m.load_rom(&page_rom()).unwrap();
    //0x3F aliases 0x1F
    m.io_write(0x3f, 0x08);
    assert_eq!(m.read(0x0100), 0x01);
    m.write(0x8000, 0x5a);
    assert_eq!(m.memory().ram(0x10000), 0x5a);
    assert_eq!(m.memory().ram(0x8000), 0x00);
}

#[test]
fn model4_same_address_moves_across_a_map_switch() {
    let mut m = model(Model::Four);
    m.load_rom(&page_rom()).unwrap();
    m.write(0x8000, 0x11);
    //bank command 3: upper 32K from the second 64K
    m.io_write(0x84, 0x30);
    assert_eq!(m.banks().bank_offset[1], 0x10000);
    m.write(0x8000, 0x99);
    assert_eq!(m.read(0x8000), 0x99);
    assert_eq!(m.read(0x0100), 0x01);

    //map 3, bank command 0
    m.io_write(0x84, 0x03);
    assert_eq!(m.banks().map, MemoryMap::Model4(Model4Map::Map3));
    assert_eq!(m.read(0x8000), 0x11);
    assert_eq!(m.read(0x0100), 0x00);
    assert_eq!(m.memory().ram(0x18000), 0x99);
}

#[test]
fn model3_mode_register_fires_every_effect() {
    let mut m = model(Model::Three);
    m.io_write(0xec, 0x06);
    let ev = m.dev.take();
    assert!(ev.contains(&Event::CassetteMotor(true)));
    assert!(ev.contains(&Event::Expanded(true)));
    assert!(ev.contains(&Event::Alternate(true)));
    assert!(ev.contains(&Event::TimerSpeed(0x06)));
    assert_eq!(m.io_latches().modeimage, 0x06);

    m.io_write(0xef, 0x08);
    let ev = m.dev.take();
    assert!(ev.contains(&Event::CassetteMotor(false)));
    assert!(ev.contains(&Event::Expanded(false)));
    assert!(ev.contains(&Event::Alternate(false)));
}

#[test]
fn unassigned_ports_float() {
    for model in [Model::One, Model::Three, Model::Four, Model::FourP] {
        let mut m = common::model(model);
        assert_eq!(m.io_read(0x60), 0xff, "{:?}", model);
        assert_eq!(m.io_read(0x3a), 0xff, "{:?}", model);
        m.io_write(0x60, 0x12);
    }
}

#[test]
fn reads_are_repeatable() {
    let mut m = model(Model::Three);
    m.load_rom(&page_rom()).unwrap();
    m.write(0x5000, 0x42);
    m.write(0x3c10, b'Z');
    for addr in 0..=0xffffu16 {
        assert_eq!(m.read(addr), m.read(addr), "{:04x}", addr);
    }
}

#[test]
fn rom_is_not_writable() {
    let mut m = model(Model::Three);
    m.load_rom(&page_rom()).unwrap();
    m.write(0x0100, 0xaa);
    assert_eq!(m.read(0x0100), 0x01);
    assert_eq!(m.raw_cell(0x0100, Access::Write), None);
    assert_eq!(m.raw_cell(0x0100, Access::Read), Some(Cell::new(Store::Rom, 0x100)));
}

#[test]
fn unmodified_model1_folds_lowercase() {
    let config = MachineConfig { lowercase: false, ..MachineConfig::new(Model::One) };
    let mut m = machine(config);
    //bit 6 is not stored, the gate rebuilds it from bits 7 and 5
    m.write(0x3c00, 0x01);
    assert_eq!(m.read(0x3c00), b'A');
    assert_eq!(m.dev.take(), [Event::ScreenChar(0, b'A')]);
    //no change, no notification
    m.write(0x3c00, 0x41);
    assert!(m.dev.take().is_empty());
    m.write(0x3c01, b'a');
    assert_eq!(m.read(0x3c01), 0x21);
}

#[test]
fn one_expansion_at_a_time() {
    let mut m = machine(MachineConfig::new(Model::Four).with_expansion(ExpansionKind::Huffman));
    assert_eq!(m.io_read(0x94), 1);
    m.io_write(0x94, 3);
    assert_eq!(m.banks().bank_base, 0x30000);

    m.set_expansion(ExpansionKind::HyperMem);
    assert_eq!(m.banks().card, ExpansionCard::HyperMem { bank: 0 });
    assert_eq!(m.banks().bank_base, 0x10000);
    //0x94 belongs to the Huffman card only
    m.io_write(0x94, 5);
    assert_eq!(m.banks().bank_base, 0x10000);
    assert_eq!(m.io_read(0x94), 0xff);
    m.io_write(0x90, 0x04);
    assert_eq!(m.banks().card, ExpansionCard::HyperMem { bank: 4 });
    assert_eq!(m.banks().bank_base, 0x30000);

    //cards the model cannot host are refused
    m.set_expansion(ExpansionKind::SuperMem);
    assert_eq!(m.banks().card, ExpansionCard::None);
}

#[test]
fn supermem_window() {
    let mut m = machine(MachineConfig::new(Model::Three).with_expansion(ExpansionKind::SuperMem));
    m.io_write(0x43, 0x02);
    m.write(0x8001, 0x3c);
    assert_eq!(m.raw_cell(0x8001, Access::Write), Some(Cell::new(Store::SuperMem, 0x10001)));
    assert_eq!(m.read(0x8001), 0x3c);
    assert_eq!(m.io_read(0x43), 0x02);
    //bit 5 moves the window to the low half
    m.io_write(0x43, 0x22);
    assert_eq!(m.read(0x0001), 0x3c);
    assert_eq!(m.io_read(0x43), 0x22);
}

#[test]
fn power_on_reset_restores_defaults() {
    let mut m = model(Model::Four);
    m.io_write(0x84, 0x33);
    m.io_write(0xec, 0x40);
    m.write(0x9000, 0x12);
    m.reset(true);
    assert_eq!(m.banks().map, MemoryMap::Model4(Model4Map::Map0));
    assert_eq!(m.banks().bank_offset, [0, 0]);
    assert_eq!(m.banks().bank_base, 0x10000);
    assert_eq!(*m.io_latches(), IoLatches::default());
    assert_eq!(m.memory().ram(0x19000), 0);
    assert_eq!(m.read(0x9000), 0);
}

#[test]
fn soft_reset_keeps_model3_ram() {
    let mut m = model(Model::Three);
    m.write(0x9000, 0x12);
    m.reset(false);
    assert_eq!(m.read(0x9000), 0x12);
    assert!(m.dev.saw(&Event::TimerSpeed(0)));
}

#[test]
fn model4p_boot_rom_toggle() {
    let mut m = model(Model::FourP);
    m.load_rom(&page_rom()).unwrap();
    assert_eq!(m.io_read(0x9c), 1);
    assert_eq!(m.read(0x0100), 0x01);
    m.io_write(0x9c, 0);
    assert_eq!(m.read(0x0100), 0x00);
    assert_eq!(m.banks().map, MemoryMap::Model4P { map: Model4Map::Map0, rom_in: false });
    //map 0 still drops writes below the keyboard
    m.write(0x0100, 0x66);
    assert_eq!(m.read(0x0100), 0x00);
    m.io_write(0x84, 0x01);
    m.write(0x0100, 0x66);
    assert_eq!(m.read(0x0100), 0x66);
}

#[test]
fn state_round_trip() {
    let config = MachineConfig::new(Model::Four).with_expansion(ExpansionKind::Huffman);
    let mut m = machine(config.clone());
    m.io_write(0x94, 2);
    m.io_write(0x84, 0x31);
    m.write(0x8000, 0xab);
    m.write(0x0010, 0xcd);
    let mut data = Vec::new();
    m.save_state(&mut data).unwrap();

    let mut m2 = machine(config);
    m2.load_state(&data[..]).unwrap();
    assert_eq!(m2.banks().map, m.banks().map);
    assert_eq!(m2.banks().bank_offset, m.banks().bank_offset);
    assert_eq!(m2.banks().bank_base, 0x20000);
    assert_eq!(m2.banks().card, ExpansionCard::Huffman { bank: 2 });
    assert_eq!(m2.io_latches(), m.io_latches());
    assert_eq!(m2.read(0x8000), 0xab);
    assert_eq!(m2.read(0x0010), 0xcd);
    assert_eq!(m2.memory().ram(0x28000), 0xab);

    let mut again = Vec::new();
    m2.save_state(&mut again).unwrap();
    assert!(again == data);
}

#[cfg(feature = "flate2")]
#[test]
fn compressed_state_round_trip() {
    let mut m = model(Model::Three);
    m.write(0x7000, 0x5e);
    let data = m.save_state_compressed().unwrap();
    let mut m2 = model(Model::Three);
    m2.load_state_compressed(&data).unwrap();
    assert_eq!(m2.read(0x7000), 0x5e);
    assert!(m2.load_state_compressed(&data[..data.len() / 2]).is_err());
}

#[test]
fn truncated_state_is_rejected() {
    let mut m = model(Model::One);
    let mut data = Vec::new();
    m.save_state(&mut data).unwrap();
    m.write(0x4000, 1);
    assert!(m.load_state(&data[..data.len() - 1]).is_err());
    assert_eq!(m.read(0x4000), 1);
}

#[test]
fn cp500_mode_switching() {
    let mut m = machine(MachineConfig::new(Model::Three).with_clone(CloneModel::Cp500));
    m.load_rom(&page_rom()).unwrap();
    assert_eq!(m.clone_id(), CloneId::Cp500);
    assert_eq!(m.read(0x0000), 0x00);

    //every read flips A11
    assert_eq!(m.io_read(0x00f4), 0x00);
    assert_eq!(m.read(0x0000), 0x08);
    assert_eq!(m.clone_id(), CloneId::Cp500);

    //flat 64K reveals the M80
    m.io_read(0x1cf4);
    assert_eq!(m.clone_id(), CloneId::Cp500M80);
    assert!(m.quirks().disk_select_ignore_wait);
    m.write(0x0000, 0x55);
    assert_eq!(m.read(0x0000), 0x55);

    m.io_read(0x00f4);
    assert_eq!(m.read(0x0000), 0x08);
    assert_eq!(m.clone_id(), CloneId::Cp500M80);

    //the extra 2K of the EPROM
    m.io_read(0x20f4);
    assert_eq!(m.read(0x3000), 0x38);
}

#[test]
fn cp500_80x24_window() {
    let mut m = machine(MachineConfig::new(Model::Three).with_clone(CloneModel::Cp500));
    m.io_read(0x45f4);
    let ev = m.dev.take();
    assert!(ev.contains(&Event::Mode80x24(true)));
    m.write(0x3c00, b'X');
    assert_eq!(m.memory().video()[1024], b'X');
    assert_eq!(m.dev.take(), [Event::ScreenChar(8 * 80, b'X')]);
    //columns past 80 are stored but not shown
    m.write(0x3c00 + 100, b'Y');
    assert!(m.dev.take().is_empty());
    assert_eq!(m.read(0x3c00 + 100), b'Y');
    assert_eq!(m.read(0x4000), 0x00);
}

#[test]
#[should_panic]
fn cp500_unknown_mode_aborts() {
    let mut m = machine(MachineConfig::new(Model::Three).with_clone(CloneModel::Cp500));
    m.io_read(0x77f4);
}

#[test]
fn rtc_ports() {
    let mut m = model(Model::One);
    assert_eq!(m.io_read(0x68), 0x09);
    assert_eq!(m.io_read(0x69), 0x45);
    assert_eq!(m.io_read(0x6a), 0x17);
    assert_eq!(m.io_read(0x6b), 0x24);
    assert_eq!(m.io_read(0x6c), 0x29);
    assert_eq!(m.io_read(0x6d), 0x03);
    //MSM5832 digits
    assert_eq!(m.io_read(0x70), 9);
    assert_eq!(m.io_read(0x75), 1 | 8);
    assert_eq!(m.io_read(0x76), 5);
    assert_eq!(m.io_read(0xbc), 2);
}

#[test]
fn eg3200_banks() {
    let mut m = machine(MachineConfig::new(Model::One).with_clone(CloneModel::Eg3200));
    m.load_rom(&page_rom()).unwrap();
    assert_eq!(m.banks().card, ExpansionCard::None);

    m.io_write(0xfa, 0x00);
    let ev = m.dev.take();
    assert!(ev.contains(&Event::Percom));
    assert!(ev.contains(&Event::TimerInit));
    assert!(ev.contains(&Event::ScreenInit));
    assert_eq!(m.clone_id(), CloneId::Eg3200);
    assert_eq!(m.read(0x0100), 0x01);

    //a set bit switches the bank out
    m.io_write(0xfa, GENIE_ROM);
    assert_eq!(m.read(0x0100), 0x00);
    m.write(0x0100, 0x33);
    assert_eq!(m.memory().ram(0x0100), 0x33);
    assert_eq!(m.io_read(0xfa), 0x00);

    //clock digits through the register at 0xE0
    m.io_write(0xe0, 0x10);
    assert_eq!(m.io_read(0xe0), 0);
    m.io_write(0xe0, 0x00);
    assert_eq!(m.io_read(0xe0), 9);
}

#[test]
fn bus_words() {
    let mut m = model(Model::Three);
    m.poke_u16(0x5000u16, 0xbeef);
    assert_eq!(m.peek(0x5000u16), 0xef);
    assert_eq!(m.peek_u16(0x5000u16), 0xbeef);
    m.do_out(0xecu16, 0x04);
    assert!(m.dev.saw(&Event::Expanded(true)));
    assert_eq!(m.do_in(0x60u16), 0xff);
}

#[test]
fn model1_system_byte_banking() {
    let config = MachineConfig::new(Model::One).with_speedup(Speedup::Banking);
    let mut m = machine(config);
    m.load_rom(&page_rom()).unwrap();
    m.io_write(0xfe, 0x54);
    assert_eq!(m.banks().map, MemoryMap::Model1(Model1Map::RamHigh));
    assert_eq!(m.io_read(0xfe), 0x54);
    assert_eq!(m.read(0x0100), 0x00);
    m.io_write(0xfe, 0x00);
    assert_eq!(m.read(0x0100), 0x01);
}

#[test]
fn removing_the_selector_undoes_its_banking() {
    let mut m = machine(MachineConfig::new(Model::One).with_expansion(ExpansionKind::Selector));
    m.io_write(0x1f, 0x08);
    assert_eq!(m.raw_cell(0x8000, Access::Write), Some(Cell::new(Store::Ram, 0x10000)));
    m.set_expansion(ExpansionKind::None);
    assert_eq!(m.banks().card, ExpansionCard::None);
    assert_eq!(m.banks().bank_base, 0);
    assert_eq!(m.raw_cell(0x8000, Access::Write), Some(Cell::new(Store::Ram, 0x8000)));
}

#[test]
fn supermem_replaces_the_selector_map() {
    let mut m = machine(MachineConfig::new(Model::One).with_expansion(ExpansionKind::Selector));
    m.io_write(0x1f, 0x07);
    assert_eq!(m.read(0x4000), 0xff);
    m.set_expansion(ExpansionKind::SuperMem);
    assert_eq!(m.banks().map, MemoryMap::Model1(Model1Map::Stock));
    m.write(0x4000, 0x41);
    assert_eq!(m.read(0x4000), 0x41);
    assert_eq!(m.memory().ram(0x4000), 0x41);
}

#[test]
fn removing_huffman_restores_the_second_64k() {
    let mut m = machine(MachineConfig::new(Model::Four).with_expansion(ExpansionKind::Huffman));
    m.io_write(0x94, 0x05);
    assert_eq!(m.banks().bank_base, 0x50000);
    m.set_expansion(ExpansionKind::None);
    assert_eq!(m.banks().bank_base, 0x10000);
    m.io_write(0x84, 0x30);
    assert_eq!(m.banks().bank_offset, [0, 0x10000]);
}

#[test]
fn cp500_refuses_memory_cards() {
    let config = MachineConfig::new(Model::Three)
        .with_clone(CloneModel::Cp500)
        .with_expansion(ExpansionKind::SuperMem);
    let mut m = machine(config);
    assert_eq!(m.config().expansion, ExpansionKind::None);
    assert!(matches!(m.banks().card, ExpansionCard::Cp500 { .. }));
    m.io_write(0x43, 0x02);
    assert_eq!(m.io_read(0x43), 0xff);

    //nor can one be plugged later
    m.set_expansion(ExpansionKind::SuperMem);
    assert_eq!(m.config().expansion, ExpansionKind::None);
    assert!(matches!(m.banks().card, ExpansionCard::Cp500 { .. }));
    m.io_read(0x1cf4);
    assert_eq!(m.clone_id(), CloneId::Cp500M80);
}

#[test]
fn state_from_another_model_is_rejected() {
    let mut m4 = model(Model::Four);
    m4.io_write(0x84, 0x03);
    let mut data = Vec::new();
    m4.save_state(&mut data).unwrap();

    let mut m1 = model(Model::One);
    m1.write(0x4000, 0x21);
    assert!(m1.load_state(&data[..]).is_err());
    assert_eq!(m1.banks().map, MemoryMap::Model1(Model1Map::Stock));
    assert_eq!(m1.read(0x4000), 0x21);

    //a 4P is not a 4 either
    let mut m4p = model(Model::FourP);
    assert!(m4p.load_state(&data[..]).is_err());
    let mut m4b = model(Model::Four);
    m4b.load_state(&data[..]).unwrap();
    assert_eq!(m4b.banks().map, MemoryMap::Model4(Model4Map::Map3));
}

#[test]
fn genie3s_ports() {
    let mut m = machine(MachineConfig::new(Model::One).with_clone(CloneModel::Genie3s));
    m.load_rom(&page_rom()).unwrap();

    m.io_write(0xf9, 0x00);
    assert!(m.dev.take().contains(&Event::Percom));
    assert_eq!(m.banks().card, ExpansionCard::Genie { kind: GenieKind::Genie3s, mask: 0 });
    assert_eq!(m.clone_id(), CloneId::Genie3s);
    assert_eq!(m.io_read(0xf9), 0x00);
    assert_eq!(m.read(0x0100), 0x01);

    m.io_write(0xf9, GENIE_ROM);
    assert_eq!(m.io_read(0xf9), GENIE_ROM);
    assert_eq!(m.read(0x0100), 0x00);

    //0xFA is the system byte here, not the bank register
    m.io_write(0xfa, 0x42);
    assert_eq!(m.io_read(0xfa), 0x42);
    assert_eq!(m.io_read(0xf9), GENIE_ROM);

    //clock digit selected through 0x5B
    m.io_write(0x5b, 0x30);
    assert_eq!(m.io_read(0x5a), 4);
    m.io_write(0x5b, 0x40);
    assert_eq!(m.io_read(0x5a), 7);

    m.io_write(0xed, 0x12);
    m.io_write(0xe8, 0x41);
    assert_eq!(m.dev.take(), [Event::Disk(DiskReg::Track, 0x12), Event::Printer(0x41)]);
    assert_eq!(m.io_read(0xec), DISK_BYTE);
}

#[test]
fn hrg_map_routes_the_low_16k() {
    let config = MachineConfig::new(Model::One).with_speedup(Speedup::Lnw80);
    let mut m = machine(config);
    m.load_rom(&page_rom()).unwrap();

    m.io_write(0xfe, 0x0a);
    assert_eq!(m.banks().map, MemoryMap::Model1(Model1Map::Hrg));
    assert_eq!(m.dev.take(), [Event::Hrg(true)]);
    assert_eq!(m.read(0x0100), HRG_BYTE);
    assert_eq!(m.raw_cell(0x0100, Access::Read), None);
    m.write(0x1234, 0x55);
    assert_eq!(m.dev.take(), [Event::HrgAddr(0x1234, 0x3fff), Event::HrgData(0x55)]);
    m.write(0x4000, 0x66);
    assert_eq!(m.read(0x4000), 0x66);

    m.io_write(0xfe, 0x00);
    assert_eq!(m.dev.take(), [Event::Hrg(false)]);
    assert_eq!(m.read(0x0100), 0x01);
}

#[test]
fn model1_6845_ports() {
    let mut m = model(Model::One);
    m.io_write(0x10, 0x01);
    m.io_write(0x11, 64);
    assert_eq!(m.dev.take(), [Event::CrtcScreen(64, 0, 0)]);

    m.io_write(0xd0, 0x0a);
    m.io_write(0xd1, 0x00);
    assert_eq!(m.dev.take(), [Event::CrtcCursor(0, 0, true)]);
    m.io_write(0xd0, 0x0e);
    m.io_write(0xd1, 0x01);
    m.io_write(0x10, 0x0f);
    m.io_write(0x11, 0x23);
    assert_eq!(m.dev.take(), [Event::CrtcCursor(0, 0, false), Event::CrtcCursor(0x123, 0, true)]);
    assert_eq!(m.crtc().cursor_pos, 0x123);

    //the SpeedMaster system byte lives on these kits' ports
    let mut m = machine(MachineConfig::new(Model::One).with_speedup(Speedup::SpeedMaster));
    m.io_write(0x10, 0x01);
    m.io_write(0x11, 64);
    assert!(m.dev.take().is_empty());
}
