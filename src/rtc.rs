//Clock cards. They are read only: the time always comes from the host.

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::banks::GenieKind;

/// Whether a read of `port` is answered by a clock card.
pub fn claims(port: u8, genie: Option<GenieKind>) -> bool {
    matches!(port, 0x70..=0x7c | 0x68..=0x6d | 0xb0..=0xbc)
        || (port == 0xe0 && genie == Some(GenieKind::Eg3200))
        || (port == 0x5a && genie == Some(GenieKind::Genie3s))
}

fn bcd(v: u32) -> u8 {
    (v / 10 * 16 + v % 10) as u8
}

/// Value of a clock port. The Genie cards select the digit through `rtc_reg`
/// bits 7-4 instead of the port number.
pub fn read(port: u8, genie: Option<GenieKind>, rtc_reg: u8, now: &NaiveDateTime) -> u8 {
    let sec = now.second();
    let min = now.minute();
    let hour = now.hour();
    let mday = now.day();
    let mon = now.month();
    //years since 1900, as the MSM5832 software expects
    let tm_year = (now.year() - 1900).max(0) as u32;

    //two digit BCD fields, one per port
    if (0x68..=0x6d).contains(&port) {
        return match port {
            0x68 => bcd(sec),
            0x69 => bcd(min),
            0x6a => bcd(hour),
            0x6b => bcd((tm_year + 1900) % 100),
            0x6c => bcd(mday),
            _ => bcd(mon),
        };
    }

    let digit = if genie.is_some() { rtc_reg >> 4 } else { port & 0x0f };
    let v = match digit {
        0xc => tm_year / 10 % 10,
        0xb => tm_year % 10,
        0xa => mon / 10,
        0x9 => mon % 10,
        //bit 2 is the leap year flag
        0x8 => mday / 10 | if tm_year % 4 == 0 { 4 } else { 0 },
        0x7 => mday % 10,
        0x6 => now.weekday().num_days_from_sunday(),
        //bit 3 is the 24 hour flag
        0x5 => hour / 10 | 8,
        0x4 => hour % 10,
        0x3 => min / 10,
        0x2 => min % 10,
        0x1 => sec / 10,
        0x0 => sec % 10,
        _ => 0xff,
    };
    v as u8
}
