//The seam between the Z80 interpreter (or the debugger) and the machine.
//Reads take `&mut self` because several memory and port reads have side effects.

pub trait Bus {
    fn peek(&mut self, addr: impl Into<u16>) -> u8;
    fn poke(&mut self, addr: impl Into<u16>, value: u8);
    fn do_in(&mut self, port: impl Into<u16>) -> u8;
    fn do_out(&mut self, port: impl Into<u16>, value: u8);

    fn peek_u16(&mut self, addr: impl Into<u16>) -> u16 {
        let addr = addr.into();
        let lo = self.peek(addr) as u16;
        let addr = addr.wrapping_add(1);
        let hi = self.peek(addr) as u16;
        (hi << 8) | lo
    }
    fn poke_u16(&mut self, addr: impl Into<u16>, data: u16) {
        let addr = addr.into();
        self.poke(addr, data as u8);
        let addr = addr.wrapping_add(1);
        self.poke(addr, (data >> 8) as u8);
    }
}
