/// Abstraction over the Game Boy bus (memory and IO).
///
/// This is the whole contract the core needs: byte reads and writes in a
/// 16-bit address space. Routing to peripherals and backing storage is the
/// implementor's business. Reads of addresses nothing has written must
/// return a value (0 for plain memory) rather than fail.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);
}

impl<B: Bus + ?Sized> Bus for &mut B {
    #[inline]
    fn read8(&mut self, addr: u16) -> u8 {
        (**self).read8(addr)
    }

    #[inline]
    fn write8(&mut self, addr: u16, value: u8) {
        (**self).write8(addr, value)
    }
}
