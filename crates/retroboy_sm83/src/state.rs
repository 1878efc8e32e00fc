use crate::regs::Registers;

/// Post-boot-ROM program counter: the cartridge entry point.
pub const ENTRY_POINT: u16 = 0x0100;
/// Post-boot-ROM stack pointer.
pub const INITIAL_SP: u16 = 0xFFFE;

/// Everything an instruction may read or mutate besides the bus.
///
/// Instructions receive this by `&mut` on every machine cycle; nothing
/// about the CPU lives in globals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CpuState {
    pub regs: Registers,
    pub pc: u16,
    pub sp: u16,
    /// Interrupt master enable.
    pub ime: bool,
    /// Set by EI. The driver promotes it to `ime` at the start of the next
    /// machine cycle, so interrupts become visible one instruction later.
    pub ime_scheduled: bool,
    pub halted: bool,
    pub stopped: bool,
    /// Set by the 0xCB escape; the next opcode is decoded from the
    /// prefixed table.
    pub prefixed: bool,
}

impl Default for CpuState {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuState {
    pub fn new() -> Self {
        let mut state = Self {
            regs: Registers::default(),
            pc: 0,
            sp: 0,
            ime: false,
            halted: false,
            stopped: false,
            ime_scheduled: false,
            prefixed: false,
        };
        state.reset();
        state
    }

    /// Reset to the state the DMG boot ROM hands to cartridge code.
    ///
    /// IME is clear at 0x0100; the game enables interrupts itself.
    pub fn reset(&mut self) {
        self.regs.reset();
        self.pc = ENTRY_POINT;
        self.sp = INITIAL_SP;
        self.ime = false;
        self.ime_scheduled = false;
        self.halted = false;
        self.stopped = false;
        self.prefixed = false;
    }

    /// Read the byte at PC and advance PC.
    #[inline]
    pub(crate) fn fetch8<B: crate::Bus>(&mut self, bus: &mut B) -> u8 {
        let value = bus.read8(self.pc);
        self.pc = self.pc.wrapping_add(1);
        value
    }
}
