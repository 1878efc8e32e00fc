use bitflags::bitflags;

bitflags! {
    /// Flag bits in the F register.
    ///
    /// Layout (bit index in the byte, from MSB to LSB):
    /// - bit 7: Z (zero)
    /// - bit 6: N (subtract)
    /// - bit 5: H (half carry)
    /// - bit 4: C (carry)
    /// - bits 0–3 are always zero.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Flags: u8 {
        const ZERO = 0b1000_0000;
        const SUBTRACT = 0b0100_0000;
        const HALF_CARRY = 0b0010_0000;
        const CARRY = 0b0001_0000;
    }
}

/// Operand index of the `(HL)` slot in the 3-bit register encoding.
pub const HL_INDEX: u8 = 6;

/// General purpose registers of the SM83.
///
/// Only the eight 8-bit cells are stored; the 16-bit pairs are views over
/// them. F is kept as [`Flags`], which makes the "low nibble is zero"
/// invariant a property of the type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub f: Flags,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
}

impl Registers {
    /// Register values left behind by the DMG boot ROM.
    pub fn post_boot() -> Self {
        let mut regs = Self::default();
        regs.reset();
        regs
    }

    /// Load the post-boot-ROM values (A=01 F=B0 BC=0013 DE=00D8 HL=014D).
    pub fn reset(&mut self) {
        self.a = 0x01;
        self.f = Flags::ZERO | Flags::HALF_CARRY | Flags::CARRY;
        self.b = 0x00;
        self.c = 0x13;
        self.d = 0x00;
        self.e = 0xD8;
        self.h = 0x01;
        self.l = 0x4D;
    }

    #[inline]
    pub fn f(&self) -> u8 {
        self.f.bits()
    }

    #[inline]
    pub fn set_f(&mut self, value: u8) {
        self.f = Flags::from_bits_truncate(value);
    }

    #[inline]
    pub fn af(&self) -> u16 {
        u16::from_be_bytes([self.a, self.f()])
    }

    #[inline]
    pub fn set_af(&mut self, value: u16) {
        let [a, f] = value.to_be_bytes();
        self.a = a;
        self.set_f(f);
    }

    #[inline]
    pub fn bc(&self) -> u16 {
        u16::from_be_bytes([self.b, self.c])
    }

    #[inline]
    pub fn set_bc(&mut self, value: u16) {
        let [b, c] = value.to_be_bytes();
        self.b = b;
        self.c = c;
    }

    #[inline]
    pub fn de(&self) -> u16 {
        u16::from_be_bytes([self.d, self.e])
    }

    #[inline]
    pub fn set_de(&mut self, value: u16) {
        let [d, e] = value.to_be_bytes();
        self.d = d;
        self.e = e;
    }

    #[inline]
    pub fn hl(&self) -> u16 {
        u16::from_be_bytes([self.h, self.l])
    }

    #[inline]
    pub fn set_hl(&mut self, value: u16) {
        let [h, l] = value.to_be_bytes();
        self.h = h;
        self.l = l;
    }

    /// Read a register by its 3-bit opcode index.
    ///
    /// The encoding matches the opcode tables:
    /// 0=B, 1=C, 2=D, 3=E, 4=H, 5=L, 6=HL (the pair, not memory), 7=A.
    ///
    /// # Panics
    ///
    /// Panics if `index > 7`; only a broken decoder can produce one.
    pub fn get(&self, index: u8) -> u16 {
        match index {
            0 => self.b as u16,
            1 => self.c as u16,
            2 => self.d as u16,
            3 => self.e as u16,
            4 => self.h as u16,
            5 => self.l as u16,
            HL_INDEX => self.hl(),
            7 => self.a as u16,
            _ => panic!("SM83 has no register with index {index}"),
        }
    }

    /// Write a register by its 3-bit opcode index. See [`Registers::get`].
    ///
    /// Single registers take the low byte of `value`; index 6 writes the
    /// whole HL pair.
    pub fn set(&mut self, index: u8, value: u16) {
        match index {
            0 => self.b = value as u8,
            1 => self.c = value as u8,
            2 => self.d = value as u8,
            3 => self.e = value as u8,
            4 => self.h = value as u8,
            5 => self.l = value as u8,
            HL_INDEX => self.set_hl(value),
            7 => self.a = value as u8,
            _ => panic!("SM83 has no register with index {index}"),
        }
    }

    /// 8-bit view of [`Registers::get`] for operands known to be single
    /// registers.
    #[inline]
    pub(crate) fn reg8(&self, index: u8) -> u8 {
        debug_assert_ne!(index, HL_INDEX, "(HL) is not an 8-bit register");
        self.get(index) as u8
    }

    #[inline]
    pub(crate) fn set_reg8(&mut self, index: u8, value: u8) {
        debug_assert_ne!(index, HL_INDEX, "(HL) is not an 8-bit register");
        self.set(index, value as u16);
    }

    #[inline]
    pub fn zero(&self) -> bool {
        self.f.contains(Flags::ZERO)
    }

    #[inline]
    pub fn set_zero(&mut self, value: bool) {
        self.f.set(Flags::ZERO, value);
    }

    #[inline]
    pub fn subtract(&self) -> bool {
        self.f.contains(Flags::SUBTRACT)
    }

    #[inline]
    pub fn set_subtract(&mut self, value: bool) {
        self.f.set(Flags::SUBTRACT, value);
    }

    #[inline]
    pub fn half_carry(&self) -> bool {
        self.f.contains(Flags::HALF_CARRY)
    }

    #[inline]
    pub fn set_half_carry(&mut self, value: bool) {
        self.f.set(Flags::HALF_CARRY, value);
    }

    #[inline]
    pub fn carry(&self) -> bool {
        self.f.contains(Flags::CARRY)
    }

    #[inline]
    pub fn set_carry(&mut self, value: bool) {
        self.f.set(Flags::CARRY, value);
    }

    /// Replace all four flags at once.
    #[inline]
    pub(crate) fn set_flags(&mut self, zero: bool, subtract: bool, half_carry: bool, carry: bool) {
        let mut f = Flags::empty();
        f.set(Flags::ZERO, zero);
        f.set(Flags::SUBTRACT, subtract);
        f.set(Flags::HALF_CARRY, half_carry);
        f.set(Flags::CARRY, carry);
        self.f = f;
    }
}
