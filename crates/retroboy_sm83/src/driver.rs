
use crate::decode::{decode, decode_prefixed};
use crate::error::CpuError;
use crate::instr::{Instruction, InstructionKind};
use crate::{Bus, CpuState};

/// The SM83 driven one machine cycle at a time.
///
/// The core keeps the instruction currently in flight. Each call to
/// [`CpuCore::advance_machine_cycle`] runs one of its cycles; when the last
/// one has run, the next opcode is fetched and decoded within the same
/// call, which models the fetch/execute overlap of the real CPU.
#[derive(Clone, Debug)]
pub struct CpuCore {
    state: CpuState,
    current: Instruction,
    /// Set by a decode failure. A locked core refuses to advance until it
    /// is reset, like the real chip after an opcode hole.
    fault: Option<CpuError>,
}

impl CpuCore {
    /// Power on: post-boot state at 0x0100 and the first opcode fetched.
    pub fn new<B: Bus>(bus: &mut B) -> Result<Self, CpuError> {
        Self::from_state(CpuState::new(), bus)
    }

    /// Resume from an explicit state. The first opcode is fetched from
    /// `state.pc`, honouring `state.prefixed`.
    pub fn from_state<B: Bus>(state: CpuState, bus: &mut B) -> Result<Self, CpuError> {
        let mut core = Self {
            state,
            current: Instruction::new(0x00, InstructionKind::Nop),
            fault: None,
        };
        core.load_next_instruction(bus)?;
        Ok(core)
    }

    /// Return to the post-boot state and fetch the first opcode again.
    /// Clears a previous decode failure.
    pub fn reset<B: Bus>(&mut self, bus: &mut B) -> Result<(), CpuError> {
        self.state.reset();
        self.fault = None;
        log::debug!("SM83 reset, PC=0x{:04X} SP=0x{:04X}", self.state.pc, self.state.sp);
        self.load_next_instruction(bus)
    }

    /// Run one machine cycle of the current instruction, then fetch the
    /// next one if it has finished.
    pub fn advance_machine_cycle<B: Bus>(&mut self, bus: &mut B) -> Result<(), CpuError> {
        if let Some(err) = self.fault {
            return Err(err);
        }

        // EI takes effect one cycle late.
        if self.state.ime_scheduled {
            self.state.ime_scheduled = false;
            self.state.ime = true;
        }

        self.current.execute_cycle(&mut self.state, bus);

        if self.current.is_fetch_necessary() {
            self.load_next_instruction(bus)?;
        }
        Ok(())
    }

    #[inline]
    pub fn state(&self) -> &CpuState {
        &self.state
    }

    /// The instruction in flight (already fetched, possibly partly run).
    #[inline]
    pub fn current_instruction(&self) -> &Instruction {
        &self.current
    }

    /// The decode failure that locked the core, if any.
    #[inline]
    pub fn fault(&self) -> Option<CpuError> {
        self.fault
    }

    fn load_next_instruction<B: Bus>(&mut self, bus: &mut B) -> Result<(), CpuError> {
        // Interrupt dispatch hooks in here, before the opcode read: with IME
        // set and a request pending it would start the dispatch sequence
        // instead of fetching. It must not fire between 0xCB and the byte
        // it escapes, so it belongs under `!self.state.prefixed`.

        let pc = self.state.pc;
        let opcode = self.state.fetch8(bus);

        let decoded = if self.state.prefixed {
            self.state.prefixed = false;
            Ok(decode_prefixed(opcode))
        } else {
            decode(opcode)
        };

        match decoded {
            Ok(instr) => {
                log::trace!("{pc:04X}: {instr}");
                self.current = instr;
                Ok(())
            }
            Err(err) => {
                let regs = &self.state.regs;
                log::error!(
                    "SM83 locked: invalid opcode 0x{opcode:02X} at PC=0x{pc:04X} (SP=0x{sp:04X} AF=0x{af:04X} BC=0x{bc:04X} DE=0x{de:04X} HL=0x{hl:04X})",
                    sp = self.state.sp,
                    af = regs.af(),
                    bc = regs.bc(),
                    de = regs.de(),
                    hl = regs.hl(),
                );
                let err = CpuError::at(err, pc);
                self.fault = Some(err);
                Err(err)
            }
        }
    }
}
