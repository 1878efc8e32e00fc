use std::fmt;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use retroboy_memory::MainMemory;
use retroboy_sm83::{CpuCore, CpuError, TICKS_PER_MACHINE_CYCLE};
use typed_builder::TypedBuilder;

/// DMG master clock.
pub const CLOCK_RATE_HZ: u64 = 4_194_304;
/// Machine cycles per second on real hardware.
pub const MACHINE_CYCLE_RATE_HZ: u64 = CLOCK_RATE_HZ / TICKS_PER_MACHINE_CYCLE as u64;
/// Machine cycles in one 59.7 Hz video frame (154 lines of 114 cycles).
pub const MACHINE_CYCLES_PER_FRAME: u64 = 17_556;
pub const DEFAULT_FRAMES: u64 = 60;

#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder)]
pub struct RunConfig {
    /// Run budget, in video frames' worth of machine cycles.
    #[builder(default = DEFAULT_FRAMES)]
    pub frames: u64,
    /// End the run as soon as the CPU enters HALT or STOP. With nothing
    /// raising interrupts yet, it would never leave either.
    #[builder(default = true)]
    pub stop_on_halt: bool,
    /// Where the cartridge image is placed in the address space.
    #[builder(default = 0x0000)]
    pub load_address: u16,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// CPU plus the memory it runs against.
#[derive(Debug)]
pub struct Machine {
    pub cpu: CpuCore,
    pub memory: MainMemory,
}

impl Machine {
    pub fn new(rom: &[u8], config: &RunConfig) -> Result<Self> {
        let mut memory = MainMemory::new();
        memory
            .load(config.load_address, rom)
            .context("failed to load ROM image")?;
        let cpu = CpuCore::new(&mut memory).context("failed to fetch the first opcode")?;
        Ok(Self { cpu, memory })
    }

    /// Step the machine by one machine cycle. The CPU goes first;
    /// peripherals (DMA, timer, PPU) follow it in that order once they
    /// exist.
    pub fn advance_machine_cycle(&mut self) -> Result<(), CpuError> {
        self.cpu.advance_machine_cycle(&mut self.memory)
    }

    /// CPU is in HALT or STOP.
    pub fn is_idle(&self) -> bool {
        let state = self.cpu.state();
        state.halted || state.stopped
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunReport {
    pub machine_cycles: u64,
    pub elapsed: Duration,
    /// The run ended before its budget because the CPU went idle.
    pub stopped_early: bool,
}

impl RunReport {
    /// Time the executed cycles take on real hardware.
    pub fn emulated(&self) -> Duration {
        Duration::from_secs_f64(self.machine_cycles as f64 / MACHINE_CYCLE_RATE_HZ as f64)
    }

    /// Emulation speed relative to real hardware, in percent.
    pub fn speed_percent(&self) -> f64 {
        let elapsed = self.elapsed.as_secs_f64();
        if elapsed == 0.0 {
            return f64::INFINITY;
        }
        self.emulated().as_secs_f64() / elapsed * 100.0
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} machine cycles in {:.2?} ({:.1}% of real hardware speed)",
            self.machine_cycles,
            self.elapsed,
            self.speed_percent()
        )
    }
}

/// Free-run `rom` for `config.frames` frames' worth of machine cycles
/// without pacing, and report how fast that went.
pub fn run(config: &RunConfig, rom: &[u8]) -> Result<RunReport> {
    let budget = config
        .frames
        .checked_mul(MACHINE_CYCLES_PER_FRAME)
        .with_context(|| format!("frame count {} is too large", config.frames))?;
    let mut machine = Machine::new(rom, config)?;
    log::info!(
        "Running {} bytes at 0x{:04X} for {} frames ({budget} machine cycles)",
        rom.len(),
        config.load_address,
        config.frames
    );

    let start = Instant::now();
    let mut machine_cycles = 0;
    let mut stopped_early = false;
    while machine_cycles < budget {
        machine
            .advance_machine_cycle()
            .with_context(|| format!("CPU failed after {machine_cycles} machine cycles"))?;
        machine_cycles += 1;

        if config.stop_on_halt && machine.is_idle() {
            let state = machine.cpu.state();
            log::warn!(
                "CPU went idle at PC=0x{:04X} (halted={}, stopped={}) after {machine_cycles} machine cycles",
                state.pc,
                state.halted,
                state.stopped
            );
            stopped_early = true;
            break;
        }
    }

    let report = RunReport {
        machine_cycles,
        elapsed: start.elapsed(),
        stopped_early,
    };
    log::info!("{report}");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rom_with(program: &[u8]) -> Vec<u8> {
        let mut rom = vec![0; 0x8000];
        rom[0x0100..0x0100 + program.len()].copy_from_slice(program);
        rom
    }

    #[test]
    fn config_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.frames, 60);
        assert!(config.stop_on_halt);
        assert_eq!(config.load_address, 0x0000);

        let config = RunConfig::builder().frames(2).stop_on_halt(false).build();
        assert_eq!(config.frames, 2);
        assert!(!config.stop_on_halt);
    }

    #[test]
    fn machine_cycle_rate() {
        assert_eq!(MACHINE_CYCLE_RATE_HZ, 1_048_576);
    }

    #[test]
    fn tight_loop_uses_the_whole_budget() {
        // JP 0x0100
        let rom = rom_with(&[0xC3, 0x00, 0x01]);
        let config = RunConfig::builder().frames(1).build();
        let report = run(&config, &rom).unwrap();
        assert_eq!(report.machine_cycles, MACHINE_CYCLES_PER_FRAME);
        assert!(!report.stopped_early);
    }

    #[test]
    fn halt_ends_the_run_early() {
        let rom = rom_with(&[0x00, 0x00, 0x76]);
        let config = RunConfig::builder().frames(1).build();
        let report = run(&config, &rom).unwrap();
        assert_eq!(report.machine_cycles, 3);
        assert!(report.stopped_early);

        let config = RunConfig::builder().frames(1).stop_on_halt(false).build();
        let report = run(&config, &rom).unwrap();
        assert_eq!(report.machine_cycles, MACHINE_CYCLES_PER_FRAME);
    }

    #[test]
    fn unknown_opcode_aborts_the_run() {
        let rom = rom_with(&[0x00, 0xEC]);
        let err = run(&RunConfig::default(), &rom).unwrap_err();
        let cpu_err = err.downcast_ref::<CpuError>().unwrap();
        assert_eq!(
            *cpu_err,
            CpuError::UnknownOpcode {
                opcode: 0xEC,
                pc: 0x0101
            }
        );
    }

    #[test]
    fn huge_frame_count_is_an_error() {
        let rom = rom_with(&[0x18, 0xFE]);
        let config = RunConfig::builder().frames(u64::MAX).build();
        let err = run(&config, &rom).unwrap_err();
        assert!(err.to_string().contains("too large"), "{err}");
    }

    #[test]
    fn oversized_rom_is_rejected() {
        let config = RunConfig::builder().load_address(0xC000).build();
        assert!(Machine::new(&[0; 0x8000], &config).is_err());
    }

    #[test]
    fn report_speed() {
        let report = RunReport {
            machine_cycles: MACHINE_CYCLE_RATE_HZ,
            elapsed: Duration::from_millis(500),
            stopped_early: false,
        };
        assert_eq!(report.emulated(), Duration::from_secs(1));
        assert!((report.speed_percent() - 200.0).abs() < 1e-9);
    }
}
