use mipsim_core::common::{AccessSize, Exception, PhysAddr};
use mipsim_core::config::{Config, LoadPolicy, TranslationMode};
use mipsim_core::core::cpu::StopReason;
use mipsim_core::core::units::mmu::entry::TranslationEntry;
use mipsim_core::core::units::mmu::page_table::PageTable;
use mipsim_core::sim::{Kernel, image_from_bytes};
use mipsim_core::Machine;

/// Installs a `tracing` subscriber that writes through the test harness.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// A machine whose page table maps every virtual page to the frame of the
/// same number, for exercising the execution engine without a kernel.
pub struct TestContext {
    pub machine: Machine,
    pub table: PageTable,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        init_tracing();
        let mut machine = Machine::new(config).expect("valid config");
        let frames = config.memory.num_phys_pages;
        let table = PageTable::new(frames);
        for vpn in 0..frames {
            table.set(vpn, TranslationEntry::mapped(vpn, vpn));
        }
        machine.mmu.page_table = Some(table.clone());
        Self { machine, table }
    }

    /// Writes `instructions` at `addr` and points `PC` at the first one.
    pub fn load_program(mut self, addr: u32, instructions: &[u32]) -> Self {
        for (i, inst) in instructions.iter().enumerate() {
            self.write_word(addr + 4 * i as u32, *inst);
        }
        self.machine.regs.set_pcs(0, addr, addr + 4);
        self
    }

    pub fn write_word(&mut self, addr: u32, value: u32) {
        self.machine
            .memory
            .write(PhysAddr::new(addr), AccessSize::Word, value);
    }

    pub fn read_word(&self, addr: u32) -> u32 {
        self.machine.memory.read(PhysAddr::new(addr), AccessSize::Word)
    }

    pub fn set_reg(&mut self, reg: usize, val: u32) {
        self.machine.write_register(reg, val);
    }

    pub fn get_reg(&self, reg: usize) -> u32 {
        self.machine.read_register(reg)
    }

    pub fn pc(&self) -> u32 {
        self.machine.regs.pc()
    }

    pub fn step(&mut self) -> Result<(), Exception> {
        self.machine.one_instruction()
    }

    /// Steps `n` instructions, panicking on any exception.
    pub fn run(&mut self, n: usize) {
        for i in 0..n {
            if let Err(e) = self.step() {
                panic!("instruction {i} at {:#x} raised {e}", self.pc());
            }
        }
    }

    /// Steps until an exception is raised, at most `limit` instructions.
    pub fn run_until_exception(&mut self, limit: usize) -> Exception {
        for _ in 0..limit {
            if let Err(e) = self.step() {
                return e;
            }
        }
        panic!("no exception within {limit} instructions");
    }
}

/// Small-memory configuration: 128-byte pages, `frames` frames.
pub fn paging_config(frames: u32, policy: LoadPolicy, translation: TranslationMode) -> Config {
    let mut config = Config::default();
    config.memory.num_phys_pages = frames;
    config.memory.translation = translation;
    config.paging.policy = policy;
    config.general.max_ticks = 1_000_000;
    config
}

/// Result of running one program under the kernel.
pub struct ProgramRun {
    pub machine: Machine,
    pub kernel: Kernel,
    pub stop: StopReason,
}

/// Runs a NOFF image to completion under the minimal kernel.
pub fn run_image(config: &Config, image: Vec<u8>) -> ProgramRun {
    init_tracing();
    let mut machine = Machine::new(config).expect("valid config");
    let mut kernel = Kernel::new(config).expect("valid config");
    let image = image_from_bytes(image).expect("valid image");
    let _ = kernel.exec(&mut machine, image).expect("program starts");
    let stop = machine.run(&mut kernel);
    ProgramRun {
        machine,
        kernel,
        stop,
    }
}
