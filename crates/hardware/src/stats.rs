//! Simulation statistics collection and reporting.
//!
//! This module tracks the counters of a simulation run. It provides:
//! 1. **Ticks and Instructions:** Total ticks, user ticks and retired instructions.
//! 2. **Instruction mix:** Loads, stores and control transfers.
//! 3. **Exceptions:** Counts per exception kind.
//! 4. **Paging:** Page faults, TLB misses and refills, segment loads, evictions and swap traffic.

use std::time::Instant;

use crate::common::ExceptionKind;

/// Display names for each exception kind, in `ExceptionKind::index` order.
const EXCEPTION_NAMES: [&str; ExceptionKind::COUNT] = [
    "syscall",
    "page_fault",
    "read_only",
    "bus_error",
    "address_error",
    "overflow",
    "illegal_instr",
];

/// Simulation statistics structure.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Ticks elapsed, one per instruction attempt.
    pub total_ticks: u64,
    /// Ticks charged while running user code.
    pub user_ticks: u64,
    /// Number of instructions that completed without an exception.
    pub instructions_retired: u64,

    /// Retired load instructions.
    pub loads: u64,
    /// Retired store instructions.
    pub stores: u64,
    /// Retired branch and jump instructions.
    pub branches: u64,

    /// Exceptions raised, indexed by `ExceptionKind::index`.
    pub exceptions: [u64; ExceptionKind::COUNT],

    /// Page faults resolved by bringing a page into memory.
    pub page_faults: u64,
    /// Page faults that were TLB misses.
    pub tlb_misses: u64,
    /// TLB slots loaded by the kernel.
    pub tlb_refills: u64,
    /// Pages loaded from the executable or zero-filled.
    pub segment_loads: u64,
    /// Frames taken away from their owner.
    pub evictions: u64,
    /// Pages written to swap.
    pub swap_writes: u64,
    /// Pages read back from swap.
    pub swap_reads: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            total_ticks: 0,
            user_ticks: 0,
            instructions_retired: 0,
            loads: 0,
            stores: 0,
            branches: 0,
            exceptions: [0; ExceptionKind::COUNT],
            page_faults: 0,
            tlb_misses: 0,
            tlb_refills: 0,
            segment_loads: 0,
            evictions: 0,
            swap_writes: 0,
            swap_reads: 0,
        }
    }
}

impl SimStats {
    /// Records one raised exception.
    pub fn record_exception(&mut self, kind: ExceptionKind) {
        self.exceptions[kind.index()] += 1;
    }

    /// Number of exceptions of `kind` raised so far.
    pub fn exception_count(&self, kind: ExceptionKind) -> u64 {
        self.exceptions[kind.index()]
    }

    /// Prints all statistics to stdout.
    pub fn print(&self) {
        let seconds = self.start_time.elapsed().as_secs_f64();
        let ticks = self.total_ticks.max(1);
        let kips = if seconds > 0.0 {
            (self.instructions_retired as f64 / seconds) / 1000.0
        } else {
            0.0
        };

        println!("\n==========================================================");
        println!("MIPS MACHINE SIMULATION STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {seconds:.4} s");
        println!("sim_ticks                {}", self.total_ticks);
        println!(
            "sim_ticks.user           {} ({:.2}%)",
            self.user_ticks,
            (self.user_ticks as f64 / ticks as f64) * 100.0
        );
        println!("sim_insts                {}", self.instructions_retired);
        println!("sim_kips                 {kips:.2}");
        println!("----------------------------------------------------------");
        println!("INSTRUCTION MIX");
        println!("  op.load                {}", self.loads);
        println!("  op.store               {}", self.stores);
        println!("  op.branch              {}", self.branches);
        println!("----------------------------------------------------------");
        println!("EXCEPTIONS");
        for (name, count) in EXCEPTION_NAMES.iter().zip(self.exceptions) {
            println!("  exc.{name:<19}{count}");
        }
        println!("----------------------------------------------------------");
        println!("PAGING");
        println!("  vm.page_faults         {}", self.page_faults);
        println!("  vm.tlb_misses          {}", self.tlb_misses);
        println!("  vm.tlb_refills         {}", self.tlb_refills);
        println!("  vm.segment_loads       {}", self.segment_loads);
        println!("  vm.evictions           {}", self.evictions);
        println!("  vm.swap_writes         {}", self.swap_writes);
        println!("  vm.swap_reads          {}", self.swap_reads);
        println!("==========================================================");
    }
}
