use mipsim_core::common::Exception;
use mipsim_core::config::Config;
use mipsim_core::sim::noff::NoffHeader;
use mipsim_core::vm::store::MemStore;
use mipsim_core::vm::{MemoryManager, SpaceId};
use mipsim_core::Machine;

use crate::common::harness::init_tracing;





/// TLB refill and context switching.
pub mod tlb;

/// A machine plus a memory manager running one space built from `image`.
pub(crate) fn boot(config: &Config, image: Vec<u8>) -> (Machine, MemoryManager, SpaceId) {
    init_tracing();
    let mut machine = Machine::new(config).unwrap();
    let mut vm = MemoryManager::new(config).unwrap();
    let header = NoffHeader::parse(&image).unwrap();
    let id = vm
        .create_space(&mut machine, header, Box::new(MemStore::from(image)))
        .unwrap();
    vm.restore_state(&mut machine, id).unwrap();
    (machine, vm, id)
}

/// Reads through the MMU, resolving page faults like the kernel does.
pub(crate) fn read(machine: &mut Machine, vm: &mut MemoryManager, vaddr: u32, size: u32) -> u32 {
    loop {
        match machine.read_mem(vaddr, size) {
            Ok(v) => return v,
            Err(Exception::PageFault(a)) => vm.handle_page_fault(machine, a).unwrap(),
            Err(e) => panic!("unexpected {e}"),
        }
    }
}

/// Writes through the MMU, resolving page faults like the kernel does.
pub(crate) fn write(machine: &mut Machine, vm: &mut MemoryManager, vaddr: u32, size: u32, value: u32) {
    loop {
        match machine.write_mem(vaddr, size, value) {
            Ok(()) => return,
            Err(Exception::PageFault(a)) => vm.handle_page_fault(machine, a).unwrap(),
            Err(e) => panic!("unexpected {e}"),
        }
    }
}
