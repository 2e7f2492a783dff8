//! TLB and Context Switch Tests.

use mipsim_core::common::VmError;
use mipsim_core::config::{LoadPolicy, TranslationMode};
use mipsim_core::vm::{MemoryManager, SpaceId};
use mipsim_core::vm::store::MemStore;
use mipsim_core::sim::noff::NoffHeader;
use mipsim_core::Machine;
use pretty_assertions::assert_eq;

use super::{boot, read, write};
use crate::common::builder::image::ImageBuilder;
use crate::common::harness::{init_tracing, paging_config};

fn code_image() -> Vec<u8> {
    ImageBuilder::new().code_bytes(vec![0xAB; 200]).build()
}

#[test]
fn miss_on_a_resident_page_only_refills() {
    let config = paging_config(4, LoadPolicy::Demand, TranslationMode::Tlb);
    let (mut machine, mut vm, _) = boot(&config, code_image());

    assert_eq!(read(&mut machine, &mut vm, 0, 1), 0xAB);
    assert_eq!(machine.stats.tlb_misses, 1);
    assert_eq!(machine.stats.tlb_refills, 1);
    assert_eq!(machine.stats.page_faults, 1);

    vm.save_state(&mut machine);
    assert_eq!(read(&mut machine, &mut vm, 0, 1), 0xAB);
    assert_eq!(machine.stats.tlb_misses, 2);
    assert_eq!(machine.stats.tlb_refills, 2);
    assert_eq!(machine.stats.page_faults, 1);
}

#[test]
fn displaced_slot_is_folded_back() {
    let mut config = paging_config(4, LoadPolicy::Demand, TranslationMode::Tlb);
    config.memory.tlb_size = 1;
    let (mut machine, mut vm, id) = boot(&config, code_image());
    let table = vm.space(id).unwrap().page_table().clone();

    write(&mut machine, &mut vm, 0, 4, 5);
    assert!(!table.get(0).unwrap().dirty);
    assert!(machine.mmu.tlb.lookup(0).unwrap().dirty);

    let _ = read(&mut machine, &mut vm, 128, 1);
    assert!(table.get(0).unwrap().dirty);
    assert!(machine.mmu.tlb.lookup(0).is_none());
}

#[test]
fn save_state_flushes_and_folds() {
    let config = paging_config(4, LoadPolicy::Demand, TranslationMode::Tlb);
    let (mut machine, mut vm, id) = boot(&config, code_image());
    write(&mut machine, &mut vm, 130, 2, 0xBEEF);
    let table = vm.space(id).unwrap().page_table().clone();
    assert!(!table.get(1).unwrap().dirty);

    vm.save_state(&mut machine);

    let entry = table.get(1).unwrap();
    assert!(entry.dirty && entry.used);
    assert!(machine.mmu.tlb.entries().iter().all(|e| !e.valid));
}

#[test]
fn tlb_dirty_bit_protects_the_victim() {
    let config = paging_config(2, LoadPolicy::DemandWithSwap, TranslationMode::Tlb);
    let (mut machine, mut vm, _) = boot(&config, code_image());
    write(&mut machine, &mut vm, 0, 4, 0x0102_0304);
    let _ = read(&mut machine, &mut vm, 128, 1);

    let _ = read(&mut machine, &mut vm, 256, 1);
    assert_eq!(machine.stats.swap_writes, 0);

    assert_eq!(read(&mut machine, &mut vm, 0, 4), 0x0102_0304);
}

#[test]
fn spaces_keep_separate_memory() {
    init_tracing();
    let config = paging_config(8, LoadPolicy::Demand, TranslationMode::PageTable);
    let image = code_image();
    let header = NoffHeader::parse(&image).unwrap();
    let mut machine = Machine::new(&config).unwrap();
    let mut vm = MemoryManager::new(&config).unwrap();
    let a = vm
        .create_space(&mut machine, header, Box::new(MemStore::from(image.clone())))
        .unwrap();
    let b = vm
        .create_space(&mut machine, header, Box::new(MemStore::from(image)))
        .unwrap();
    assert_ne!(a, b);

    vm.restore_state(&mut machine, a).unwrap();
    write(&mut machine, &mut vm, 0, 4, 1);
    vm.restore_state(&mut machine, b).unwrap();
    write(&mut machine, &mut vm, 0, 4, 2);
    vm.restore_state(&mut machine, a).unwrap();
    assert_eq!(read(&mut machine, &mut vm, 0, 4), 1);
    assert!(
        machine
            .mmu
            .page_table
            .as_ref()
            .unwrap()
            .same_table(vm.space(a).unwrap().page_table())
    );

    vm.destroy_space(&mut machine, b);
    assert!(vm.space(b).is_none());
    assert!(vm.coremap().frames_of(b).is_empty());
    assert!(machine.mmu.page_table.is_some());
    assert_eq!(vm.current(), Some(a));

    vm.destroy_space(&mut machine, a);
    assert_eq!(vm.current(), None);
    assert!(machine.mmu.page_table.is_none());
    assert_eq!(vm.coremap().free_count(), 8);
}

#[test]
fn restoring_an_unknown_space_fails() {
    let config = paging_config(8, LoadPolicy::Demand, TranslationMode::PageTable);
    let (mut machine, mut vm, id) = boot(&config, code_image());
    assert!(matches!(
        vm.restore_state(&mut machine, SpaceId::new(99)),
        Err(VmError::UnknownSpace(s)) if s == SpaceId::new(99)
    ));
    assert_eq!(vm.current(), Some(id));
}
