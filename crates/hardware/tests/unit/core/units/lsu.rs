//! Load/Store Unit Tests.
//!
//! Sign and zero extension, and the four alignment cases of each unaligned
//! merge.

use mipsim_core::common::AccessSize;
use mipsim_core::core::units::lsu::Lsu;
use mipsim_core::core::units::lsu::unaligned::{load_left, load_right, store_left, store_right};
use mipsim_core::isa::instruction::Op;
use rstest::rstest;

const MEM: u32 = 0x4433_2211;
const REG: u32 = 0xDDCC_BBAA;

#[rstest]
#[case(0x80, AccessSize::Byte, true, 0xFFFF_FF80)]
#[case(0x80, AccessSize::Byte, false, 0x80)]
#[case(0x8001, AccessSize::Half, true, 0xFFFF_8001)]
#[case(0x8001, AccessSize::Half, false, 0x8001)]
#[case(0x7FFF, AccessSize::Half, true, 0x7FFF)]
#[case(0x8000_0000, AccessSize::Word, true, 0x8000_0000)]
fn extends_loaded_values(
    #[case] value: u32,
    #[case] size: AccessSize,
    #[case] signed: bool,
    #[case] want: u32,
) {
    assert_eq!(Lsu::extend(value, size, signed), want);
}

#[test]
fn load_shapes() {
    assert_eq!(Lsu::load_shape(Op::Lb), Some((AccessSize::Byte, true)));
    assert_eq!(Lsu::load_shape(Op::Lhu), Some((AccessSize::Half, false)));
    assert_eq!(Lsu::load_shape(Op::Lw), Some((AccessSize::Word, false)));
    assert_eq!(Lsu::load_shape(Op::Sw), None);
    assert_eq!(Lsu::store_size(Op::Sh), Some(AccessSize::Half));
    assert_eq!(Lsu::store_size(Op::Lw), None);
}

#[rstest]
#[case(0, MEM)]
#[case(1, 0x3322_11AA)]
#[case(2, 0x2211_BBAA)]
#[case(3, 0x11CC_BBAA)]
fn lwl_cases(#[case] addr: u32, #[case] want: u32) {
    assert_eq!(load_left(addr, MEM, REG), want);
}

#[rstest]
#[case(0, 0xDDCC_BB44)]
#[case(1, 0xDDCC_4433)]
#[case(2, 0xDD44_3322)]
#[case(3, MEM)]
fn lwr_cases(#[case] addr: u32, #[case] want: u32) {
    assert_eq!(load_right(addr, MEM, REG), want);
}

#[rstest]
#[case(0, REG)]
#[case(1, 0x44DD_CCBB)]
#[case(2, 0x4433_DDCC)]
#[case(3, 0x4433_22DD)]
fn swl_cases(#[case] addr: u32, #[case] want: u32) {
    assert_eq!(store_left(addr, MEM, REG), want);
}

#[rstest]
#[case(0, 0xAA33_2211)]
#[case(1, 0xBBAA_2211)]
#[case(2, 0xCCBB_AA11)]
#[case(3, REG)]
fn swr_cases(#[case] addr: u32, #[case] want: u32) {
    assert_eq!(store_right(addr, MEM, REG), want);
}
