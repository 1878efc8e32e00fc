//! The Game Boy's 64 KB address space as seen by the CPU.
//!
//! Plain addresses are served from a flat backing array. Peripherals claim
//! addresses (or ranges) by registering a [`MemoryDelegate`]; at most one
//! delegate may read and one may write any given address.

mod error;
mod memory;
mod routes;

use std::fmt;

pub use error::MemoryError;
pub use memory::MainMemory;

/// Size of the address space in bytes.
pub const ADDRESS_SPACE: usize = 0x10000;

/// A peripheral handling bus accesses for the addresses it registered.
pub trait MemoryDelegate {
    fn read(&mut self, address: u16) -> u8;
    fn write(&mut self, address: u16, value: u8);
}

/// Handle returned by [`MainMemory::add_delegate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DelegateId(pub(crate) usize);

impl fmt::Display for DelegateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
