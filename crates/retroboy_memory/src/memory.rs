use std::fmt;

use retroboy_sm83::Bus;

use crate::routes::RouteTable;
use crate::{DelegateId, MemoryDelegate, MemoryError, ADDRESS_SPACE};

#[derive(Clone, Copy, Debug)]
enum Access {
    Read,
    Write,
}

pub struct MainMemory {
    backing: Box<[u8; ADDRESS_SPACE]>,
    delegates: Vec<Box<dyn MemoryDelegate>>,
    reads: RouteTable,
    writes: RouteTable,
}

impl Default for MainMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MainMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MainMemory")
            .field("delegates", &self.delegates.len())
            .field("read_routes", &self.reads.len())
            .field("write_routes", &self.writes.len())
            .finish_non_exhaustive()
    }
}

impl MainMemory {
    /// Zero-filled memory with no delegates.
    pub fn new() -> Self {
        Self {
            backing: Box::new([0; ADDRESS_SPACE]),
            delegates: Vec::new(),
            reads: RouteTable::default(),
            writes: RouteTable::default(),
        }
    }

    /// Take ownership of a delegate. It handles nothing until addresses are
    /// registered for it.
    pub fn add_delegate(&mut self, delegate: Box<dyn MemoryDelegate>) -> DelegateId {
        let id = DelegateId(self.delegates.len());
        self.delegates.push(delegate);
        id
    }

    pub fn register_read(&mut self, address: u16, id: DelegateId) -> Result<(), MemoryError> {
        self.register(Access::Read, address, address, id)
    }

    pub fn register_write(&mut self, address: u16, id: DelegateId) -> Result<(), MemoryError> {
        self.register(Access::Write, address, address, id)
    }

    /// Route reads of `start..=end` to `id`. Nothing is registered if any
    /// address in the range is already taken.
    pub fn register_read_range(
        &mut self,
        start: u16,
        end: u16,
        id: DelegateId,
    ) -> Result<(), MemoryError> {
        self.register(Access::Read, start, end, id)
    }

    /// Route writes of `start..=end` to `id`. See
    /// [`MainMemory::register_read_range`].
    pub fn register_write_range(
        &mut self,
        start: u16,
        end: u16,
        id: DelegateId,
    ) -> Result<(), MemoryError> {
        self.register(Access::Write, start, end, id)
    }

    /// Copy an image into the backing array, bypassing delegates.
    pub fn load(&mut self, offset: u16, bytes: &[u8]) -> Result<(), MemoryError> {
        let start = offset as usize;
        let end = start + bytes.len();
        if end > ADDRESS_SPACE {
            return Err(MemoryError::ImageTooLarge {
                offset,
                len: bytes.len(),
            });
        }
        self.backing[start..end].copy_from_slice(bytes);
        log::debug!("loaded {} bytes at 0x{offset:04X}", bytes.len());
        Ok(())
    }

    fn register(
        &mut self,
        access: Access,
        start: u16,
        end: u16,
        id: DelegateId,
    ) -> Result<(), MemoryError> {
        if start > end {
            return Err(MemoryError::InvalidRange { start, end });
        }
        if id.0 >= self.delegates.len() {
            return Err(MemoryError::UnknownDelegate { id });
        }

        let table = match access {
            Access::Read => &mut self.reads,
            Access::Write => &mut self.writes,
        };
        if let Some(address) = table.first_conflict(start, end) {
            return Err(match access {
                Access::Read => MemoryError::ReadDelegateConflict { address },
                Access::Write => MemoryError::WriteDelegateConflict { address },
            });
        }

        table.insert(start, end, id);
        log::debug!("{access:?} delegate {id} mapped to 0x{start:04X}-0x{end:04X}");
        Ok(())
    }
}

impl Bus for MainMemory {
    #[inline]
    fn read8(&mut self, addr: u16) -> u8 {
        match self.reads.lookup(addr) {
            Some(id) => self.delegates[id.0].read(addr),
            None => self.backing[addr as usize],
        }
    }

    #[inline]
    fn write8(&mut self, addr: u16, value: u8) {
        match self.writes.lookup(addr) {
            Some(id) => self.delegates[id.0].write(addr, value),
            None => self.backing[addr as usize] = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    /// Single-value delegate whose value and write log are shared with the
    /// test body.
    #[derive(Clone, Default)]
    struct Latch {
        value: Rc<RefCell<u8>>,
        writes: Rc<RefCell<Vec<(u16, u8)>>>,
    }

    impl MemoryDelegate for Latch {
        fn read(&mut self, _address: u16) -> u8 {
            *self.value.borrow()
        }

        fn write(&mut self, address: u16, value: u8) {
            *self.value.borrow_mut() = value;
            self.writes.borrow_mut().push((address, value));
        }
    }

    #[test]
    fn unrouted_addresses_use_backing_store() {
        let mut memory = MainMemory::new();
        assert_eq!(memory.read8(0xC000), 0);
        memory.write8(0xC000, 0x42);
        assert_eq!(memory.read8(0xC000), 0x42);
        memory.write8(0xFFFF, 0x1F);
        assert_eq!(memory.read8(0xFFFF), 0x1F);
    }

    #[test]
    fn delegates_take_over_their_addresses() {
        let mut memory = MainMemory::new();
        let latch = Latch::default();
        let id = memory.add_delegate(Box::new(latch.clone()));
        memory.register_read(0xFF44, id).unwrap();
        memory.register_write_range(0xFF40, 0xFF45, id).unwrap();

        memory.write8(0xFF44, 0x90);
        assert_eq!(*latch.value.borrow(), 0x90);
        assert_eq!(*latch.writes.borrow(), vec![(0xFF44, 0x90)]);
        assert_eq!(memory.read8(0xFF44), 0x90);

        // Read side of 0xFF40 is not routed: the backing store never saw
        // the write.
        memory.write8(0xFF40, 0x11);
        assert_eq!(memory.read8(0xFF40), 0x00);
    }

    #[test]
    fn double_registration_fails() {
        let mut memory = MainMemory::new();
        let a = memory.add_delegate(Box::new(Latch::default()));
        let b = memory.add_delegate(Box::new(Latch::default()));

        memory.register_read(0xFF00, a).unwrap();
        assert_eq!(
            memory.register_read(0xFF00, b),
            Err(MemoryError::ReadDelegateConflict { address: 0xFF00 })
        );
        // The write side of the same address is independent.
        memory.register_write(0xFF00, b).unwrap();
        assert_eq!(
            memory.register_write_range(0xFE00, 0xFF00, a),
            Err(MemoryError::WriteDelegateConflict { address: 0xFF00 })
        );
    }

    #[test]
    fn failed_range_registration_changes_nothing() {
        let mut memory = MainMemory::new();
        let a = memory.add_delegate(Box::new(Latch::default()));
        let b = memory.add_delegate(Box::new(Latch::default()));
        memory.register_read_range(0x8000, 0x80FF, a).unwrap();

        assert!(memory.register_read_range(0x7F00, 0x8000, b).is_err());
        memory.register_read_range(0x7F00, 0x7FFF, b).unwrap();
    }

    #[test]
    fn invalid_registrations() {
        let mut memory = MainMemory::new();
        let id = memory.add_delegate(Box::new(Latch::default()));
        assert_eq!(
            memory.register_read_range(0x2000, 0x1000, id),
            Err(MemoryError::InvalidRange {
                start: 0x2000,
                end: 0x1000
            })
        );

        let foreign = DelegateId(7);
        assert_eq!(
            memory.register_write(0x2000, foreign),
            Err(MemoryError::UnknownDelegate { id: foreign })
        );
    }

    #[test]
    fn load_copies_images_and_checks_bounds() {
        let mut memory = MainMemory::new();
        memory.load(0x0100, &[0x00, 0xC3, 0x50, 0x01]).unwrap();
        assert_eq!(memory.read8(0x0101), 0xC3);

        memory.load(0xFFFE, &[0xAA, 0xBB]).unwrap();
        assert_eq!(memory.read8(0xFFFF), 0xBB);

        let err = memory.load(0xFFFF, &[1, 2]).unwrap_err();
        assert_eq!(err, MemoryError::ImageTooLarge { offset: 0xFFFF, len: 2 });
        assert_eq!(memory.read8(0xFFFF), 0xBB);
    }

    #[test]
    fn errors_describe_the_address() {
        let err = MemoryError::ReadDelegateConflict { address: 0xFF0F };
        assert_eq!(err.to_string(), "address 0xFF0F already has a read delegate");
    }
}
