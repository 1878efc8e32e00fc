use crate::DelegateId;

const PAGE_COUNT: usize = 0x100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Route {
    start: u16,
    end: u16,
    id: DelegateId,
}

/// Address ranges owned by delegates for one access kind (read or write).
///
/// Ranges are kept sorted and never overlap. A 256-entry page bitmap lets
/// the common case, an address on a page nobody registered, skip the
/// search entirely.
#[derive(Clone, Debug)]
pub(crate) struct RouteTable {
    pages: [bool; PAGE_COUNT],
    routes: Vec<Route>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            pages: [false; PAGE_COUNT],
            routes: Vec::new(),
        }
    }
}

impl RouteTable {
    #[inline]
    pub(crate) fn lookup(&self, address: u16) -> Option<DelegateId> {
        if !self.pages[(address >> 8) as usize] {
            return None;
        }
        let idx = self.routes.partition_point(|r| r.start <= address);
        let route = self.routes.get(idx.checked_sub(1)?)?;
        (address <= route.end).then_some(route.id)
    }

    /// First address in `start..=end` that already has a route.
    pub(crate) fn first_conflict(&self, start: u16, end: u16) -> Option<u16> {
        let idx = self.routes.partition_point(|r| r.end < start);
        self.routes
            .get(idx)
            .filter(|r| r.start <= end)
            .map(|r| r.start.max(start))
    }

    /// Add a route. The caller has checked `start <= end` and that the
    /// range is free.
    pub(crate) fn insert(&mut self, start: u16, end: u16, id: DelegateId) {
        debug_assert!(start <= end);
        debug_assert_eq!(self.first_conflict(start, end), None);

        let idx = self.routes.partition_point(|r| r.end < start);
        self.routes.insert(idx, Route { start, end, id });
        for page in (start >> 8)..=(end >> 8) {
            self.pages[page as usize] = true;
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.routes.len()
    }
}
