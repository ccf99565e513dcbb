use crate::runtime::error::{self, ErrorKind, ScriptError};

/// Address units per cell.  Addresses index cells directly.
pub const CELL_SIZE: i64 = 1;

/// A flat array of integer cells that backs variables and allotted storage.  The segment only
/// grows, so an address handed out stays valid and is never handed out again.
#[derive(Clone, Debug)]
pub struct MemorySegment {
    cells: Vec<i64>,

    /// The most cells the segment may hold.
    limit: usize,
}

impl MemorySegment {
    pub fn new(limit: usize) -> MemorySegment {
        MemorySegment {
            cells: Vec::new(),
            limit,
        }
    }

    /// Reserve `count` new zeroed cells and return the address of the first one.
    pub fn allot(&mut self, count: i64) -> error::Result<usize> {
        if count < 0 {
            return ScriptError::unlocated(
                ErrorKind::Memory,
                format!("Can not allot a negative number of cells, {}.", count),
            );
        }

        let address = self.cells.len();
        let new_len = address.saturating_add(count as usize);

        if new_len > self.limit {
            return ScriptError::unlocated(
                ErrorKind::Memory,
                format!(
                    "Allotting {} cells would exceed the memory limit of {} cells.",
                    count, self.limit
                ),
            );
        }

        self.cells.resize(new_len, 0);
        Ok(address)
    }

    /// Validate an address taken from the number stack.
    fn index(&self, address: i64) -> error::Result<usize> {
        if address < 0 || address as usize >= self.cells.len() {
            return ScriptError::unlocated(
                ErrorKind::Memory,
                format!(
                    "Address {} is out of range of the {} allocated cells.",
                    address,
                    self.cells.len()
                ),
            );
        }

        Ok(address as usize)
    }

    pub fn fetch(&self, address: i64) -> error::Result<i64> {
        let index = self.index(address)?;
        Ok(self.cells[index])
    }

    pub fn store(&mut self, address: i64, value: i64) -> error::Result<()> {
        let index = self.index(address)?;

        self.cells[index] = value;
        Ok(())
    }

    /// The address the next allocation will start at.
    pub fn here(&self) -> usize {
        self.cells.len()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allot_hands_out_fresh_zeroed_cells() {
        let mut memory = MemorySegment::new(100);

        assert_eq!(memory.allot(1).unwrap(), 0);
        assert_eq!(memory.allot(3).unwrap(), 1);
        assert_eq!(memory.here(), 4);
        assert_eq!(memory.fetch(3).unwrap(), 0);
    }

    #[test]
    fn store_then_fetch() {
        let mut memory = MemorySegment::new(100);
        let address = memory.allot(1).unwrap() as i64;

        memory.store(address, 42).unwrap();

        assert_eq!(memory.fetch(address).unwrap(), 42);
    }

    #[test]
    fn out_of_range_addresses_fail() {
        let mut memory = MemorySegment::new(100);
        let _ = memory.allot(2).unwrap();

        assert_eq!(memory.fetch(2).unwrap_err().kind(), ErrorKind::Memory);
        assert_eq!(memory.fetch(-1).unwrap_err().kind(), ErrorKind::Memory);
        assert_eq!(memory.store(5, 1).unwrap_err().kind(), ErrorKind::Memory);
    }

    #[test]
    fn allot_respects_the_limit() {
        let mut memory = MemorySegment::new(4);

        assert!(memory.allot(4).is_ok());
        assert_eq!(memory.allot(1).unwrap_err().kind(), ErrorKind::Memory);
        assert_eq!(memory.allot(-1).unwrap_err().kind(), ErrorKind::Memory);
        assert_eq!(memory.len(), 4);
    }
}
