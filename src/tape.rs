use crate::InterpreterError;

/// Fixed-length byte tape with a single data pointer.
///
/// Cells start at zero and wrap modulo 256. The pointer never wraps: moving it
/// out of `[0, len)` is reported to the caller and leaves it where it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<u8>,
    pointer: usize,
}

impl Tape {
    /// Allocate a zeroed tape of `len` cells.
    ///
    /// A `len` of 0 is clamped to a single cell so the pointer always has a
    /// cell under it; [`crate::Limits`] rejects 0 before it gets here.
    pub fn new(len: usize) -> Result<Self, InterpreterError> {
        let len = len.max(1);
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|source| InterpreterError::OutOfMemory { what: "tape", source })?;
        cells.resize(len, 0);
        Ok(Self { cells, pointer: 0 })
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Value of the cell under the pointer.
    pub fn get(&self) -> u8 {
        self.cells[self.pointer]
    }

    /// Overwrite the cell under the pointer.
    pub fn set(&mut self, value: u8) {
        self.cells[self.pointer] = value;
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub(crate) fn increment(&mut self) {
        let cell = &mut self.cells[self.pointer];
        *cell = cell.wrapping_add(1);
    }

    pub(crate) fn decrement(&mut self) {
        let cell = &mut self.cells[self.pointer];
        *cell = cell.wrapping_sub(1);
    }

    /// Move right; `false` if already on the last cell.
    pub(crate) fn move_right(&mut self) -> bool {
        if self.pointer + 1 >= self.cells.len() {
            return false;
        }
        self.pointer += 1;
        true
    }

    /// Move left; `false` if already on cell 0.
    pub(crate) fn move_left(&mut self) -> bool {
        if self.pointer == 0 {
            return false;
        }
        self.pointer -= 1;
        true
    }
}
