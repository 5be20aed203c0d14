//! Variables and variable blocks.

/// Type of a decision variable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum VarType {
    /// Real-valued variable.
    #[default]
    Continuous,
    /// 0/1 variable.
    Binary,
}

/// A single variable, identified by its column in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Var(pub(crate) usize);

impl Var {
    /// Column index of the variable in its model.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A 2-D block of variables stored contiguously in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MVar {
    pub(crate) start: usize,
    pub(crate) rows: usize,
    pub(crate) cols: usize,
}

impl MVar {
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn nrows(&self) -> usize {
        self.rows
    }

    pub fn ncols(&self) -> usize {
        self.cols
    }

    /// Number of variables in the block.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The variable at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the block.
    pub fn at(&self, row: usize, col: usize) -> Var {
        assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of bounds for block of shape ({}, {})",
            row,
            col,
            self.rows,
            self.cols
        );
        Var(self.start + row * self.cols + col)
    }

    /// Variables of one row, left to right.
    pub fn row(&self, row: usize) -> impl Iterator<Item = Var> + '_ {
        (0..self.cols).map(move |col| self.at(row, col))
    }

    /// Column indices covered by the block.
    pub(crate) fn range(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.len()
    }
}
