//! Sparse Jacobian structure
//!
//! Jacobian entries are coordinate (COO) triplets: parallel row, column and
//! value arrays. Rows and columns are fixed once per problem; values are
//! recomputed every solver iteration by the gradient functions.
//!
//! Blocks stack vertically. A block placed at row offset R with n residuals
//! owns rows R..R+n, and the next block starts at R+n:
//!
//! ```text
//!            columns (trajectory variables)
//!          ┌──────────────────────────────┐
//! R₀..R₁   │ goal block                   │
//! R₁..R₂   │ defect block t=0             │
//! R₂..R₃   │ defect block t=1             │
//!          └──────────────────────────────┘
//! ```
//!
//! [`SparseJacobianBuilder`] threads the offset so callers never do it by
//! hand.

use std::ops::Range;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constraint::SparseGradient;
use crate::error::{ConstraintError, Result};

/// Row/column coordinates of one constraint block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripletBlock {
    /// Residual rows in the block
    pub constraint_count: usize,
    /// Global row of each nonzero
    pub rows: Vec<usize>,
    /// Global column of each nonzero
    pub cols: Vec<usize>,
}

impl TripletBlock {
    pub fn new(constraint_count: usize, rows: Vec<usize>, cols: Vec<usize>) -> Self {
        Self {
            constraint_count,
            rows,
            cols,
        }
    }

    /// Number of nonzero entries
    pub fn nonzeros(&self) -> usize {
        self.rows.len()
    }

    /// Offset for the block that follows one placed at `row_offset`
    pub fn next_offset(&self, row_offset: usize) -> usize {
        row_offset + self.constraint_count
    }

    /// Iterate `(row, col)` pairs
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().copied().zip(self.cols.iter().copied())
    }
}

/// Where a block landed inside the global structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSpan {
    /// Global residual rows
    pub rows: Range<usize>,
    /// Positions in the global triplet arrays
    pub nonzeros: Range<usize>,
}

/// Accumulates blocks into one global sparse structure
#[derive(Debug, Clone)]
pub struct SparseJacobianBuilder {
    variable_count: usize,
    row_offset: usize,
    rows: Vec<usize>,
    cols: Vec<usize>,
    blocks: Vec<BlockSpan>,
}

impl SparseJacobianBuilder {
    /// Start an empty structure over `variable_count` trajectory variables
    pub fn new(variable_count: usize) -> Self {
        Self {
            variable_count,
            row_offset: 0,
            rows: Vec::new(),
            cols: Vec::new(),
            blocks: Vec::new(),
        }
    }

    /// Row offset the next block will start at
    pub fn row_offset(&self) -> usize {
        self.row_offset
    }

    /// Append a block given block-local rows in `0..row_count`.
    ///
    /// # Errors
    ///
    /// Fails without modifying the builder if the row and column lists
    /// differ in length, a row is outside the block, or a column is not a
    /// trajectory variable.
    pub fn add_block(
        &mut self,
        row_count: usize,
        local_rows: &[usize],
        local_cols: &[usize],
    ) -> Result<BlockSpan> {
        if local_rows.len() != local_cols.len() {
            return Err(ConstraintError::TripletLengthMismatch {
                rows: local_rows.len(),
                cols: local_cols.len(),
            });
        }
        if let Some(&row) = local_rows.iter().find(|&&row| row >= row_count) {
            return Err(ConstraintError::RowOutsideBlock {
                row,
                start: 0,
                end: row_count,
            });
        }
        self.check_columns(local_cols)?;

        let offset = self.row_offset;
        Ok(self.push(
            row_count,
            local_rows.iter().map(|row| row + offset),
            local_cols.iter().copied(),
        ))
    }

    /// Append a block whose index generator already takes a row offset.
    ///
    /// The generator is called with the current offset and its rows must lie
    /// in `offset..offset + constraint_count`.
    pub fn add_generated<G>(&mut self, generator: G) -> Result<BlockSpan>
    where
        G: FnOnce(usize) -> TripletBlock,
    {
        let offset = self.row_offset;
        let block = generator(offset);

        if block.rows.len() != block.cols.len() {
            return Err(ConstraintError::TripletLengthMismatch {
                rows: block.rows.len(),
                cols: block.cols.len(),
            });
        }
        let end = block.next_offset(offset);
        if let Some(&row) = block.rows.iter().find(|&&row| row < offset || row >= end) {
            return Err(ConstraintError::RowOutsideBlock {
                row,
                start: offset,
                end,
            });
        }
        self.check_columns(&block.cols)?;

        Ok(self.push(
            block.constraint_count,
            block.rows.into_iter(),
            block.cols.into_iter(),
        ))
    }

    /// Append the structure of a constraint block
    pub fn add(&mut self, block: &dyn SparseGradient) -> Result<BlockSpan> {
        self.add_generated(|offset| block.gradient_indices(offset))
    }

    /// Freeze the accumulated structure
    pub fn finish(self) -> SparseStructure {
        debug!(
            "Sparse Jacobian: {} blocks, {} rows × {} columns, {} nonzeros",
            self.blocks.len(),
            self.row_offset,
            self.variable_count,
            self.rows.len()
        );

        SparseStructure {
            constraint_count: self.row_offset,
            variable_count: self.variable_count,
            rows: self.rows,
            cols: self.cols,
            blocks: self.blocks,
        }
    }

    fn check_columns(&self, cols: &[usize]) -> Result<()> {
        if let Some(&col) = cols.iter().find(|&&col| col >= self.variable_count) {
            return Err(ConstraintError::ColumnOutOfRange {
                col,
                variable_count: self.variable_count,
            });
        }
        Ok(())
    }

    fn push(
        &mut self,
        row_count: usize,
        rows: impl Iterator<Item = usize>,
        cols: impl Iterator<Item = usize>,
    ) -> BlockSpan {
        let nonzero_start = self.rows.len();
        self.rows.extend(rows);
        self.cols.extend(cols);

        let span = BlockSpan {
            rows: self.row_offset..self.row_offset + row_count,
            nonzeros: nonzero_start..self.rows.len(),
        };
        debug!(
            "Added block: rows {:?}, {} nonzeros",
            span.rows,
            span.nonzeros.len()
        );

        self.row_offset += row_count;
        self.blocks.push(span.clone());
        span
    }
}

/// Finished global sparsity structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseStructure {
    constraint_count: usize,
    variable_count: usize,
    rows: Vec<usize>,
    cols: Vec<usize>,
    blocks: Vec<BlockSpan>,
}

impl SparseStructure {
    /// Total residual rows
    pub fn constraint_count(&self) -> usize {
        self.constraint_count
    }

    /// Trajectory variables (columns)
    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    pub fn nonzeros(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn cols(&self) -> &[usize] {
        &self.cols
    }

    /// Spans in insertion order
    pub fn blocks(&self) -> &[BlockSpan] {
        &self.blocks
    }

    /// Row and column indices narrowed for solvers that take `i32`
    pub fn indices_i32(&self) -> Result<(Vec<i32>, Vec<i32>)> {
        let narrow = |indices: &[usize]| -> Result<Vec<i32>> {
            indices
                .iter()
                .map(|&index| i32::try_from(index).map_err(|_| ConstraintError::IndexOverflow(index)))
                .collect()
        };
        Ok((narrow(&self.rows)?, narrow(&self.cols)?))
    }

    /// Scatter stacked gradient values into a dense matrix.
    ///
    /// Repeated coordinates accumulate, matching COO semantics.
    pub fn to_dense(&self, values: &[f64]) -> Result<DMatrix<f64>> {
        if values.len() != self.rows.len() {
            return Err(ConstraintError::ValueCountMismatch {
                expected: self.rows.len(),
                got: values.len(),
            });
        }

        let mut dense = DMatrix::zeros(self.constraint_count, self.variable_count);
        for ((&row, &col), value) in self.rows.iter().zip(&self.cols).zip(values) {
            dense[(row, col)] += value;
        }
        Ok(dense)
    }
}
