use ndarray::{Array2, ArrayView2};
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Serialize, Deserialize};
use std::ops::{Add, Mul};

use crate::error::{Result, SoftmaxError};

/// Dense row-major `f64` matrix.
///
/// This is the representation the loop-based loss iterates over; the bulk
/// implementation converts to `ndarray` through `to_array`/`from_array`.
///
/// The fields are public and deserialized as-is, so `rows`/`cols` can
/// disagree with `data`; every loss entry point runs `check_consistent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Matrix of N(0, 1) samples multiplied by `scale`.
    pub fn gaussian<R: Rng + ?Sized>(rows: usize, cols: usize, scale: f64, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                let z: f64 = rng.sample(StandardNormal);
                res.data[i][j] = z * scale;
            }
        }
        res
    }

    /// Checks that `data` really is `rows` rows of `cols` entries each.
    pub fn check_consistent(&self) -> Result<()> {
        if self.data.len() != self.rows {
            return Err(SoftmaxError::ShapeMismatch(format!(
                "matrix declares {} rows but holds {}",
                self.rows,
                self.data.len()
            )));
        }
        if let Some((row, r)) = self.data.iter().enumerate().find(|(_, r)| r.len() != self.cols) {
            return Err(SoftmaxError::RaggedRows { row, len: r.len(), expected: self.cols });
        }
        Ok(())
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i]
    }

    /// Sum of every entry squared (the squared Frobenius norm).
    pub fn sum_squares(&self) -> f64 {
        self.data.iter()
            .flat_map(|row| row.iter())
            .map(|x| x * x)
            .sum()
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    /// Builds a matrix from rows, panicking on ragged input.
    /// Use `try_from_rows` for data that has not been validated.
    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        match Matrix::try_from_rows(data) {
            Ok(m) => m,
            Err(e) => panic!("{e}"),
        }
    }

    /// Builds a matrix from rows, rejecting rows of unequal length.
    /// An empty row list yields a 0x0 matrix.
    pub fn try_from_rows(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let m = Matrix {
            rows: data.len(),
            cols: data.first().map_or(0, Vec::len),
            data,
        };
        m.check_consistent()?;
        Ok(m)
    }

    pub fn to_array(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.rows, self.cols), |(i, j)| self.data[i][j])
    }

    pub fn from_array(array: ArrayView2<f64>) -> Matrix {
        let (rows, cols) = array.dim();
        Matrix {
            rows,
            cols,
            data: array.outer_iter().map(|row| row.to_vec()).collect(),
        }
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

impl Add for Matrix {
    type Output = Matrix;

    fn add(self, rhs: Self) -> Self::Output {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, self.cols);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[i][j] = self.data[i][j] + rhs.data[i][j];
            }
        }

        res
    }
}

impl Mul for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Self::Output {
        if self.cols != rhs.rows {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res =  Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        res
    }
}
