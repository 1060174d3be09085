//! DFT-кодовые книги для формирования лучей.

use std::f64::consts::PI;

use ndarray::Array2;
use num_complex::Complex64;

/// Кодовая книга `N × N`, столбец `c` задаёт луч с номером `c`.
#[derive(Debug, Clone, PartialEq)]
pub struct Codebook {
    matrix: Array2<Complex64>,
}

impl Codebook {
    /// DFT-книга: `W[r, c] = exp(-i·2π·r·c / N)`.
    pub fn dft(size: usize) -> Self {
        Self {
            matrix: dft_codebook(size),
        }
    }

    pub fn size(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.matrix
    }

    /// Эрмитово сопряжение `Wᴴ`.
    pub fn hermitian(&self) -> Array2<Complex64> {
        self.matrix.t().mapv(|w| w.conj())
    }

    pub fn into_matrix(self) -> Array2<Complex64> {
        self.matrix
    }
}

/// Матрица ДПФ размера `size × size`.
///
/// Показатель `r·c` сводится по модулю `size` до умножения на фазу, чтобы
/// большие книги не теряли точность.
pub fn dft_codebook(size: usize) -> Array2<Complex64> {
    if size == 0 {
        return Array2::zeros((0, 0));
    }

    let step = -2.0 * PI / size as f64;

    Array2::from_shape_fn((size, size), |(r, c)| {
        let k = (r * c) % size;
        Complex64::from_polar(1.0, step * k as f64)
    })
}
