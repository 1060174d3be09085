//! Векторы направленности квадратной планарной решётки.

use ndarray::Array1;
use num_complex::Complex64;
use rwi_types::AnglePair;

use crate::ChannelConfig;

/// Фазовый набег вдоль оси: `[e^{iω·0}, e^{iω·1}, …, e^{iω·(n-1)}]`.
pub fn linear_phase(
    omega: f64,
    n: usize,
) -> Array1<Complex64> {
    Array1::from_shape_fn(n, |i| Complex64::from_polar(1.0, omega * i as f64))
}

/// Произведение Кронекера двух векторов: `out[i·len(b) + j] = a[i]·b[j]`.
pub fn kron(
    a: &Array1<Complex64>,
    b: &Array1<Complex64>,
) -> Array1<Complex64> {
    let nb = b.len();
    Array1::from_shape_fn(a.len() * nb, |k| a[k / nb] * b[k % nb])
}

/// Вектор направленности длины `antenna_count²` для пары углов (радианы).
///
/// `ωy = k·d·sin(θ)·sin(φ)`, `ωx = k·d·sin(θ)·cos(φ)`, результат
/// `kron(vec_y, vec_x)`.
pub fn steering_vector(
    angles: AnglePair,
    config: &ChannelConfig,
) -> Array1<Complex64> {
    let kd = config.wavenumber() * config.element_spacing();
    let (sin_az, cos_az) = angles.azimuth.sin_cos();
    let sin_el = angles.elevation.sin();

    let vec_y = linear_phase(kd * sin_el * sin_az, config.antenna_count);
    let vec_x = linear_phase(kd * sin_el * cos_az, config.antenna_count);

    kron(&vec_y, &vec_x)
}
