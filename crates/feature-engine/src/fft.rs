//! Radix-2 FFT Kernel
//!
//! Iterative in-place Cooley-Tukey transform over power-of-two buffers:
//! bit-reversal permutation followed by `log2(N)` butterfly stages.

use rustfft::num_complex::Complex;
use std::f64::consts::PI;

/// Forward radix-2 FFT with precomputed twiddle factors
#[derive(Debug, Clone, PartialEq)]
pub struct Radix2Fft {
    /// Transform length (power of two)
    size: usize,
    /// `e^{-2πik/N}` for `k in 0..N/2`
    twiddles: Vec<Complex<f64>>,
}

impl Radix2Fft {
    /// Plan a transform of `size` points. Returns `None` unless `size` is a power of two.
    pub fn new(size: usize) -> Option<Self> {
        if !size.is_power_of_two() {
            return None;
        }

        let twiddles = (0..size / 2)
            .map(|k| {
                let angle = -2.0 * PI * k as f64 / size as f64;
                Complex::new(angle.cos(), angle.sin())
            })
            .collect();

        Some(Self { size, twiddles })
    }

    /// Run the forward transform in place. `data.len()` must equal the planned size.
    pub fn process(&self, data: &mut [Complex<f64>]) {
        let n = self.size;
        debug_assert_eq!(data.len(), n, "buffer length must match planned FFT size");
        if n < 2 || data.len() != n {
            return;
        }

        bit_reverse_permute(data);

        let mut len = 2;
        while len <= n {
            let half = len / 2;
            // Stage twiddle e^{-2πij/len} == twiddles[j * N/len]
            let stride = n / len;
            for start in (0..n).step_by(len) {
                for j in 0..half {
                    let w = self.twiddles[j * stride];
                    let u = data[start + j];
                    let v = data[start + j + half] * w;
                    data[start + j] = u + v;
                    data[start + j + half] = u - v;
                }
            }
            len <<= 1;
        }
    }
}

/// Reorder `data` so index `i` holds the element at bit-reversed `i`
fn bit_reverse_permute(data: &mut [Complex<f64>]) {
    let n = data.len();
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;

        if i < j {
            data.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rustfft::FftPlanner;

    fn to_complex(values: &[f64]) -> Vec<Complex<f64>> {
        values.iter().map(|&v| Complex::new(v, 0.0)).collect()
    }

    #[test]
    fn test_rejects_non_power_of_two() {
        assert!(Radix2Fft::new(0).is_none());
        assert!(Radix2Fft::new(12).is_none());
        assert!(Radix2Fft::new(1000).is_none());
        assert!(Radix2Fft::new(1024).is_some());
    }

    #[test]
    fn test_impulse_is_flat() {
        let fft = Radix2Fft::new(16).unwrap();
        let mut data = vec![Complex::new(0.0, 0.0); 16];
        data[0] = Complex::new(1.0, 0.0);
        fft.process(&mut data);
        for bin in data {
            assert!((bin.re - 1.0).abs() < 1e-12);
            assert!(bin.im.abs() < 1e-12);
        }
    }

    #[test]
    fn test_bit_reversal_order() {
        let mut data: Vec<Complex<f64>> = (0..8).map(|i| Complex::new(i as f64, 0.0)).collect();
        bit_reverse_permute(&mut data);
        let order: Vec<f64> = data.iter().map(|c| c.re).collect();
        assert_eq!(order, vec![0.0, 4.0, 2.0, 6.0, 1.0, 5.0, 3.0, 7.0]);
    }

    proptest! {
        #[test]
        fn matches_reference_fft(
            exponent in 1u32..11,
            seed in prop::collection::vec(-1.0f64..1.0, 1024)
        ) {
            let n = 1usize << exponent;
            let input = &seed[..n];

            let mut ours = to_complex(input);
            Radix2Fft::new(n).unwrap().process(&mut ours);

            let mut reference = to_complex(input);
            FftPlanner::<f64>::new().plan_fft_forward(n).process(&mut reference);

            for (a, b) in ours.iter().zip(reference.iter()) {
                prop_assert!((a - b).norm() < 1e-9);
            }
        }
    }
}
