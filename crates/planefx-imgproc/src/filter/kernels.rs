/// Create a box blur kernel.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel.
///
/// # Returns
///
/// A vector of the kernel.
pub fn box_blur_kernel_1d(kernel_size: usize) -> Vec<f32> {
    vec![1.0 / kernel_size as f32; kernel_size]
}

/// Create a gaussian blur kernel.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel.
/// * `sigma` - The sigma of the gaussian kernel.
///
/// # Returns
///
/// A vector of the kernel.
pub fn gaussian_kernel_1d(kernel_size: usize, sigma: f32) -> Vec<f32> {
    let mut kernel = Vec::with_capacity(kernel_size);

    let mean = (kernel_size - 1) as f32 / 2.0;
    let sigma_sq = sigma * sigma;

    // compute the kernel
    for i in 0..kernel_size {
        let x = i as f32 - mean;
        kernel.push((-(x * x) / (2.0 * sigma_sq)).exp());
    }

    // normalize the kernel
    let norm = kernel.iter().sum::<f32>();
    kernel.iter_mut().for_each(|k| *k /= norm);
    kernel
}

/// Kernel size covering three standard deviations on each side, `2 * ceil(3 * sigma) + 1`.
pub fn gaussian_kernel_size(sigma: f32) -> usize {
    2 * (3.0 * sigma).ceil().max(1.0) as usize + 1
}

/// Half sizes of `n` box filters whose cascade approximates a gaussian of `sigma`.
///
/// reference: http://blog.ivank.net/fastest-gaussian-blur.html
pub fn box_blur_fast_kernels_1d(sigma: f32, n: u8) -> Vec<usize> {
    let n_f = n as f32;
    let w_ideal = (12.0 * sigma * sigma / n_f + 1.0).sqrt();

    let mut wl = w_ideal.floor() as i32;
    if wl % 2 == 0 {
        wl -= 1;
    }
    let wl = wl.max(1);
    let wu = wl + 2;

    let wl_f = wl as f32;
    let m_ideal = (12.0 * sigma * sigma - n_f * wl_f * wl_f - 4.0 * n_f * wl_f - 3.0 * n_f)
        / (-4.0 * wl_f - 4.0);
    let m = m_ideal.round().max(0.0) as u8;

    (0..n)
        .map(|i| {
            let size = if i < m { wl } else { wu };
            ((size - 1) / 2) as usize
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_blur_kernel_1d() {
        assert_eq!(box_blur_kernel_1d(4), vec![0.25; 4]);
    }

    #[test]
    fn test_gaussian_kernel_1d() {
        let kernel = gaussian_kernel_1d(5, 0.5);

        let expected = [
            0.00026386508,
            0.10645077,
            0.78657067,
            0.10645077,
            0.00026386508,
        ];

        for (k, e) in kernel.iter().zip(expected.iter()) {
            approx::assert_relative_eq!(*k, *e, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_gaussian_kernel_size() {
        assert_eq!(gaussian_kernel_size(1.0), 7);
        assert_eq!(gaussian_kernel_size(1.5), 11);
        assert_eq!(gaussian_kernel_size(0.1), 3);
    }

    #[test]
    fn test_box_blur_fast_kernels_1d() {
        assert_eq!(box_blur_fast_kernels_1d(0.5, 3), vec![0, 0, 0]);
        assert_eq!(box_blur_fast_kernels_1d(0.5, 3).len(), 3);
        // sigma 2: ideal width ~4.12, boxes of 3 and 5
        assert_eq!(box_blur_fast_kernels_1d(2.0, 3), vec![1, 1, 2]);
    }
}
