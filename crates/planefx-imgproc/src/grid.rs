/// `n` evenly spaced values from `start` to `end`, both inclusive.
///
/// A single value yields `start`, zero values an empty vector.
///
/// # Example
///
/// ```
/// use planefx_imgproc::grid::linspace;
///
/// assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// ```
pub fn linspace(start: f32, end: f32, n: usize) -> Vec<f32> {
    match n {
        0 => return Vec::new(),
        1 => return vec![start],
        _ => {}
    }
    let step = (end - start) / (n - 1) as f32;
    (0..n).map(|i| start + step * i as f32).collect()
}

#[cfg(test)]
mod tests {
    use super::linspace;

    #[test]
    fn test_linspace_descending() {
        assert_eq!(linspace(1.0, -1.0, 3), vec![1.0, 0.0, -1.0]);
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }
}
