/// `count` evenly spaced values from `start` to `end`, both included.
///
/// The last value is exactly `end`; `count == 1` yields `[start]`.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| if i + 1 == count { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(-1.0, 1.0, 1), vec![-1.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
        let pts = linspace(0.0, std::f64::consts::PI, 30);
        assert_eq!(pts.len(), 30);
        assert_eq!(pts[29], std::f64::consts::PI);
    }
}
