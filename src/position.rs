//! Relative position arithmetic shared by the sequence operations.
//!
//! Relative indices follow array conventions: negative values count back
//! from the end, and range bounds are clamped into `0..=len`.

/// Resolve a relative range bound against `len`, clamping into `0..=len`.
#[inline]
pub fn resolve(relative: isize, len: usize) -> usize {
    if relative < 0 {
        len.saturating_sub(relative.unsigned_abs())
    } else {
        (relative as usize).min(len)
    }
}

/// Resolve an optional end bound; `None` means `len`.
#[inline]
pub fn resolve_end(end: Option<isize>, len: usize) -> usize {
    end.map_or(len, |end| resolve(end, len))
}

/// Resolve a relative index to an in-bounds position, without clamping.
#[inline]
pub fn resolve_exact(index: isize, len: usize) -> Option<usize> {
    let pos = if index < 0 {
        len.checked_sub(index.unsigned_abs())?
    } else {
        index as usize
    };
    (pos < len).then_some(pos)
}

/// Resolve `start..end` into a (possibly empty) absolute range.
#[inline]
pub fn resolve_range(start: isize, end: Option<isize>, len: usize) -> std::ops::Range<usize> {
    let from = resolve(start, len);
    let to = resolve_end(end, len);
    from..to.max(from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_clamps() {
        assert_eq!(resolve(0, 5), 0);
        assert_eq!(resolve(3, 5), 3);
        assert_eq!(resolve(9, 5), 5);
        assert_eq!(resolve(-1, 5), 4);
        assert_eq!(resolve(-9, 5), 0);
        assert_eq!(resolve(isize::MIN, 5), 0);
    }

    #[test]
    fn test_resolve_exact() {
        assert_eq!(resolve_exact(0, 3), Some(0));
        assert_eq!(resolve_exact(-1, 3), Some(2));
        assert_eq!(resolve_exact(-3, 3), Some(0));
        assert_eq!(resolve_exact(-4, 3), None);
        assert_eq!(resolve_exact(3, 3), None);
        assert_eq!(resolve_exact(0, 0), None);
    }

    #[test]
    fn test_resolve_range() {
        assert_eq!(resolve_range(1, None, 4), 1..4);
        assert_eq!(resolve_range(-2, None, 4), 2..4);
        assert_eq!(resolve_range(1, Some(-1), 4), 1..3);
        // Inverted bounds collapse to empty
        assert_eq!(resolve_range(3, Some(1), 4), 3..3);
        assert!(resolve_range(10, Some(20), 4).is_empty());
    }
}
