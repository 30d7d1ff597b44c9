/// How samples outside the image are read by a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderMode {
    /// Outside samples are zero, i.e. they do not contribute.
    ///
    /// Example: ...d c b a | 0 0 0 0...
    Constant,

    /// Repeat the outermost row or column.
    ///
    /// Example: ...d c b a | a a a a...
    Replicate,

    /// Mirror including the edge sample.
    ///
    /// Example: ...d c b a | a b c d...
    Reflect,

    /// Mirror excluding the edge sample.
    ///
    /// Example: ...d c b a | b c d e...
    #[default]
    Reflect101,
}

impl BorderMode {
    #[inline]
    fn reflect(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let len = len as isize;
        let mut i = i;
        while i < 0 || i >= len {
            if i < 0 {
                i = -i - 1;
            } else {
                i = 2 * len - i - 1;
            }
        }
        i as usize
    }

    #[inline]
    fn reflect101(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let len = len as isize;
        let mut i = i;
        while i < 0 || i >= len {
            if i < 0 {
                i = -i;
            } else {
                i = 2 * len - i - 2;
            }
        }
        i as usize
    }

    /// Maps index `i` into `[0, len)`, or `None` for [`BorderMode::Constant`]
    /// when `i` is outside.
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> Option<usize> {
        if i >= 0 && (i as usize) < len {
            return Some(i as usize);
        }
        match self {
            BorderMode::Constant => None,
            BorderMode::Replicate => Some(i.clamp(0, len as isize - 1) as usize),
            BorderMode::Reflect => Some(Self::reflect(i, len)),
            BorderMode::Reflect101 => Some(Self::reflect101(i, len)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BorderMode;

    #[test]
    fn test_map_index() {
        assert_eq!(BorderMode::Constant.map_index(-1, 4), None);
        assert_eq!(BorderMode::Constant.map_index(2, 4), Some(2));
        assert_eq!(BorderMode::Replicate.map_index(-2, 4), Some(0));
        assert_eq!(BorderMode::Replicate.map_index(5, 4), Some(3));
        assert_eq!(BorderMode::Reflect.map_index(-1, 4), Some(0));
        assert_eq!(BorderMode::Reflect.map_index(4, 4), Some(3));
        assert_eq!(BorderMode::Reflect101.map_index(-1, 4), Some(1));
        assert_eq!(BorderMode::Reflect101.map_index(4, 4), Some(2));
        assert_eq!(BorderMode::Reflect101.map_index(-3, 1), Some(0));
    }
}
