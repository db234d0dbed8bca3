use std::cmp::Ordering;

/// A total order over `T`, supplied to a [`SkipList`](crate::SkipList) at
/// construction time.
///
/// Every ordering decision the list makes funnels through
/// [`Comparator::compare`], so the implementation must be a total order and
/// must not change while values are stored.
///
/// Closures of the form `Fn(&T, &T) -> Ordering` implement this trait, so a
/// custom order can be passed directly:
///
/// ```
/// use skipset::SkipList;
///
/// let mut descending = SkipList::with_comparator(|a: &i32, b: &i32| b.cmp(a));
/// descending.extend([3, 1, 2]);
/// assert_eq!(descending.iter().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
/// ```
pub trait Comparator<T: ?Sized> {
    /// Compare `a` against `b`.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// The comparator used when none is given: the element type's own [`Ord`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Natural;

impl<T: Ord + ?Sized> Comparator<T> for Natural {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_natural_matches_ord() {
        assert_eq!(Natural.compare(&1, &2), Ordering::Less);
        assert_eq!(Natural.compare("b", "a"), Ordering::Greater);
        assert_eq!(Natural.compare(&7_u8, &7_u8), Ordering::Equal);
    }

    #[test]
    fn test_natural_debug() {
        assert_eq!(format!("{:?}", Natural), "Natural");
    }

    #[test]
    fn test_closure_comparator() {
        let by_len = |a: &String, b: &String| a.len().cmp(&b.len());
        assert_eq!(
            by_len.compare(&"abc".to_string(), &"z".to_string()),
            Ordering::Greater
        );
        assert_eq!(
            by_len.compare(&"ab".to_string(), &"yz".to_string()),
            Ordering::Equal
        );
    }
}
