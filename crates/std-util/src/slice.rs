#[macro_export]
macro_rules! assert_empty {
    ($e:expr) => {
        let actual = &$e;
        assert!(actual.is_empty(), "expected empty; actual={:?}", actual);
    };
}

pub trait SliceUtil<T> {
    /// Returns `true` when every item of `members` is equal to some item of
    /// `self`. Order and extra items in `self` are ignored.
    fn includes_members(&self, members: &[T]) -> bool;

    /// Returns the items of `members` that have no equal item in `self`.
    fn missing_members<'a>(&self, members: &'a [T]) -> Vec<&'a T>;
}

impl<T: PartialEq> SliceUtil<T> for [T] {
    fn includes_members(&self, members: &[T]) -> bool {
        self.missing_members(members).is_empty()
    }

    fn missing_members<'a>(&self, members: &'a [T]) -> Vec<&'a T> {
        members
            .iter()
            .filter(|member| !self.contains(member))
            .collect()
    }
}
