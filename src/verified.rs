/// A value that has been sanitized or validated and may be persisted.
///
/// Store writes accept `Verified<String>` for every user-supplied field, so
/// raw request input cannot reach storage by accident.
///
/// # Construction
///
/// There is no public constructor. Only the sanitizers and validators in
/// this crate call `new_unchecked`, after doing their work.
///
/// ```compile_fail
/// use blog_policy::Verified;
///
/// let verified = Verified::new("<script>".to_string());
/// ```
///
/// # Access
///
/// [`AsRef::as_ref`] borrows the value; [`into_inner`](Self::into_inner)
/// consumes the wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verified<T> {
    inner: T,
}

impl<T> Verified<T> {
    /// Wraps a value that the caller has already sanitized or validated.
    pub(crate) fn new_unchecked(value: T) -> Self {
        Self { inner: value }
    }

    /// Consumes the wrapper and returns the value.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> AsRef<T> for Verified<T> {
    fn as_ref(&self) -> &T {
        &self.inner
    }
}

impl std::fmt::Display for Verified<String> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verified_as_ref_does_not_consume() {
        let verified = Verified::new_unchecked("<p>ok</p>".to_string());

        let ref1 = verified.as_ref();
        let ref2 = verified.as_ref();
        assert_eq!(ref1, ref2);

        assert_eq!(verified.into_inner(), "<p>ok</p>");
    }

    #[test]
    fn verified_displays_inner_string() {
        let verified = Verified::new_unchecked("hello".to_string());
        assert_eq!(verified.to_string(), "hello");
    }
}
