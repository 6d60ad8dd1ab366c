use std::fmt;

/// A wrapper for untrusted data submitted by a visitor.
///
/// `Tainted<T>` marks form fields and rich-text bodies as they arrive from
/// the request. The value cannot be read back out directly; it must pass
/// through a [`Sanitizer`](crate::Sanitizer) or a
/// [`Validator`](crate::Validator), which return a
/// [`Verified<T>`](crate::Verified).
///
/// # Examples
///
/// ```
/// use blog_policy::Tainted;
///
/// let body = Tainted::new("<script>steal()</script>".to_string());
/// println!("{:?}", body); // Tainted { inner: "<script>steal()</script>" }
///
/// // let html: String = body; // Won't compile
/// ```
// Clone: `TaintedForm::field` hands out copies of the stored form values.
#[derive(Clone)]
pub struct Tainted<T> {
    // Must remain private; the only way out is a Sanitizer or Validator.
    inner: T,
}

impl<T> Tainted<T> {
    /// Wraps an untrusted value.
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }

    /// Extracts the inner value for sanitization or validation.
    ///
    /// `pub(crate)` so that only the sanitizers and validators of this crate
    /// can reach the raw input.
    pub(crate) fn into_inner(self) -> T {
        self.inner
    }
}

// No Deref, AsRef, Borrow or From/Into impls: any of them would let raw
// input flow into the store without passing a sanitizer.

impl<T: fmt::Debug> fmt::Debug for Tainted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tainted")
            .field("inner", &self.inner)
            .finish()
    }
}
