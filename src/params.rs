use std::ops::Range;
use std::{fmt, iter, slice};

/// A single captured parameter: the parameter's name and the span of the path
/// it matched.
///
/// Captures are views into the path passed to
/// [`Router::find`](crate::Router::find); use [`Capture::value`] with that same
/// path to read the captured text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Capture<'k> {
    key: &'k str,
    start: usize,
    len: usize,
}

impl<'k> Capture<'k> {
    /// The parameter name, as registered in the route.
    pub fn key(&self) -> &'k str {
        self.key
    }

    /// The byte offset of the capture in the path.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The length of the capture in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` for an unused capture slot.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The byte range of the capture in the path.
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }

    /// Returns the captured text of `path`.
    ///
    /// `path` must be the path the capture was produced from, otherwise the
    /// result is meaningless (or empty if the range is out of bounds).
    pub fn value<'p>(&self, path: &'p str) -> &'p str {
        path.get(self.range()).unwrap_or_default()
    }
}

// Records captures into the caller's buffer during a lookup, counting the ones
// that do not fit.
pub(crate) struct Captures<'c, 'k> {
    buf: &'c mut [Capture<'k>],
    stored: usize,
    total: usize,
}

impl<'c, 'k> Captures<'c, 'k> {
    pub(crate) fn new(buf: &'c mut [Capture<'k>]) -> Self {
        Captures {
            buf,
            stored: 0,
            total: 0,
        }
    }

    pub(crate) fn push(&mut self, key: &'k str, start: usize, len: usize) {
        if let Some(slot) = self.buf.get_mut(self.stored) {
            *slot = Capture { key, start, len };
            self.stored += 1;
        }

        self.total += 1;
    }

    pub(crate) fn mark(&self) -> (usize, usize) {
        (self.stored, self.total)
    }

    // Forgets everything pushed since `mark`.
    pub(crate) fn reset(&mut self, (stored, total): (usize, usize)) {
        self.stored = stored;
        self.total = total;
    }

    pub(crate) fn total(&self) -> usize {
        self.total
    }

    pub(crate) fn into_recorded(self) -> &'c [Capture<'k>] {
        &self.buf[..self.stored]
    }
}

/// A successful match: the value of the matched route and the captured
/// parameters.
///
/// ```rust
/// use fixroute::{Capture, Node, Router};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut slots: Vec<Node<bool>> = std::iter::repeat_with(Node::default).take(8).collect();
/// let mut router = Router::new(&mut slots);
/// router.insert("/users/{id}", true)?;
///
/// let mut captures = [Capture::default(); 4];
/// let matched = router.find("/users/1", &mut captures)?;
///
/// // Iterate through the keys and values.
/// for (key, value) in matched.iter() {
///     println!("key: {}, value: {}", key, value);
/// }
///
/// // Get a specific value by name.
/// let id = matched.get("id");
/// assert_eq!(id, Some("1"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Match<'m, 'p, 'k, T> {
    /// The value registered for the matched route.
    pub value: &'m T,
    path: &'p str,
    captures: &'m [Capture<'k>],
    total: usize,
}

impl<'m, 'p, 'k, T> Match<'m, 'p, 'k, T> {
    pub(crate) fn new(
        value: &'m T,
        path: &'p str,
        captures: &'m [Capture<'k>],
        total: usize,
    ) -> Self {
        Match {
            value,
            path,
            captures,
            total,
        }
    }

    /// Returns the number of captures recorded in the caller's buffer.
    pub fn len(&self) -> usize {
        self.captures.len()
    }

    /// Returns `true` if no capture was recorded.
    pub fn is_empty(&self) -> bool {
        self.captures.is_empty()
    }

    /// Returns the number of parameters the matched route captured, including
    /// those that did not fit in the caller's buffer.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Returns `true` if the caller's buffer was too small to hold every
    /// capture.
    pub fn is_truncated(&self) -> bool {
        self.total > self.captures.len()
    }

    /// Returns the value of the first recorded parameter registered under the
    /// given key.
    pub fn get(&self, key: impl AsRef<str>) -> Option<&'p str> {
        let key = key.as_ref();

        self.captures
            .iter()
            .find(|capture| capture.key == key)
            .map(|capture| capture.value(self.path))
    }

    /// Returns an iterator over the recorded parameters, in path order.
    pub fn iter(&self) -> ParamsIter<'m, 'p, 'k> {
        ParamsIter {
            path: self.path,
            inner: self.captures.iter(),
        }
    }

    /// Returns the recorded captures.
    pub fn captures(&self) -> &'m [Capture<'k>] {
        self.captures
    }
}

/// An iterator over the keys and values of a [`Match`]'s parameters.
pub struct ParamsIter<'m, 'p, 'k> {
    path: &'p str,
    inner: slice::Iter<'m, Capture<'k>>,
}

impl<'p, 'k> Iterator for ParamsIter<'_, 'p, 'k> {
    type Item = (&'k str, &'p str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|capture| (capture.key, capture.value(self.path)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for ParamsIter<'_, '_, '_> {}

impl iter::FusedIterator for ParamsIter<'_, '_, '_> {}

impl fmt::Debug for ParamsIter<'_, '_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(ParamsIter {
                path: self.path,
                inner: self.inner.clone(),
            })
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_until_full() {
        let mut buf = [Capture::default(); 2];
        let mut captures = Captures::new(&mut buf);

        captures.push("a", 1, 2);
        captures.push("b", 4, 1);
        captures.push("c", 6, 3);

        assert_eq!(captures.total(), 3);
        let recorded = captures.into_recorded();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[1].key(), "b");
        assert_eq!(recorded[1].range(), 4..5);
    }

    #[test]
    fn reset_forgets_later_pushes() {
        let mut buf = [Capture::default(); 4];
        let mut captures = Captures::new(&mut buf);

        captures.push("a", 0, 1);
        let mark = captures.mark();
        captures.push("b", 2, 1);
        captures.reset(mark);
        captures.push("c", 2, 3);

        assert_eq!(captures.total(), 2);
        let keys: Vec<&str> = captures.into_recorded().iter().map(Capture::key).collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn match_accessors() {
        let path = "/users/42/files/a/b";
        let captures = [
            Capture {
                key: "id",
                start: 7,
                len: 2,
            },
            Capture {
                key: "rest",
                start: 16,
                len: 3,
            },
        ];

        let matched = Match::new(&(), path, &captures, 3);
        assert_eq!(matched.len(), 2);
        assert!(matched.is_truncated());
        assert_eq!(matched.get("id"), Some("42"));
        assert_eq!(matched.get("rest"), Some("a/b"));
        assert_eq!(matched.get("missing"), None);
        assert!(matched.iter().eq(vec![("id", "42"), ("rest", "a/b")]));
        assert_eq!(matched.iter().len(), 2);
    }

    #[test]
    fn value_out_of_bounds() {
        let capture = Capture {
            key: "x",
            start: 10,
            len: 4,
        };
        assert_eq!(capture.value("/short"), "");
    }
}
