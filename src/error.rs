use thiserror::Error;

/// Represents errors that can occur when inserting a new route.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Error)]
pub enum InsertError {
    /// An equivalent route is already registered. Parameter names do not take
    /// part in the comparison, so `/users/{id}` and `/users/{name}` are the same
    /// route.
    #[error("insertion failed due to conflict with a previously registered route")]
    PathExists,
    /// The arena has no room left for the nodes this route needs.
    #[error("insertion failed because the node arena is full")]
    BufferFull,
    /// The route pattern is not well formed.
    #[error("malformed route pattern at byte {at}: {reason}")]
    MalformedPath {
        /// Byte offset into the pattern where the problem was detected.
        at: usize,
        /// What is wrong with the pattern.
        reason: Malformed,
    },
}

impl InsertError {
    /// Returns the numeric code of this error.
    ///
    /// The codes are stable: `-1` for [`PathExists`](InsertError::PathExists),
    /// `-2` for [`BufferFull`](InsertError::BufferFull) and `-3` for
    /// [`MalformedPath`](InsertError::MalformedPath). Successful insertions never
    /// produce a negative value, which lets callers that want a single integer
    /// fold both outcomes together.
    pub fn code(&self) -> i32 {
        match self {
            Self::PathExists => -1,
            Self::BufferFull => -2,
            Self::MalformedPath { .. } => -3,
        }
    }

    pub(crate) fn malformed(at: usize, reason: Malformed) -> Self {
        Self::MalformedPath { at, reason }
    }
}

/// The reason a route pattern was rejected.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Error)]
pub enum Malformed {
    /// The pattern is the empty string.
    #[error("the pattern is empty")]
    Empty,
    /// A `{` opened a parameter that is never closed.
    #[error("parameter is not closed")]
    UnclosedParam,
    /// A lone `}` appears outside of a parameter.
    #[error("unmatched closing brace, use `}}}}` for a literal brace")]
    UnmatchedBrace,
    /// Parameters must be registered with a name.
    #[error("parameters must be registered with a name")]
    EmptyName,
    /// Parameter names may only contain ASCII alphanumeric characters.
    #[error("parameter names may only contain ASCII alphanumeric characters")]
    InvalidName,
    /// A parameter must be followed by `/` or the end of the pattern.
    #[error("a parameter must be followed by `/` or the end of the route")]
    ParamSuffix,
    /// Catch-all parameters are only allowed at the end of a pattern.
    #[error("catch-all parameters are only allowed at the end of a route")]
    CatchAllNotLast,
}

/// A failed match attempt.
///
/// ```
/// use fixroute::{MatchError, Node, Router};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut slots: Vec<Node<&str>> = std::iter::repeat_with(Node::default).take(8).collect();
/// let mut router = Router::new(&mut slots);
/// router.insert("/home", "Welcome!")?;
/// router.insert("/blog/", "Our blog.")?;
///
/// // no routes match
/// if let Err(err) = router.at("/foobar") {
///     assert_eq!(err, MatchError::NotFound);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Copy, Error)]
pub enum MatchError {
    /// No matching route was found.
    #[error("matching route not found")]
    NotFound,
}
