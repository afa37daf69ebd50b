use crate::arena::Arena;
use crate::error::{InsertError, MatchError};
use crate::params::{Capture, Captures, Match};
use crate::tree::{Dump, Node, Tree};

use std::fmt;

/// A URL router over a fixed, caller-owned set of node slots.
///
/// See [the crate documentation](crate) for details.
pub struct Router<'s, 'r, T> {
    tree: Tree<'s, 'r, T>,
}

impl<'s, 'r, T> Router<'s, 'r, T> {
    /// Construct a new router that stores its tree in `slots`.
    ///
    /// Every slot is reset. The router never allocates: once the slots are used
    /// up, further insertions fail with [`InsertError::BufferFull`].
    pub fn new(slots: &'s mut [Node<'r, T>]) -> Self {
        Router {
            tree: Tree::new(slots),
        }
    }

    /// Insert a route into the router.
    ///
    /// On success, returns the free space left in the arena, in bytes. The route
    /// text is borrowed for the lifetime of the router rather than copied. A
    /// failed insertion leaves the router unchanged.
    ///
    /// ```rust
    /// # use fixroute::{Node, Router};
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut slots: Vec<Node<&str>> = std::iter::repeat_with(Node::default).take(16).collect();
    /// let mut router = Router::new(&mut slots);
    /// router.insert("/home", "Welcome!")?;
    /// router.insert("/users/{id}", "A User")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn insert(&mut self, route: &'r str, value: T) -> Result<usize, InsertError> {
        match self.tree.insert(route, value) {
            Ok(remaining) => {
                tracing::debug!(route, remaining, "route inserted");
                Ok(remaining)
            }
            Err(err) => {
                tracing::debug!(route, error = %err, "route rejected");
                Err(err)
            }
        }
    }

    /// Tries to match the given path against the router, recording captured
    /// parameters into `captures`.
    ///
    /// Captures are recorded in path order until `captures` is full; the rest
    /// are counted in [`Match::total`] but not stored.
    ///
    /// ```rust
    /// # use fixroute::{Capture, Node, Router};
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut slots: Vec<Node<&str>> = std::iter::repeat_with(Node::default).take(16).collect();
    /// let mut router = Router::new(&mut slots);
    /// router.insert("/home", "Welcome!")?;
    ///
    /// let mut captures = [Capture::default(); 2];
    /// let matched = router.find("/home", &mut captures)?;
    /// assert_eq!(*matched.value, "Welcome!");
    /// assert!(matched.is_empty());
    /// # Ok(())
    /// # }
    /// ```
    pub fn find<'m, 'p, 'k>(
        &'m self,
        path: &'p str,
        captures: &'m mut [Capture<'k>],
    ) -> Result<Match<'m, 'p, 'k, T>, MatchError>
    where
        'r: 'k,
    {
        let mut captures = Captures::new(captures);
        let value = self
            .tree
            .find(path, &mut captures)
            .ok_or(MatchError::NotFound)?;

        let total = captures.total();
        Ok(Match::new(value, path, captures.into_recorded(), total))
    }

    /// Tries to match the given path against the router, ignoring parameters.
    ///
    /// ```rust
    /// # use fixroute::{Node, Router};
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut slots: Vec<Node<bool>> = std::iter::repeat_with(Node::default).take(16).collect();
    /// let mut router = Router::new(&mut slots);
    /// router.insert("/users/{id}", true)?;
    ///
    /// assert_eq!(router.at("/users/1"), Ok(&true));
    /// # Ok(())
    /// # }
    /// ```
    pub fn at(&self, path: &str) -> Result<&T, MatchError> {
        let mut none: [Capture<'r>; 0] = [];
        let mut captures = Captures::new(&mut none);
        self.tree
            .find(path, &mut captures)
            .ok_or(MatchError::NotFound)
    }

    /// Returns the number of registered routes.
    pub fn len(&self) -> usize {
        self.tree.routes()
    }

    /// Returns `true` if no route is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the arena backing this router, for monitoring headroom.
    pub fn arena(&self) -> &Arena<'s, 'r, T> {
        &self.tree.arena
    }

    /// Returns a printable listing of the tree.
    ///
    /// ```rust
    /// # use fixroute::{Node, Router};
    /// let mut slots: Vec<Node<u8>> = std::iter::repeat_with(Node::default).take(16).collect();
    /// let mut router = Router::new(&mut slots);
    /// router.insert("/users/{id}", 1).unwrap();
    /// router.insert("/users", 2).unwrap();
    ///
    /// println!("{}", router.dump());
    /// ```
    pub fn dump(&self) -> Dump<'_, 's, 'r, T> {
        Dump { tree: &self.tree }
    }

    #[doc(hidden)]
    pub fn check_invariants(&self) -> Result<(), String> {
        self.tree.check_invariants()
    }
}

impl<T> fmt::Debug for Router<'_, '_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.len())
            .field("arena", self.arena())
            .finish()
    }
}
