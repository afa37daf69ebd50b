//! A zero-copy, allocation-free URL router.
//!
//! `fixroute` maps route patterns to values inside a fixed set of node slots
//! supplied by the caller. Routes are stored in a compressed radix tree, and
//! matching never allocates, which makes the router a good fit for request
//! dispatch under tight memory budgets.
//!
//! ```rust
//! use fixroute::{Capture, Node, Router};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut slots: [Node<&str>; 32] = std::array::from_fn(|_| Node::default());
//! let mut router = Router::new(&mut slots);
//! router.insert("/home", "Welcome!")?;
//! router.insert("/users/{id}", "A User")?;
//!
//! let mut captures = [Capture::default(); 4];
//! let matched = router.find("/users/978", &mut captures)?;
//! assert_eq!(matched.get("id"), Some("978"));
//! assert_eq!(*matched.value, "A User");
//! # Ok(())
//! # }
//! ```
//!
//! # Parameters
//!
//! The router supports dynamic route segments. These can either be named or
//! catch-all parameters.
//!
//! Named parameters like `/{id}` match anything until the next `/` or the end
//! of the path. A named parameter may be prefixed by literal text within its
//! segment (`/user_{name}`), but never followed by it.
//!
//! ```rust
//! # use fixroute::{Capture, Node, Router};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let mut slots: Vec<Node<bool>> = std::iter::repeat_with(Node::default).take(16).collect();
//! let mut router = Router::new(&mut slots);
//! router.insert("/users/{id}", true)?;
//!
//! let mut captures = [Capture::default(); 1];
//! assert_eq!(router.find("/users/1", &mut captures)?.get("id"), Some("1"));
//! assert_eq!(router.find("/users/23", &mut captures)?.get("id"), Some("23"));
//! assert!(router.at("/users").is_err());
//! # Ok(())
//! # }
//! ```
//!
//! Catch-all parameters start with `*` and match anything until the end of the
//! path, slashes included. They must always be at the end of the route.
//!
//! ```rust
//! # use fixroute::{Capture, Node, Router};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let mut slots: Vec<Node<bool>> = std::iter::repeat_with(Node::default).take(16).collect();
//! let mut router = Router::new(&mut slots);
//! router.insert("/{*p}", true)?;
//!
//! let mut captures = [Capture::default(); 1];
//! assert_eq!(router.find("/foo.js", &mut captures)?.get("p"), Some("foo.js"));
//! assert_eq!(router.find("/c/bar.css", &mut captures)?.get("p"), Some("c/bar.css"));
//!
//! // note that this will not match
//! assert!(router.at("/").is_err());
//! # Ok(())
//! # }
//! ```
//!
//! The literal characters `{` and `}` may be included in a static route by
//! escaping them with the same character. For example, the `{` character is
//! escaped with `{{` and the `}` character is escaped with `}}`.
//!
//! ```rust
//! # use fixroute::{Capture, Node, Router};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let mut slots: Vec<Node<bool>> = std::iter::repeat_with(Node::default).take(16).collect();
//! let mut router = Router::new(&mut slots);
//! router.insert("/{{hello}}", true)?;
//! router.insert("/{hello}", true)?;
//!
//! let mut captures = [Capture::default(); 1];
//!
//! // match the static route
//! assert!(router.find("/{hello}", &mut captures)?.is_empty());
//!
//! // match the dynamic route
//! assert_eq!(router.find("/hello", &mut captures)?.get("hello"), Some("hello"));
//! # Ok(())
//! # }
//! ```
//!
//! # Conflict Rules
//!
//! Static and dynamic route segments are allowed to overlap. If they do, static
//! segments will be given higher priority:
//!
//! ```rust
//! # use fixroute::{Node, Router};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let mut slots: Vec<Node<&str>> = std::iter::repeat_with(Node::default).take(16).collect();
//! let mut router = Router::new(&mut slots);
//! router.insert("/", "Welcome!")?;      // priority: 1
//! router.insert("/about", "About Me")?; // priority: 1
//! router.insert("/{*filepath}", "...")?; // priority: 2
//! # Ok(())
//! # }
//! ```
//!
//! Routes that differ only in parameter names are the same route and conflict,
//! and a named parameter cannot share a position with a catch-all:
//!
//! ```rust
//! # use fixroute::{InsertError, Node, Router};
//! # let mut slots: Vec<Node<()>> = std::iter::repeat_with(Node::default).take(16).collect();
//! let mut router = Router::new(&mut slots);
//! router.insert("/users/{id}", ()).unwrap();
//! assert_eq!(router.insert("/users/{name}", ()), Err(InsertError::PathExists));
//! assert_eq!(router.insert("/users/{*rest}", ()), Err(InsertError::PathExists));
//! ```
//!
//! # Memory
//!
//! The router stores its tree in the slots passed to [`Router::new`]. Each
//! successful insertion returns the free space left, in bytes, and an insertion
//! that does not fit fails with [`InsertError::BufferFull`] without modifying
//! the tree. Route patterns are borrowed, not copied, so they must outlive the
//! router; string literals always do.
//!
//! # How does it work?
//!
//! The router takes advantage of the fact that URL routes generally follow a
//! hierarchical structure. Routes are stored in a radix trie that makes heavy
//! use of common prefixes. This is what [`Router::dump`] prints for a small
//! set of routes:
//!
//! ```text
//! router: 8 routes, 11/64 slots
//! |-/                                                -> 1
//! | └s                                               -> -
//! |  └earch/                                         -> 2
//! |  └upport/                                        -> 3
//! | └blog/                                           -> 4
//! |      └{post}                                     -> -
//! |            └/                                    -> 5
//! | └about-us/                                       -> 6
//! |           └team/                                 -> 7
//! | └contact/                                        -> 8
//! ```
//!
//! Every node holds either literal text or a single parameter. Among the
//! children of a node, literal children come first and at most one of them
//! starts with any given byte, so a lookup only ever has two candidates to try
//! at each level: the literal child that starts with the next byte of the path,
//! and the parameter child.

#![deny(clippy::all)]
#![forbid(unsafe_code)]

mod arena;
mod error;
mod params;
mod pattern;
mod router;
mod tree;

pub use arena::Arena;
pub use error::{InsertError, Malformed, MatchError};
pub use params::{Capture, Match, ParamsIter};
pub use pattern::MAX_FRAGMENT_LEN;
pub use router::Router;
pub use tree::{Dump, Node};
