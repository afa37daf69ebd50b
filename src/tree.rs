use crate::arena::{Arena, NodeId};
use crate::error::InsertError;
use crate::params::Captures;
use crate::pattern::{self, Fragment, Remaining, MAX_FRAGMENT_LEN};

use std::fmt;

/// A node slot of the radix tree.
///
/// Callers never build nodes themselves: they hand a slice of default slots to
/// [`Router::new`](crate::Router::new), and the router fills them in as routes
/// are inserted.
///
/// ```
/// use fixroute::{Node, Router};
///
/// let mut slots: [Node<u32>; 16] = std::array::from_fn(|_| Node::default());
/// let mut router = Router::new(&mut slots);
/// router.insert("/", 0).unwrap();
/// ```
#[derive(Debug)]
pub struct Node<'r, T> {
    pub(crate) fragment: Fragment<'r>,
    pub(crate) value: Option<T>,
    pub(crate) child: Option<NodeId>,
    pub(crate) sibling: Option<NodeId>,
}

impl<'r, T> Node<'r, T> {
    pub(crate) fn new(fragment: Fragment<'r>, value: Option<T>) -> Self {
        Node {
            fragment,
            value,
            child: None,
            sibling: None,
        }
    }

    pub(crate) fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }
}

impl<T> Default for Node<'_, T> {
    fn default() -> Self {
        Node::new(Fragment::Static(b""), None)
    }
}

// A slot in the tree that holds a node index: the root, or a node's child or
// sibling link.
#[derive(Clone, Copy, Debug)]
enum Link {
    Root,
    Child(NodeId),
    Sibling(NodeId),
}

// A non-empty remainder of a pattern, to be planted as a chain of nodes.
#[derive(Debug)]
struct Chain<'r> {
    head: Fragment<'r>,
    rest: Remaining<'r>,
}

impl<'r> Chain<'r> {
    fn new(mut rest: Remaining<'r>) -> Option<Self> {
        let head = rest.next()?;
        Some(Chain { head, rest })
    }

    fn len(&self) -> usize {
        1 + self.rest.clone().count()
    }
}

// The mutation an insertion performs, computed before anything is touched.
#[derive(Debug)]
enum Plan<'r> {
    // The route ends on an existing node without a value.
    Attach(NodeId),
    // The remainder hangs off `link`; whatever `link` pointed to becomes the
    // remainder's next sibling.
    Extend {
        link: Link,
        chain: Chain<'r>,
    },
    // The route diverges, or ends, inside a literal fragment.
    Split {
        node: NodeId,
        prefix: &'r [u8],
        suffix: &'r [u8],
        chain: Option<Chain<'r>>,
    },
}

impl Plan<'_> {
    // The number of slots the plan allocates.
    fn slots(&self) -> usize {
        match self {
            Plan::Attach(_) => 0,
            Plan::Extend { chain, .. } => chain.len(),
            Plan::Split { chain, .. } => 1 + chain.as_ref().map_or(0, Chain::len),
        }
    }
}

enum Compare<'r> {
    // Not even the first unit matched.
    Diverged,
    // A parameter met a catch-all at the same position.
    Conflict,
    // Part of a literal fragment matched.
    Partial { prefix: &'r [u8], suffix: &'r [u8] },
    // The whole fragment matched.
    Full,
}

// Matches `fragment` against the front of `rest`, consuming what matched.
fn compare<'r>(fragment: Fragment<'r>, rest: &mut Remaining<'_>) -> Compare<'r> {
    match (fragment, rest.peek()) {
        (Fragment::Param(_), Some(Fragment::Param(_)))
        | (Fragment::CatchAll(_), Some(Fragment::CatchAll(_))) => {
            rest.next();
            Compare::Full
        }
        (Fragment::Param(_), Some(Fragment::CatchAll(_)))
        | (Fragment::CatchAll(_), Some(Fragment::Param(_))) => Compare::Conflict,
        (Fragment::Static(bytes), _) => {
            let mut at = 0;

            while at < bytes.len() {
                let Some(Fragment::Static(next)) = rest.peek() else {
                    break;
                };

                let n = common_prefix(&bytes[at..], next);
                at += n;
                rest.advance(n);

                if n < next.len() {
                    break;
                }
            }

            match at {
                0 => Compare::Diverged,
                at if at == bytes.len() => Compare::Full,
                at => Compare::Partial {
                    prefix: &bytes[..at],
                    suffix: &bytes[at..],
                },
            }
        }
        _ => Compare::Diverged,
    }
}

fn common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(a, b)| a == b).count()
}

/// The radix tree behind a [`Router`](crate::Router).
pub(crate) struct Tree<'s, 'r, T> {
    pub(crate) arena: Arena<'s, 'r, T>,
    root: Option<NodeId>,
    routes: usize,
}

impl<'s, 'r, T> Tree<'s, 'r, T> {
    pub(crate) fn new(slots: &'s mut [Node<'r, T>]) -> Self {
        Tree {
            arena: Arena::new(slots),
            root: None,
            routes: 0,
        }
    }

    pub(crate) fn routes(&self) -> usize {
        self.routes
    }

    /// Inserts a route, returning the free space left in the arena.
    ///
    /// The tree is left untouched if the insertion fails.
    pub(crate) fn insert(&mut self, route: &'r str, value: T) -> Result<usize, InsertError> {
        pattern::validate(route)?;

        let plan = self.plan(Remaining::new(route))?;
        if plan.slots() > self.arena.remaining_slots() {
            return Err(InsertError::BufferFull);
        }

        self.apply(plan, value)?;
        self.routes += 1;
        Ok(self.arena.remaining())
    }

    fn plan(&self, mut rest: Remaining<'r>) -> Result<Plan<'r>, InsertError> {
        let mut link = Link::Root;
        let mut current = self.root;

        loop {
            let Some(id) = current else {
                // the sibling list behind `link` is exhausted, the remainder goes last
                return Chain::new(rest)
                    .map(|chain| Plan::Extend { link, chain })
                    .ok_or(InsertError::PathExists);
            };

            let node = &self.arena[id];
            match compare(node.fragment, &mut rest) {
                Compare::Conflict => return Err(InsertError::PathExists),
                // literals are spliced in front of the parameter they would shadow
                Compare::Diverged if node.fragment.is_wildcard() => {
                    return Chain::new(rest)
                        .map(|chain| Plan::Extend { link, chain })
                        .ok_or(InsertError::PathExists);
                }
                Compare::Diverged => {
                    link = Link::Sibling(id);
                    current = node.sibling;
                }
                Compare::Partial { prefix, suffix } => {
                    return Ok(Plan::Split {
                        node: id,
                        prefix,
                        suffix,
                        chain: Chain::new(rest),
                    });
                }
                Compare::Full if rest.is_empty() => {
                    return match node.value {
                        None => Ok(Plan::Attach(id)),
                        Some(_) => Err(InsertError::PathExists),
                    };
                }
                Compare::Full => {
                    link = Link::Child(id);
                    current = node.child;
                }
            }
        }
    }

    fn apply(&mut self, plan: Plan<'r>, value: T) -> Result<(), InsertError> {
        match plan {
            Plan::Attach(id) => self.arena[id].value = Some(value),
            Plan::Extend { link, chain } => {
                let displaced = self.target(link);
                let head = self.plant(chain, value)?;
                self.arena[head].sibling = displaced;
                self.relink(link, head);
            }
            Plan::Split {
                node,
                prefix,
                suffix,
                chain,
            } => {
                let split = self.arena.alloc(Node::new(Fragment::Static(suffix), None))?;

                let parent = &mut self.arena[node];
                parent.fragment = Fragment::Static(prefix);
                let moved_value = parent.value.take();
                let moved_child = parent.child.replace(split);

                let split_node = &mut self.arena[split];
                split_node.value = moved_value;
                split_node.child = moved_child;

                tracing::trace!(
                    prefix = %Fragment::Static(prefix),
                    suffix = %Fragment::Static(suffix),
                    "split node"
                );

                match chain {
                    None => self.arena[node].value = Some(value),
                    Some(chain) => {
                        let head = self.plant(chain, value)?;
                        self.arena[split].sibling = Some(head);
                    }
                }
            }
        }

        Ok(())
    }

    // Allocates the remainder as a chain of single-child nodes, with the value
    // on the last one.
    fn plant(&mut self, chain: Chain<'r>, value: T) -> Result<NodeId, InsertError> {
        let Chain { head, rest } = chain;
        let mut fragments = rest.peekable();
        let mut value = Some(value);

        let last = fragments.peek().is_none();
        let first = self
            .arena
            .alloc(Node::new(head, if last { value.take() } else { None }))?;

        let mut prev = first;
        while let Some(fragment) = fragments.next() {
            let last = fragments.peek().is_none();
            let id = self
                .arena
                .alloc(Node::new(fragment, if last { value.take() } else { None }))?;

            self.arena[prev].child = Some(id);
            prev = id;
        }

        Ok(first)
    }

    fn target(&self, link: Link) -> Option<NodeId> {
        match link {
            Link::Root => self.root,
            Link::Child(id) => self.arena[id].child,
            Link::Sibling(id) => self.arena[id].sibling,
        }
    }

    fn relink(&mut self, link: Link, to: NodeId) {
        match link {
            Link::Root => self.root = Some(to),
            Link::Child(id) => self.arena[id].child = Some(to),
            Link::Sibling(id) => self.arena[id].sibling = Some(to),
        }
    }

    /// Finds the value registered for a route matching `path`.
    pub(crate) fn find<'k>(&self, path: &str, captures: &mut Captures<'_, 'k>) -> Option<&T>
    where
        'r: 'k,
    {
        let root = self.root?;
        let id = self.search(root, path.as_bytes(), 0, captures)?;
        self.arena[id].value()
    }

    // Tries every node of the sibling list starting at `start`, in order, at
    // byte `pos` of the path. Literals come first, so the first hit wins.
    fn search<'k>(
        &self,
        start: NodeId,
        path: &[u8],
        pos: usize,
        captures: &mut Captures<'_, 'k>,
    ) -> Option<NodeId>
    where
        'r: 'k,
    {
        let mut current = Some(start);

        while let Some(id) = current {
            let node = &self.arena[id];
            let mark = captures.mark();

            if let Some(next) = consume(node.fragment, path, pos, captures) {
                if next == path.len() {
                    if node.value.is_some() {
                        return Some(id);
                    }
                } else if let Some(child) = node.child {
                    if let Some(found) = self.search(child, path, next, captures) {
                        return Some(found);
                    }
                }

                captures.reset(mark);
            }

            current = node.sibling;
        }

        None
    }

    /// Walks the whole tree and reports the first broken structural invariant.
    pub(crate) fn check_invariants(&self) -> Result<(), String> {
        self.check_siblings(self.root)
    }

    fn check_siblings(&self, start: Option<NodeId>) -> Result<(), String> {
        let mut first_bytes = Vec::new();
        let mut wildcard = None;
        let mut current = start;

        while let Some(id) = current {
            let node = &self.arena[id];

            match node.fragment {
                Fragment::Static(bytes) => {
                    let Some(&first) = bytes.first() else {
                        return Err("empty literal fragment".to_owned());
                    };

                    if bytes.len() > MAX_FRAGMENT_LEN {
                        return Err(format!("fragment '{}' is too long", node.fragment));
                    }

                    if let Some(wildcard) = wildcard {
                        return Err(format!(
                            "literal '{}' is ordered after parameter '{}'",
                            node.fragment, wildcard
                        ));
                    }

                    if first_bytes.contains(&first) {
                        return Err(format!(
                            "more than one literal sibling starts like '{}'",
                            node.fragment
                        ));
                    }

                    first_bytes.push(first);
                }
                fragment => {
                    if let Some(wildcard) = wildcard {
                        return Err(format!(
                            "parameters '{}' and '{}' share a position",
                            wildcard, fragment
                        ));
                    }

                    wildcard = Some(fragment);
                }
            }

            match (node.fragment, node.child) {
                (Fragment::CatchAll(_), Some(_)) => {
                    return Err(format!("catch-all '{}' has children", node.fragment));
                }
                (Fragment::Param(_), Some(child)) => {
                    let child = &self.arena[child];
                    let slash = matches!(child.fragment, Fragment::Static(bytes) if bytes.starts_with(b"/"));
                    if !slash || child.sibling.is_some() {
                        return Err(format!(
                            "parameter '{}' is followed by something other than '/'",
                            node.fragment
                        ));
                    }
                }
                (_, None) if node.value.is_none() => {
                    return Err(format!("leaf '{}' holds no route", node.fragment));
                }
                _ => {}
            }

            self.check_siblings(node.child)?;
            current = node.sibling;
        }

        Ok(())
    }
}

// Matches a single fragment at byte `pos` of the path, returning the position
// after it.
fn consume<'k>(
    fragment: Fragment<'k>,
    path: &[u8],
    pos: usize,
    captures: &mut Captures<'_, 'k>,
) -> Option<usize> {
    let rest = &path[pos..];

    match fragment {
        Fragment::Static(bytes) => rest.starts_with(bytes).then(|| pos + bytes.len()),
        Fragment::Param(name) => {
            let len = rest.iter().position(|&c| c == b'/').unwrap_or(rest.len());
            if len == 0 {
                return None;
            }

            captures.push(name, pos, len);
            Some(pos + len)
        }
        Fragment::CatchAll(name) => {
            if rest.is_empty() {
                return None;
            }

            captures.push(name, pos, rest.len());
            Some(path.len())
        }
    }
}

/// A printable listing of a router's tree, returned by
/// [`Router::dump`](crate::Router::dump).
///
/// Each line holds one node: its fragment, indented under its parent, and the
/// value of the route ending there, if any.
pub struct Dump<'a, 's, 'r, T> {
    pub(crate) tree: &'a Tree<'s, 'r, T>,
}

impl<T: fmt::Debug> Dump<'_, '_, '_, T> {
    fn print(&self, f: &mut fmt::Formatter<'_>, start: Option<NodeId>, depth: usize) -> fmt::Result {
        let mut current = start;

        while let Some(id) = current {
            let node = &self.tree.arena[id];
            let fragment = node.fragment.to_string();
            let marker = if depth == 0 { '-' } else { '└' };
            let line = format!("|{:depth$}{marker}{fragment}", "");

            match &node.value {
                Some(value) => writeln!(f, "{line:<50} -> {value:?}")?,
                None => writeln!(f, "{line:<50} -> -")?,
            }

            self.print(f, node.child, depth + fragment.chars().count())?;
            current = node.sibling;
        }

        Ok(())
    }
}

impl<T: fmt::Debug> fmt::Display for Dump<'_, '_, '_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "router: {} routes, {}/{} slots",
            self.tree.routes,
            self.tree.arena.len(),
            self.tree.arena.capacity()
        )?;
        self.print(f, self.tree.root, 0)
    }
}
