use crate::error::{InsertError, Malformed};

use std::fmt;

/// The longest literal fragment stored on a single node.
///
/// Longer literal runs are spread over a chain of nodes.
pub const MAX_FRAGMENT_LEN: usize = 127;

/// A single piece of a route pattern, as stored on a tree node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Fragment<'r> {
    /// Literal bytes, with `{{` and `}}` escapes already resolved.
    Static(&'r [u8]),
    /// A named parameter, `{name}`.
    Param(&'r str),
    /// A catch-all parameter, `{*name}`.
    CatchAll(&'r str),
}

impl Fragment<'_> {
    pub(crate) fn is_wildcard(&self) -> bool {
        !matches!(self, Fragment::Static(_))
    }
}

impl fmt::Display for Fragment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fragment::Static(bytes) => {
                for c in String::from_utf8_lossy(bytes).chars() {
                    match c {
                        '{' => f.write_str("{{")?,
                        '}' => f.write_str("}}")?,
                        c => write!(f, "{c}")?,
                    }
                }
                Ok(())
            }
            Fragment::Param(name) => write!(f, "{{{name}}}"),
            Fragment::CatchAll(name) => write!(f, "{{*{name}}}"),
        }
    }
}

/// Checks that a route pattern is well formed, without touching any tree.
pub(crate) fn validate(route: &str) -> Result<(), InsertError> {
    if route.is_empty() {
        return Err(InsertError::malformed(0, Malformed::Empty));
    }

    Lexer::new(route).try_for_each(|fragment| fragment.map(drop))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    // Scanning literal text; a lone `{` switches to a parameter.
    Literal,
    // A parameter was just closed: only `/` or the end may follow.
    AfterParam,
    // A catch-all was just closed: only the end may follow.
    AfterCatchAll,
    Done,
}

/// Splits a route pattern into fragments.
///
/// Literal runs are cut at every escape (the first brace of `{{` or `}}` is
/// kept as the literal, the second is skipped) and at [`MAX_FRAGMENT_LEN`], so
/// every literal fragment is a plain slice of the pattern.
#[derive(Clone, Debug)]
pub(crate) struct Lexer<'r> {
    route: &'r str,
    pos: usize,
    state: State,
}

impl<'r> Lexer<'r> {
    pub(crate) fn new(route: &'r str) -> Self {
        Lexer {
            route,
            pos: 0,
            state: State::Literal,
        }
    }

    fn fail(&mut self, at: usize, reason: Malformed) -> Result<Fragment<'r>, InsertError> {
        self.state = State::Done;
        Err(InsertError::malformed(at, reason))
    }

    fn literal(&mut self) -> Result<Fragment<'r>, InsertError> {
        let bytes = self.route.as_bytes();
        let start = self.pos;

        while self.pos < bytes.len() && self.pos - start < MAX_FRAGMENT_LEN {
            match (bytes[self.pos], bytes.get(self.pos + 1)) {
                (b'{', Some(b'{')) | (b'}', Some(b'}')) => {
                    let end = self.pos + 1;
                    self.pos += 2;
                    return Ok(Fragment::Static(&bytes[start..end]));
                }
                (b'{', _) => break,
                (b'}', _) => return self.fail(self.pos, Malformed::UnmatchedBrace),
                _ => self.pos += 1,
            }
        }

        Ok(Fragment::Static(&bytes[start..self.pos]))
    }

    fn param(&mut self) -> Result<Fragment<'r>, InsertError> {
        let bytes = self.route.as_bytes();
        let open = self.pos;
        let mut pos = open + 1;

        let catch_all = bytes.get(pos) == Some(&b'*');
        if catch_all {
            pos += 1;
        }

        let name_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_alphanumeric() {
            pos += 1;
        }

        match bytes.get(pos) {
            None => self.fail(open, Malformed::UnclosedParam),
            Some(b'}') if pos == name_start => self.fail(open, Malformed::EmptyName),
            Some(b'}') => {
                self.pos = pos + 1;
                let name = &self.route[name_start..pos];

                if catch_all {
                    self.state = State::AfterCatchAll;
                    Ok(Fragment::CatchAll(name))
                } else {
                    self.state = State::AfterParam;
                    Ok(Fragment::Param(name))
                }
            }
            Some(_) => self.fail(pos, Malformed::InvalidName),
        }
    }
}

impl<'r> Iterator for Lexer<'r> {
    type Item = Result<Fragment<'r>, InsertError>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.route.as_bytes();

        if self.pos == bytes.len() {
            self.state = State::Done;
        }

        match self.state {
            State::Done => None,
            State::AfterCatchAll => Some(self.fail(self.pos, Malformed::CatchAllNotLast)),
            State::AfterParam if bytes[self.pos] != b'/' => {
                Some(self.fail(self.pos, Malformed::ParamSuffix))
            }
            State::AfterParam => {
                self.state = State::Literal;
                Some(self.literal())
            }
            State::Literal => {
                if bytes[self.pos] == b'{' && bytes.get(self.pos + 1) != Some(&b'{') {
                    Some(self.param())
                } else {
                    Some(self.literal())
                }
            }
        }
    }
}

/// The unconsumed tail of a validated route pattern.
///
/// Only ever built from a pattern that passed [`validate`].
#[derive(Clone, Debug)]
pub(crate) struct Remaining<'r> {
    head: Option<Fragment<'r>>,
    lexer: Lexer<'r>,
}

impl<'r> Remaining<'r> {
    pub(crate) fn new(route: &'r str) -> Self {
        let mut remaining = Remaining {
            head: None,
            lexer: Lexer::new(route),
        };
        remaining.bump();
        remaining
    }

    /// Returns the next fragment without consuming it.
    pub(crate) fn peek(&self) -> Option<Fragment<'r>> {
        self.head
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Consumes `n` bytes of the leading literal fragment.
    pub(crate) fn advance(&mut self, n: usize) {
        if let Some(Fragment::Static(bytes)) = self.head {
            if n < bytes.len() {
                self.head = Some(Fragment::Static(&bytes[n..]));
            } else {
                self.bump();
            }
        }
    }

    fn bump(&mut self) {
        self.head = self.lexer.next().and_then(Result::ok);
    }
}

impl<'r> Iterator for Remaining<'r> {
    type Item = Fragment<'r>;

    fn next(&mut self) -> Option<Self::Item> {
        let head = self.head?;
        self.bump();
        Some(head)
    }
}
