//! Token types produced by the template lexer.

/// Kind of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Plain text. `value` has escapes removed, `literal` keeps them.
    Text,
    /// `# ...` through the end of the line.
    Comment,
    /// `${NAME}`
    EnvVar,
    /// `$(command args)`
    Executable,
    /// An unterminated construct; `literal` holds the rest of the line.
    Error,
}

/// Which special prefixes the lexer recognizes.
///
/// Each level also recognizes everything ordered below it, so
/// `Recognize::EnvVar` is a full lex and `Recognize::Comment` only splits
/// off comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Recognize {
    Comment,
    Executable,
    EnvVar,
}

impl Recognize {
    /// The depth used to re-lex a value produced at this depth.
    pub fn below(self) -> Recognize {
        match self {
            Recognize::EnvVar => Recognize::Executable,
            Recognize::Executable | Recognize::Comment => Recognize::Comment,
        }
    }
}

impl TokenKind {
    /// Recognition depth a token of this kind was produced at, for
    /// substitutable kinds.
    pub fn depth(self) -> Option<Recognize> {
        match self {
            TokenKind::EnvVar => Some(Recognize::EnvVar),
            TokenKind::Executable => Some(Recognize::Executable),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Unescaped payload: the text, variable name, command, or comment body.
    pub value: String,
    /// The exact source substring this token was lexed from.
    pub literal: String,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, literal: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            literal: literal.into(),
        }
    }

    pub fn is_comment(&self) -> bool {
        self.kind == TokenKind::Comment
    }
}
