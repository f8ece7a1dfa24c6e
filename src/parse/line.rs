//! Per-line records carried through the substitution passes.

use super::lexer::tokenize;
use super::token::{Recognize, Token, TokenKind};

/// An unmodified line of a template file. `index` is 0-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineBody {
    /// Still holds tokens that may be substituted.
    Tokenized(Vec<Token>),
    /// All substitution is finished.
    Flattened { content: String, comment: String },
}

/// One logical line. Lines split by a multi-line substitution value all keep
/// the `source` index of the line they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub body: LineBody,
    pub source: usize,
    pub expanded: bool,
}

impl Line {
    pub fn tokenized(tokens: Vec<Token>, source: usize, expanded: bool) -> Self {
        Self {
            body: LineBody::Tokenized(tokens),
            source,
            expanded,
        }
    }

    /// Lex a raw source line with every prefix recognized.
    pub fn lex(source: &SourceLine) -> (Self, Option<String>) {
        let lexed = tokenize(&source.text, Recognize::EnvVar);
        (Self::tokenized(lexed.tokens, source.index, false), lexed.fatal)
    }

    /// Text outside the comment. Unresolved tokens show their literal text.
    pub fn content(&self) -> String {
        match &self.body {
            LineBody::Flattened { content, .. } => content.clone(),
            LineBody::Tokenized(tokens) => tokens
                .iter()
                .filter(|t| !t.is_comment())
                .map(|t| match t.kind {
                    TokenKind::Text => t.value.as_str(),
                    _ => t.literal.as_str(),
                })
                .collect(),
        }
    }

    /// The comment, including its `#`, or an empty string.
    pub fn comment(&self) -> String {
        match &self.body {
            LineBody::Flattened { comment, .. } => comment.clone(),
            LineBody::Tokenized(tokens) => tokens
                .iter()
                .filter(|t| t.is_comment())
                .map(|t| t.literal.as_str())
                .collect(),
        }
    }

    pub fn has_comment(&self) -> bool {
        !self.comment().is_empty()
    }

    /// Tokens of the given kind still awaiting substitution.
    pub fn pending(&self, kind: TokenKind) -> impl Iterator<Item = &Token> {
        let tokens: &[Token] = match &self.body {
            LineBody::Tokenized(tokens) => tokens,
            LineBody::Flattened { .. } => &[],
        };
        tokens.iter().filter(move |t| t.kind == kind)
    }

    pub fn flatten(self) -> Self {
        match self.body {
            LineBody::Flattened { .. } => self,
            LineBody::Tokenized(_) => Self {
                body: LineBody::Flattened {
                    content: self.content(),
                    comment: self.comment(),
                },
                source: self.source,
                expanded: self.expanded,
            },
        }
    }
}

/// Lines produced by [`expand`], plus lexer errors found in resolved values.
#[derive(Debug)]
pub struct Expansion {
    pub lines: Vec<Line>,
    pub fatals: Vec<String>,
    /// Tokens of the expanded kind folded into a comment without being resolved.
    pub swallowed: usize,
}

/// Substitute every `kind` token of `line` through `resolve`.
///
/// `resolve` returns `None` to leave a token untouched (it records its own
/// fatal). A resolved value is re-lexed one depth below `kind`; each newline
/// in it closes the current line and starts a new one with the same source
/// index. If the value opens a comment, the rest of the original line is
/// folded into that comment and is not substituted; `swallowed` counts the
/// tokens of `kind` lost that way.
pub fn expand<F>(line: Line, kind: TokenKind, mut resolve: F) -> Expansion
where
    F: FnMut(&Token) -> Option<String>,
{
    let depth = kind.depth().map_or(Recognize::Comment, Recognize::below);
    let source = line.source;
    let mut expanded = line.expanded;
    let tokens = match line.body {
        LineBody::Tokenized(tokens) => tokens,
        LineBody::Flattened { .. } => {
            return Expansion {
                lines: vec![line],
                fatals: Vec::new(),
                swallowed: 0,
            };
        }
    };

    let mut lines = Vec::new();
    let mut fatals = Vec::new();
    let mut swallowed = 0;
    let mut current: Vec<Token> = Vec::new();
    let lex = |text: &str, fatals: &mut Vec<String>| {
        let text = text.strip_suffix('\r').unwrap_or(text);
        let lexed = tokenize(text, depth);
        fatals.extend(lexed.fatal);
        lexed.tokens
    };

    let mut rest = tokens.into_iter();
    while let Some(token) = rest.next() {
        if token.kind != kind {
            current.push(token);
            continue;
        }
        let Some(value) = resolve(&token) else {
            current.push(token);
            continue;
        };
        expanded = true;

        let mut parts = value.split('\n');
        if let Some(head) = parts.next() {
            current.extend(lex(head, &mut fatals));
        }
        for part in parts {
            let done = std::mem::take(&mut current);
            lines.push(Line::tokenized(done, source, true));
            current = lex(part, &mut fatals);
        }

        if let Some(comment) = current.last_mut().filter(|t| t.is_comment()) {
            for token in rest.by_ref() {
                if token.kind == kind {
                    swallowed += 1;
                }
                comment.value.push_str(&token.literal);
                comment.literal.push_str(&token.literal);
            }
        }
    }

    lines.push(Line::tokenized(current, source, expanded));
    Expansion {
        lines,
        fatals,
        swallowed,
    }
}
