use super::token::{Recognize, Token, TokenKind};

/// Result of lexing one line.
///
/// On error, `tokens` holds every complete token before the failure followed
/// by one `TokenKind::Error` token carrying the unterminated source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub fatal: Option<String>,
}

/// Split one template line into tokens.
///
/// `max` limits which prefixes are special: `${` needs `Recognize::EnvVar`,
/// `$(` needs `Recognize::Executable` or above, `#` is always recognized.
/// A backtick right before a recognized prefix makes it literal text, and
/// `` \` `` right before a recognized prefix is a literal backtick.
pub fn tokenize(line: &str, max: Recognize) -> Lexed {
    Lexer::new(line, max).run()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prefix {
    EnvVar,
    Executable,
    Comment,
}

impl Prefix {
    fn len(self) -> usize {
        match self {
            Prefix::EnvVar | Prefix::Executable => 2,
            Prefix::Comment => 1,
        }
    }
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    max: Recognize,
    tokens: Vec<Token>,
    text: String,
    literal: String,
}

impl Lexer {
    fn new(line: &str, max: Recognize) -> Self {
        Self {
            chars: line.chars().collect(),
            pos: 0,
            max,
            tokens: Vec::new(),
            text: String::new(),
            literal: String::new(),
        }
    }

    /// Recognized prefix starting at `i`, if any.
    fn prefix_at(&self, i: usize) -> Option<Prefix> {
        let c = *self.chars.get(i)?;
        match c {
            '#' => Some(Prefix::Comment),
            '$' => match self.chars.get(i + 1) {
                Some('{') if self.max >= Recognize::EnvVar => Some(Prefix::EnvVar),
                Some('(') if self.max >= Recognize::Executable => Some(Prefix::Executable),
                _ => None,
            },
            _ => None,
        }
    }

    fn rest_from(&self, start: usize) -> String {
        self.chars[start..].iter().collect()
    }

    fn flush_text(&mut self) {
        if !self.literal.is_empty() {
            let value = std::mem::take(&mut self.text);
            let literal = std::mem::take(&mut self.literal);
            self.tokens.push(Token::new(TokenKind::Text, value, literal));
        }
    }

    fn run(mut self) -> Lexed {
        let len = self.chars.len();

        while self.pos < len {
            let c = self.chars[self.pos];

            // \` before a prefix: literal backtick, prefix stays special
            if c == '\\'
                && self.chars.get(self.pos + 1) == Some(&'`')
                && self.prefix_at(self.pos + 2).is_some()
            {
                self.text.push('`');
                self.literal.push_str("\\`");
                self.pos += 2;
                continue;
            }

            // `prefix: the prefix becomes plain text
            if c == '`'
                && let Some(prefix) = self.prefix_at(self.pos + 1)
            {
                self.literal.push('`');
                let start = self.pos + 1;
                for &ch in &self.chars[start..start + prefix.len()] {
                    self.text.push(ch);
                    self.literal.push(ch);
                }
                self.pos = start + prefix.len();
                continue;
            }

            match self.prefix_at(self.pos) {
                Some(Prefix::Comment) => {
                    self.flush_text();
                    let literal = self.rest_from(self.pos);
                    let value = literal[1..].to_string();
                    self.tokens.push(Token::new(TokenKind::Comment, value, literal));
                    self.pos = len;
                }
                Some(Prefix::EnvVar) => {
                    self.flush_text();
                    if let Err(message) = self.env_var() {
                        return self.fail(message);
                    }
                }
                Some(Prefix::Executable) => {
                    self.flush_text();
                    if let Err(message) = self.executable() {
                        return self.fail(message);
                    }
                }
                None => {
                    self.text.push(c);
                    self.literal.push(c);
                    self.pos += 1;
                }
            }
        }

        self.flush_text();
        Lexed {
            tokens: self.tokens,
            fatal: None,
        }
    }

    /// Emit the error token for everything from the current position.
    fn fail(mut self, message: String) -> Lexed {
        let rest = self.rest_from(self.pos);
        self.tokens
            .push(Token::new(TokenKind::Error, rest.clone(), rest));
        Lexed {
            tokens: self.tokens,
            fatal: Some(message),
        }
    }

    /// Lex `${NAME}` starting at `self.pos`. `` `} `` is a literal brace.
    fn env_var(&mut self) -> Result<(), String> {
        let start = self.pos;
        let len = self.chars.len();
        let mut name = String::new();
        let mut i = start + 2;

        while i < len {
            let c = self.chars[i];
            if c == '`' && self.chars.get(i + 1) == Some(&'}') {
                name.push('}');
                i += 2;
                continue;
            }
            if c == '}' {
                let literal: String = self.chars[start..=i].iter().collect();
                self.tokens
                    .push(Token::new(TokenKind::EnvVar, name, literal));
                self.pos = i + 1;
                return Ok(());
            }
            name.push(c);
            i += 1;
        }

        Err(format!(
            "Missing closing bracket for environment variable: {}",
            self.rest_from(start)
        ))
    }

    /// Lex `$(command args)` starting at `self.pos`.
    ///
    /// Quoted spans may contain `)`; outside quotes a literal `)` is written
    /// `` `) ``. Quotes are kept in the value for later word splitting.
    fn executable(&mut self) -> Result<(), String> {
        let start = self.pos;
        let len = self.chars.len();
        let mut command = String::new();
        let mut quote: Option<char> = None;
        let mut i = start + 2;

        while i < len {
            let c = self.chars[i];

            if let Some(q) = quote {
                command.push(c);
                if c == q {
                    quote = None;
                }
                i += 1;
                continue;
            }

            if c == '`' && self.chars.get(i + 1) == Some(&')') {
                command.push(')');
                i += 2;
                continue;
            }
            if c == '\'' || c == '"' {
                quote = Some(c);
                command.push(c);
                i += 1;
                continue;
            }
            if c == ')' {
                let literal: String = self.chars[start..=i].iter().collect();
                self.tokens
                    .push(Token::new(TokenKind::Executable, command, literal));
                self.pos = i + 1;
                return Ok(());
            }

            command.push(c);
            i += 1;
        }

        let rest = self.rest_from(start);
        if quote.is_some() {
            Err(format!("Missing closing quote for executable: {rest}"))
        } else {
            Err(format!("Missing closing parenthesis for executable: {rest}"))
        }
    }
}
