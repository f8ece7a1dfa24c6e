pub mod lexer;
pub mod line;
pub mod token;

pub use lexer::{Lexed, tokenize};
pub use line::{Expansion, Line, LineBody, SourceLine, expand};
pub use token::{Recognize, Token, TokenKind};
