//! Token types produced by the [`lexer`](super::lexer).

use std::fmt;

use winnow::stream::Location;

use crate::span::Span;

/// Token types for the metamodel language.
///
/// Literal tokens borrow their raw lexeme from the source: string literals
/// keep their surrounding quotes and escapes, numbers keep their exact text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'src> {
    // Keywords
    Enum,
    Class,
    Extends,
    Att,
    Ref,
    From,
    Using,
    With,

    // Literals
    StringLiteral(&'src str),
    Number(&'src str),
    Identifier(&'src str),
    /// Dotted name such as `org.fleet.Car`, lexed as one token.
    QualifiedName(&'src str),

    // Punctuation
    At,           // @
    Colon,        // :
    Comma,        // ,
    Equals,       // =
    Semicolon,    // ;
    LeftBrace,    // {
    RightBrace,   // }
    LeftBracket,  // [
    RightBracket, // ]

    // Comments
    LineComment(&'src str),

    // Whitespace
    Whitespace,
    Newline,
}

impl Token<'_> {
    /// Returns `true` for tokens that carry no syntactic meaning.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            Token::Whitespace | Token::Newline | Token::LineComment(_)
        )
    }
}

/// A token with position information for winnow integration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span) -> Self {
        Self { token, span }
    }
}

impl<'src> std::ops::Deref for PositionedToken<'src> {
    type Target = Token<'src>;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

impl fmt::Display for PositionedToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.token.fmt(f)
    }
}

impl Location for PositionedToken<'_> {
    fn previous_token_end(&self) -> usize {
        self.span.start()
    }

    fn current_token_start(&self) -> usize {
        self.span.start()
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Enum => write!(f, "enum"),
            Token::Class => write!(f, "class"),
            Token::Extends => write!(f, "extends"),
            Token::Att => write!(f, "att"),
            Token::Ref => write!(f, "ref"),
            Token::From => write!(f, "from"),
            Token::Using => write!(f, "using"),
            Token::With => write!(f, "with"),

            Token::StringLiteral(raw) => write!(f, "{raw}"),
            Token::Number(raw) => write!(f, "{raw}"),
            Token::Identifier(name) | Token::QualifiedName(name) => write!(f, "{name}"),

            Token::At => write!(f, "@"),
            Token::Colon => write!(f, ":"),
            Token::Comma => write!(f, ","),
            Token::Equals => write!(f, "="),
            Token::Semicolon => write!(f, ";"),
            Token::LeftBrace => write!(f, "{{"),
            Token::RightBrace => write!(f, "}}"),
            Token::LeftBracket => write!(f, "["),
            Token::RightBracket => write!(f, "]"),

            Token::LineComment(comment) => write!(f, "//{comment}"),
            Token::Whitespace => write!(f, " "),
            Token::Newline => write!(f, "\\n"),
        }
    }
}
