//! Lexical analyzer for metamodel source text.
//!
//! The lexer converts source text into a stream of [`Token`]s for parsing.
//! Literal tokens keep their raw lexeme: string literals include their quotes
//! and escapes are left untouched, numbers keep their exact text.
//!
//! The public entry point is [`tokenize`], which performs error-recovering
//! lexical analysis and collects all diagnostics in a single pass.

use winnow::{
    Parser as _,
    ascii::digit1,
    combinator::{alt, cut_err, not, opt, peek, preceded, repeat, terminated},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{literal, none_of, one_of, take_while},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
    tokens::{PositionedToken, Token},
};

/// Diagnostic details attached to winnow errors via `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    /// The error span covers from `start` to the error position.
    start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<LexerDiagnostic>>;

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parse a bare identifier and return its text.
fn identifier_text<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    (
        one_of(is_identifier_start),
        take_while(0.., is_identifier_char),
    )
        .take()
        .parse_next(input)
}

/// Parse the body of a string literal up to, but not including, the closing quote.
///
/// A backslash escapes any following character except a line break.
fn string_body(input: &mut Input<'_>) -> IResult<()> {
    repeat(
        0..,
        alt((
            preceded('\\', none_of(['\n', '\r'])).void(),
            none_of(['"', '\\', '\n', '\r']).void(),
        )),
    )
    .parse_next(input)
}

/// Parse a double-quoted string literal, keeping the quotes in the token.
fn string_literal<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start_pos = input.current_token_start();

    // Commit after the opening quote so the error covers the whole literal
    (
        '"',
        cut_err(terminated(string_body, '"')).context(LexerDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated string literal",
            help: Some("add closing `\"` before the end of the line"),
            start: start_pos,
        }),
    )
        .take()
        .map(Token::StringLiteral)
        .parse_next(input)
}

/// Parse a number: `-?[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?`.
fn number_literal<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    terminated(
        (
            opt('-'),
            digit1,
            opt(('.', digit1)),
            opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
        )
            .take(),
        // `1abc` is not a number followed by an identifier
        peek(not(one_of(is_identifier_char))),
    )
    .map(Token::Number)
    .parse_next(input)
}

/// Parse line comment starting with '//'
fn line_comment<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    preceded("//", take_while(0.., |c| c != '\n'))
        .map(Token::LineComment)
        .parse_next(input)
}

/// Parse a dotted name such as `org.fleet.Car`.
///
/// There is no whitespace around the separators; `a . b` is not a
/// qualified name.
fn qualified_name<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    (
        identifier_text,
        repeat::<_, _, (), _, _>(1.., ('.', identifier_text).void()),
    )
        .take()
        .map(Token::QualifiedName)
        .parse_next(input)
}

/// Parse keywords with word boundary checking
fn keyword<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    terminated(
        alt((
            literal("enum"),
            literal("class"),
            literal("extends"),
            literal("att"),
            literal("ref"),
            literal("from"),
            literal("using"),
            literal("with"),
        )),
        peek(not(one_of(is_identifier_char))),
    )
    .map(|keyword: &str| match keyword {
        "enum" => Token::Enum,
        "class" => Token::Class,
        "extends" => Token::Extends,
        "att" => Token::Att,
        "ref" => Token::Ref,
        "from" => Token::From,
        "using" => Token::Using,
        _ => Token::With,
    })
    .parse_next(input)
}

fn identifier<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    identifier_text.map(Token::Identifier).parse_next(input)
}

/// Parse single character tokens
fn single_char_token<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        '@'.value(Token::At),
        ':'.value(Token::Colon),
        ','.value(Token::Comma),
        '='.value(Token::Equals),
        ';'.value(Token::Semicolon),
        '{'.value(Token::LeftBrace),
        '}'.value(Token::RightBrace),
        '['.value(Token::LeftBracket),
        ']'.value(Token::RightBracket),
    ))
    .parse_next(input)
}

/// Parse whitespace (spaces, tabs, etc. but not newlines)
fn whitespace<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    take_while(1.., |c: char| c.is_whitespace() && c != '\n')
        .value(Token::Whitespace)
        .parse_next(input)
}

fn newline<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    '\n'.value(Token::Newline).parse_next(input)
}

/// Parse a single token with position tracking
fn positioned_token<'a>(input: &mut Input<'a>) -> IResult<PositionedToken<'a>> {
    let start_pos = input.current_token_start();

    let token = alt((
        line_comment,      // Must come before any single char
        string_literal,    // Must come before any single char
        number_literal,    // Must come before single chars
        qualified_name,    // Must come before keyword and identifier
        keyword,           // Must come before identifier
        identifier,        // Must come before single chars
        single_char_token, // Single character tokens
        newline,           // Must come before whitespace
        whitespace,        // General whitespace
    ))
    .parse_next(input)?;

    let end_pos = input.current_token_start();
    Ok(PositionedToken::new(token, Span::new(start_pos..end_pos)))
}

/// Lexer that accumulates tokens and diagnostics during tokenization.
struct Lexer<'a> {
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: DiagnosticCollector,
}

impl<'a> Lexer<'a> {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    /// Tokenize the input, collecting tokens and errors.
    fn tokenize(&mut self, mut input: Input<'a>) {
        while !input.is_empty() {
            match positioned_token(&mut input) {
                Ok(token) => self.tokens.push(token),
                Err(e) => {
                    let error_pos = input.current_token_start();
                    self.diagnostics.emit(Self::convert_err_mode(e, error_pos));

                    // Skip one character and keep going
                    if !input.is_empty() {
                        input.next_token();
                    }
                }
            }
        }
    }

    fn finish(self) -> Result<Vec<PositionedToken<'a>>, ParseError> {
        self.diagnostics.finish().map(|()| self.tokens)
    }

    /// Convert an ErrMode and error position to a Diagnostic.
    ///
    /// Falls back to E002 (unexpected character) if no diagnostic context is
    /// attached.
    fn convert_err_mode(err: ErrMode<ContextError<LexerDiagnostic>>, error_pos: usize) -> Diagnostic {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        if let Some(LexerDiagnostic {
            code,
            message,
            help,
            start,
        }) = context_error.context().next()
        {
            let span = Span::new(*start..error_pos.max(*start + 1));
            let mut diag = Diagnostic::error(*message)
                .with_code(*code)
                .with_label(span, code.description());
            if let Some(help) = help {
                diag = diag.with_help(*help);
            }
            return diag;
        }

        let span = Span::new(error_pos..error_pos.saturating_add(1));
        Diagnostic::error("unexpected character")
            .with_code(ErrorCode::E002)
            .with_label(span, ErrorCode::E002.description())
    }
}

/// Tokenize source text, collecting every lexical error.
///
/// # Returns
///
/// - `Ok(tokens)` - All tokens successfully lexed, trivia included
/// - `Err(ParseError)` - One or more errors occurred; contains all diagnostics
pub fn tokenize(input: &str) -> Result<Vec<PositionedToken<'_>>, ParseError> {
    let mut lexer = Lexer::new();
    lexer.tokenize(LocatingSlice::new(input));
    lexer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_single_token(input: &str, expected: Token<'_>) {
        let mut located_input = LocatingSlice::new(input);
        let positioned = positioned_token(&mut located_input)
            .unwrap_or_else(|e| panic!("Failed to lex `{input}`: {e:?}"));
        assert_eq!(positioned.token, expected);
        assert!(located_input.is_empty(), "Unconsumed input after `{input}`");
    }

    fn meaningful(input: &str) -> Vec<Token<'_>> {
        tokenize(input)
            .expect("Should tokenize")
            .into_iter()
            .map(|p| p.token)
            .filter(|t| !t.is_trivia())
            .collect()
    }

    #[test]
    fn test_keywords() {
        test_single_token("enum", Token::Enum);
        test_single_token("class", Token::Class);
        test_single_token("extends", Token::Extends);
        test_single_token("att", Token::Att);
        test_single_token("ref", Token::Ref);
        test_single_token("from", Token::From);
        test_single_token("using", Token::Using);
        test_single_token("with", Token::With);
    }

    #[test]
    fn test_keyword_word_boundaries() {
        test_single_token("classes", Token::Identifier("classes"));
        test_single_token("attr", Token::Identifier("attr"));
        test_single_token("reference", Token::Identifier("reference"));
        test_single_token("with_tax", Token::Identifier("with_tax"));
        test_single_token("enum2", Token::Identifier("enum2"));
    }

    #[test]
    fn test_identifiers() {
        test_single_token("Car", Token::Identifier("Car"));
        test_single_token("_private", Token::Identifier("_private"));
        test_single_token("var123", Token::Identifier("var123"));
    }

    #[test]
    fn test_qualified_names() {
        test_single_token("fleet.Car", Token::QualifiedName("fleet.Car"));
        test_single_token("org.fleet.Car", Token::QualifiedName("org.fleet.Car"));
        test_single_token("class.Foo", Token::QualifiedName("class.Foo"));
    }

    #[test]
    fn test_spaced_dot_is_not_qualified() {
        assert!(tokenize("fleet . Car").is_err());
    }

    #[test]
    fn test_punctuation() {
        test_single_token("@", Token::At);
        test_single_token(":", Token::Colon);
        test_single_token(",", Token::Comma);
        test_single_token("=", Token::Equals);
        test_single_token(";", Token::Semicolon);
        test_single_token("{", Token::LeftBrace);
        test_single_token("}", Token::RightBrace);
        test_single_token("[", Token::LeftBracket);
        test_single_token("]", Token::RightBracket);
    }

    #[test]
    fn test_string_literals_keep_raw_text() {
        test_single_token("\"hello world\"", Token::StringLiteral("\"hello world\""));
        test_single_token("\"\"", Token::StringLiteral("\"\""));
        test_single_token(
            r#""say \"hi\"""#,
            Token::StringLiteral(r#""say \"hi\"""#),
        );
        test_single_token(r#""a\\b""#, Token::StringLiteral(r#""a\\b""#));
    }

    #[test]
    fn test_number_literals() {
        test_single_token("0", Token::Number("0"));
        test_single_token("42", Token::Number("42"));
        test_single_token("-7", Token::Number("-7"));
        test_single_token("3.14", Token::Number("3.14"));
        test_single_token("1e5", Token::Number("1e5"));
        test_single_token("2.5E-3", Token::Number("2.5E-3"));
        test_single_token("010", Token::Number("010"));
    }

    #[test]
    fn test_number_followed_by_identifier_char_fails() {
        assert!(tokenize("12ab").is_err());
    }

    #[test]
    fn test_comments() {
        test_single_token("// note", Token::LineComment(" note"));
        test_single_token("//", Token::LineComment(""));
    }

    #[test]
    fn test_whitespace() {
        test_single_token(" \t ", Token::Whitespace);
        test_single_token("\n", Token::Newline);
    }

    #[test]
    fn test_full_lexing() {
        let input = r#"class fleet.Car extends Vehicle { @learned att speed: Double { with k = 1 } }"#;
        assert_eq!(
            meaningful(input),
            vec![
                Token::Class,
                Token::QualifiedName("fleet.Car"),
                Token::Extends,
                Token::Identifier("Vehicle"),
                Token::LeftBrace,
                Token::At,
                Token::Identifier("learned"),
                Token::Att,
                Token::Identifier("speed"),
                Token::Colon,
                Token::Identifier("Double"),
                Token::LeftBrace,
                Token::With,
                Token::Identifier("k"),
                Token::Equals,
                Token::Number("1"),
                Token::RightBrace,
                Token::RightBrace,
            ]
        );
    }

    #[test]
    fn test_array_suffix_tokens() {
        assert_eq!(
            meaningful("tags: String[]"),
            vec![
                Token::Identifier("tags"),
                Token::Colon,
                Token::Identifier("String"),
                Token::LeftBracket,
                Token::RightBracket,
            ]
        );
    }

    #[test]
    fn test_span_tracking() {
        let tokens = tokenize("enum Color").expect("Should tokenize");

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].span.range(), 0..4);
        assert_eq!(tokens[1].span.range(), 4..5);
        assert_eq!(tokens[2].span.range(), 5..10);
    }

    mod lexer_error_tests {
        use super::*;

        fn diagnostics(input: &str) -> Vec<Diagnostic> {
            tokenize(input)
                .expect_err("Expected lexer to fail")
                .into_diagnostics()
        }

        #[test]
        fn test_unterminated_string() {
            let diags = diagnostics("from \"data/raw");

            assert_eq!(diags.len(), 1);
            assert_eq!(diags[0].code(), Some(ErrorCode::E001));
            assert_eq!(diags[0].primary_span().map(|s| s.start()), Some(5));
            assert!(diags[0].help().is_some());
        }

        #[test]
        fn test_string_cannot_span_lines() {
            let diags = diagnostics("\"hello\nworld\"");
            assert_eq!(diags[0].code(), Some(ErrorCode::E001));
        }

        #[test]
        fn test_unexpected_character() {
            let diags = diagnostics("class A # B");

            assert_eq!(diags.len(), 1);
            assert_eq!(diags[0].code(), Some(ErrorCode::E002));
            assert_eq!(diags[0].primary_span(), Some(Span::new(8..9)));
        }

        #[test]
        fn test_collects_multiple_errors() {
            let diags = diagnostics("enum A { X } $ class B { } %");

            assert_eq!(diags.len(), 2);
            assert!(diags.iter().all(|d| d.code() == Some(ErrorCode::E002)));
        }
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn valid_identifier_strategy() -> impl Strategy<Value = String> {
        "[a-zA-Z_][a-zA-Z0-9_]{0,20}".prop_filter("avoid keywords", |s| {
            !matches!(
                s.as_str(),
                "enum" | "class" | "extends" | "att" | "ref" | "from" | "using" | "with"
            )
        })
    }

    fn string_content_strategy() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 ./_-]{0,30}"
    }

    proptest! {
        #[test]
        fn valid_identifiers_tokenize(id in valid_identifier_strategy()) {
            let tokens = tokenize(&id).map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert_eq!(tokens.len(), 1);
            prop_assert_eq!(&tokens[0].token, &Token::Identifier(id.as_str()));
        }

        #[test]
        fn qualified_names_tokenize(parts in prop::collection::vec(valid_identifier_strategy(), 2..5)) {
            let name = parts.join(".");
            let tokens = tokenize(&name).map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert_eq!(tokens.len(), 1);
            prop_assert_eq!(&tokens[0].token, &Token::QualifiedName(name.as_str()));
        }

        #[test]
        fn string_literals_keep_quotes(content in string_content_strategy()) {
            let source = format!("from \"{content}\"");
            let tokens = tokenize(&source).map_err(|e| TestCaseError::fail(e.to_string()))?;
            let raw = format!("\"{content}\"");
            prop_assert_eq!(&tokens[2].token, &Token::StringLiteral(raw.as_str()));
        }

        #[test]
        fn spans_cover_source_without_gaps(id in valid_identifier_strategy(), n in 0u32..10000) {
            let source = format!("with {id} = {n} // tail");
            let tokens = tokenize(&source).map_err(|e| TestCaseError::fail(e.to_string()))?;
            let mut expected_start = 0;
            for token in &tokens {
                prop_assert_eq!(token.span.start(), expected_start);
                expected_start = token.span.end();
            }
            prop_assert_eq!(expected_start, source.len());
        }
    }
}
