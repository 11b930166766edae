//! Parser for metamodel source tokens.
//!
//! This module transforms a token stream from the [`lexer`](super::lexer) into
//! the declaration records defined in [`ast`](super::ast). The public entry
//! point is [`build_metamodel`].
//!
//! Trivia tokens (whitespace, newlines, comments) stay in the stream; every
//! parser skips leading trivia before matching its first token.

use winnow::{
    Parser as _,
    combinator::{alt, opt, peek, repeat, separated},
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use crate::{
    ast,
    error::{Diagnostic, ErrorCode},
    span::{Span, Spanned},
    tokens::{PositionedToken, Token},
};

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Description of what is currently being parsed
    Label(&'static str),
    /// Remaining token count (`eof_offset()`) at error start position
    ///
    /// Used to calculate start_offset as: `tokens.len() - start_offset_value`
    StartOffset(usize),
    /// A top-level item did not start with a declaration keyword
    ExpectedDeclaration,
}

type Input<'src> = MetamodelTokenSlice<'src>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;
/// Type alias for winnow TokenSlice with our positioned tokens
type MetamodelTokenSlice<'src> = TokenSlice<'src, PositionedToken<'src>>;

/// Run `f` and turn any failure into a cut error that remembers where `f` started.
fn cut_err<'src, O, F>(input: &mut Input<'src>, f: F) -> IResult<O>
where
    F: FnOnce(&mut Input<'src>) -> IResult<O>,
{
    let start_remaining = input.eof_offset();

    match f(input) {
        Ok(o) => Ok(o),
        Err(ErrMode::Backtrack(mut e)) | Err(ErrMode::Cut(mut e)) => {
            e.push(Context::StartOffset(start_remaining));
            Err(ErrMode::Cut(e))
        }
        Err(e) => Err(e),
    }
}

/// Parse whitespace and comments
fn ws_comment<'src>(input: &mut Input<'src>) -> IResult<()> {
    any.verify(|token: &PositionedToken<'_>| token.is_trivia())
        .void()
        .parse_next(input)
}

/// Parse zero or more whitespace/comments
fn ws_comments0<'src>(input: &mut Input<'src>) -> IResult<()> {
    repeat(0.., ws_comment).parse_next(input)
}

/// Parse one specific token after optional trivia and return its span.
fn symbol<'src>(input: &mut Input<'src>, expected: Token<'_>, label: &'static str) -> IResult<Span> {
    ws_comments0.parse_next(input)?;
    any.verify_map(|token: &PositionedToken<'_>| (token.token == expected).then_some(token.span))
        .context(Context::Label(label))
        .parse_next(input)
}

fn comma<'src>(input: &mut Input<'src>) -> IResult<Span> {
    symbol(input, Token::Comma, "`,`")
}

fn colon<'src>(input: &mut Input<'src>) -> IResult<Span> {
    symbol(input, Token::Colon, "`:`")
}

fn semicolon<'src>(input: &mut Input<'src>) -> IResult<Span> {
    symbol(input, Token::Semicolon, "`;`")
}

fn equals<'src>(input: &mut Input<'src>) -> IResult<Span> {
    symbol(input, Token::Equals, "`=`")
}

fn left_brace<'src>(input: &mut Input<'src>) -> IResult<Span> {
    symbol(input, Token::LeftBrace, "`{`")
}

fn right_brace<'src>(input: &mut Input<'src>) -> IResult<Span> {
    symbol(input, Token::RightBrace, "`}`")
}

/// Parse a bare identifier. Keywords are not identifiers.
fn identifier<'src>(input: &mut Input<'src>) -> IResult<Spanned<String>> {
    ws_comments0.parse_next(input)?;
    any.verify_map(|token: &PositionedToken<'_>| match token.token {
        Token::Identifier(name) => Some(Spanned::new(name.to_string(), token.span)),
        _ => None,
    })
    .context(Context::Label("identifier"))
    .parse_next(input)
}

/// Parse a classifier name, bare or qualified.
fn classifier_name<'src>(input: &mut Input<'src>) -> IResult<ast::Name> {
    ws_comments0.parse_next(input)?;
    any.verify_map(|token: &PositionedToken<'_>| match token.token {
        Token::Identifier(name) => Some(ast::Name::Identifier(Spanned::new(
            name.to_string(),
            token.span,
        ))),
        Token::QualifiedName(name) => Some(ast::Name::Qualified(Spanned::new(
            name.to_string(),
            token.span,
        ))),
        _ => None,
    })
    .context(Context::Label("name"))
    .parse_next(input)
}

/// Parse a string literal, keeping its quotes.
fn string_literal<'src>(input: &mut Input<'src>) -> IResult<ast::StringLiteral> {
    ws_comments0.parse_next(input)?;
    any.verify_map(|token: &PositionedToken<'_>| match token.token {
        Token::StringLiteral(raw) => Some(Spanned::new(raw.to_string(), token.span)),
        _ => None,
    })
    .context(Context::Label("string literal"))
    .parse_next(input)
}

/// Parse the value of a `with` clause: a number or a string literal.
fn literal<'src>(input: &mut Input<'src>) -> IResult<ast::Literal> {
    ws_comments0.parse_next(input)?;
    any.verify_map(|token: &PositionedToken<'_>| match token.token {
        Token::Number(raw) => Some(ast::Literal::Number(Spanned::new(
            raw.to_string(),
            token.span,
        ))),
        Token::StringLiteral(raw) => Some(ast::Literal::String(Spanned::new(
            raw.to_string(),
            token.span,
        ))),
        _ => None,
    })
    .context(Context::Label("number or string literal"))
    .parse_next(input)
}

/// Parse one clause of a semantic block into `block`.
///
/// ## Grammar:
///   `from STRING | using STRING | with IDENT [ "=" [ NUMBER | STRING ] ]`
fn semantic_clause<'src>(input: &mut Input<'src>, block: &mut ast::SemanticBlock) -> IResult<()> {
    ws_comments0.parse_next(input)?;
    let keyword = any
        .verify_map(|token: &PositionedToken<'_>| match token.token {
            Token::From | Token::Using | Token::With => Some(token.token.clone()),
            _ => None,
        })
        .context(Context::Label("`from`, `using` or `with`"))
        .parse_next(input)?;

    cut_err(input, |input| {
        match keyword {
            Token::From => block.from.push(string_literal.parse_next(input)?),
            Token::Using => block.using.push(string_literal.parse_next(input)?),
            _ => {
                let name = identifier.parse_next(input)?;
                let value = match opt(equals).parse_next(input)? {
                    Some(_) => opt(literal).parse_next(input)?,
                    None => None,
                };
                block.with.push(ast::WithClause { name, value });
            }
        }
        Ok(())
    })
}

/// Parse a semantic block
///
/// ## Grammar:
///   `{ clause* }`
fn semantic_block<'src>(input: &mut Input<'src>) -> IResult<ast::SemanticBlock> {
    left_brace.parse_next(input)?;

    cut_err(input, |input| {
        let mut block = ast::SemanticBlock::default();
        while opt(right_brace).parse_next(input)?.is_none() {
            semantic_clause(input, &mut block)?;
        }
        Ok(block)
    })
}

/// Parse an annotation: `@name`.
fn annotation<'src>(input: &mut Input<'src>) -> IResult<ast::Annotation> {
    symbol(input, Token::At, "`@`")?;
    cut_err(input, |input| {
        identifier
            .context(Context::Label("annotation name after `@`"))
            .parse_next(input)
    })
}

/// Parse an attribute type: a name with an optional `[]` suffix.
fn attribute_type<'src>(input: &mut Input<'src>) -> IResult<ast::AttributeType> {
    let name = classifier_name.parse_next(input)?;
    let array = opt(|input: &mut Input<'src>| {
        symbol(input, Token::LeftBracket, "`[`")?;
        symbol(input, Token::RightBracket, "`]`")
    })
    .parse_next(input)?
    .is_some();

    Ok(ast::AttributeType { name, array })
}

/// Parse a relation
///
/// ## Grammar:
///   `ref IDENT : name [semantic_block]`
fn relation<'src>(
    input: &mut Input<'src>,
    annotations: Vec<ast::Annotation>,
) -> IResult<ast::RelationDecl> {
    symbol(input, Token::Ref, "`ref`")?;

    cut_err(input, |input| {
        let name = identifier
            .context(Context::Label("relation name"))
            .parse_next(input)?;
        colon.parse_next(input)?;
        let target = classifier_name
            .context(Context::Label("relation target"))
            .parse_next(input)?;
        let semantics = opt(semantic_block).parse_next(input)?;

        Ok(ast::RelationDecl {
            name,
            target,
            annotations,
            semantics,
        })
    })
}

/// Parse an attribute
///
/// ## Grammar:
///   `[att] IDENT : attribute_type [semantic_block]`
///
/// Without the `att` keyword the attribute commits only after its `:`.
fn attribute<'src>(
    input: &mut Input<'src>,
    annotations: Vec<ast::Annotation>,
) -> IResult<ast::AttributeDecl> {
    let explicit = opt(|input: &mut Input<'src>| symbol(input, Token::Att, "`att`"))
        .parse_next(input)?
        .is_some();

    let body = |input: &mut Input<'src>| -> IResult<ast::AttributeDecl> {
        let name = identifier
            .context(Context::Label("attribute name"))
            .parse_next(input)?;
        colon.parse_next(input)?;
        let ty = attribute_type
            .context(Context::Label("attribute type"))
            .parse_next(input)?;
        let semantics = opt(semantic_block).parse_next(input)?;

        Ok(ast::AttributeDecl {
            name,
            ty,
            annotations,
            semantics,
        })
    };

    if explicit {
        cut_err(input, body)
    } else {
        body(input)
    }
}

enum Member {
    Attribute(ast::AttributeDecl),
    Relation(ast::RelationDecl),
}

/// Parse one class member with its annotations and optional `;`.
fn member<'src>(input: &mut Input<'src>) -> IResult<Member> {
    let annotations: Vec<ast::Annotation> = repeat(0.., annotation).parse_next(input)?;

    let is_relation = opt(peek(|input: &mut Input<'src>| {
        symbol(input, Token::Ref, "`ref`")
    }))
    .parse_next(input)?
    .is_some();

    let member = if is_relation {
        Member::Relation(relation(input, annotations)?)
    } else {
        Member::Attribute(attribute(input, annotations)?)
    };

    opt(semicolon).parse_next(input)?;
    Ok(member)
}

/// Parse an enum declaration
///
/// ## Grammar:
///   `enum name { [ IDENT ("," IDENT)* [","] ] }`
fn enum_declaration<'src>(input: &mut Input<'src>) -> IResult<ast::EnumDeclaration> {
    symbol(input, Token::Enum, "`enum`")?;

    cut_err(input, |input| {
        let name = classifier_name
            .context(Context::Label("enum name"))
            .parse_next(input)?;
        left_brace.parse_next(input)?;

        let mut literals = Vec::new();
        while let Some(value) = opt(identifier).parse_next(input)? {
            literals.push(value);
            if opt(comma).parse_next(input)?.is_none() {
                break;
            }
        }

        right_brace
            .context(Context::Label("enum literal or `}`"))
            .parse_next(input)?;

        Ok(ast::EnumDeclaration { name, literals })
    })
}

/// Parse a class declaration
///
/// ## Grammar:
///   `class name [ extends name ("," name)* ] { member* }`
fn class_declaration<'src>(input: &mut Input<'src>) -> IResult<ast::ClassDeclaration> {
    symbol(input, Token::Class, "`class`")?;

    cut_err(input, |input| {
        let name = classifier_name
            .context(Context::Label("class name"))
            .parse_next(input)?;

        let parents = match opt(|input: &mut Input<'src>| {
            symbol(input, Token::Extends, "`extends`")
        })
        .parse_next(input)?
        {
            Some(_) => separated(1.., classifier_name, comma)
                .context(Context::Label("parent name"))
                .parse_next(input)?,
            None => Vec::new(),
        };

        left_brace.parse_next(input)?;

        let mut attributes = Vec::new();
        let mut relations = Vec::new();
        while opt(right_brace).parse_next(input)?.is_none() {
            match member.parse_next(input)? {
                Member::Attribute(attribute) => attributes.push(attribute),
                Member::Relation(relation) => relations.push(relation),
            }
        }

        Ok(ast::ClassDeclaration {
            name,
            parents,
            attributes,
            relations,
        })
    })
}

/// Parse one top-level declaration.
fn declaration<'src>(input: &mut Input<'src>) -> IResult<ast::Declaration> {
    let start_remaining = input.eof_offset();

    alt((
        enum_declaration.map(ast::Declaration::Enum),
        class_declaration.map(ast::Declaration::Class),
    ))
    .parse_next(input)
    .map_err(|e| match e {
        ErrMode::Backtrack(_) => {
            let mut e = ContextError::new();
            e.push(Context::ExpectedDeclaration);
            e.push(Context::StartOffset(start_remaining));
            ErrMode::Cut(e)
        }
        other => other,
    })
}

/// Parse a complete metamodel document.
fn metamodel<'src>(input: &mut Input<'src>) -> IResult<ast::Metamodel> {
    let mut declarations = Vec::new();
    loop {
        ws_comments0.parse_next(input)?;
        if input.eof_offset() == 0 {
            break;
        }
        declarations.push(declaration.parse_next(input)?);
    }
    Ok(ast::Metamodel { declarations })
}

/// Convert winnow errors to a [`Diagnostic`].
///
/// Extracts position information from the error context (StartOffset) and
/// calculates the error span from the token array.
fn convert_error(
    error: ErrMode<ContextError<Context>>,
    tokens: &[PositionedToken],
    current_remaining: usize,
) -> Diagnostic {
    let ctx = match error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e,
        ErrMode::Incomplete(_) => ContextError::new(),
    };

    let start_remaining = ctx.context().find_map(|ctx| match ctx {
        Context::StartOffset(n) => Some(*n),
        _ => None,
    });

    // Calculate offsets from remaining token counts
    let end_offset = tokens.len().saturating_sub(current_remaining);
    let start_offset = start_remaining
        .map(|r| tokens.len().saturating_sub(r))
        .unwrap_or(0);

    let next_meaningful = tokens
        .iter()
        .enumerate()
        .skip(end_offset)
        .find(|(_, t)| !t.is_trivia());
    let last_meaningful_span = tokens
        .iter()
        .rev()
        .find(|t| !t.is_trivia())
        .map(|t| t.span)
        .unwrap_or_default();

    if ctx
        .context()
        .any(|ctx| matches!(ctx, Context::ExpectedDeclaration))
    {
        let span = tokens
            .iter()
            .skip(start_offset)
            .find(|t| !t.is_trivia())
            .map(|t| t.span)
            .unwrap_or(last_meaningful_span);
        return Diagnostic::error("expected `enum` or `class` declaration")
            .with_code(ErrorCode::E102)
            .with_label(span, ErrorCode::E102.description())
            .with_help("every top-level item must start with `enum` or `class`");
    }

    let contexts: Vec<String> = ctx
        .context()
        .filter_map(|ctx| match ctx {
            Context::Label(label) => Some(format!("expected {label}")),
            _ => None,
        })
        .collect();
    let message = if contexts.is_empty() {
        "unexpected token or end of input".to_string()
    } else {
        contexts.join(" → ")
    };

    let Some((error_index, error_token)) = next_meaningful else {
        let mut diag = Diagnostic::error(format!("unexpected end of input: {message}"))
            .with_code(ErrorCode::E101)
            .with_label(
                Span::new(last_meaningful_span.end()..last_meaningful_span.end()),
                "input ends here",
            )
            .with_help("the declaration is not complete; check for a missing `}`");
        if let Some(start) = tokens.iter().skip(start_offset).find(|t| !t.is_trivia()) {
            diag = diag.with_secondary_label(start.span, "construct starts here");
        }
        return diag;
    };

    // Span from the first meaningful token of the failing construct up to the
    // offending token
    let construct_start = tokens[start_offset.min(error_index)..=error_index]
        .iter()
        .find(|t| !t.is_trivia())
        .map(|t| t.span)
        .unwrap_or(error_token.span);

    Diagnostic::error(format!("unexpected token `{}`: {message}", error_token.token))
        .with_code(ErrorCode::E100)
        .with_label(error_token.span, ErrorCode::E100.description())
        .with_secondary_label(construct_start, "while parsing this")
        .with_help("check syntax and token positioning")
}

/// Build declaration records from tokens.
///
/// # Errors
///
/// Returns a [`Diagnostic`] describing the first syntax error.
pub fn build_metamodel<'src>(
    tokens: &'src [PositionedToken<'src>],
) -> Result<ast::Metamodel, Diagnostic> {
    let mut token_slice = TokenSlice::new(tokens);

    metamodel.parse_next(&mut token_slice).map_err(|e| {
        let current_remaining = token_slice.eof_offset();
        convert_error(e, tokens, current_remaining)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_err(source: &str) -> Diagnostic {
        let tokens = tokenize(source).expect("Failed to tokenize input");
        build_metamodel(&tokens).expect_err("Expected parse to fail")
    }

    #[test]
    fn test_expected_declaration_points_at_stray_token() {
        let source = "enum A { X }\nfoo";
        let diag = parse_err(source);

        assert_eq!(diag.code(), Some(ErrorCode::E102));
        assert_eq!(diag.primary_span(), Some(Span::new(13..16)));
    }

    #[test]
    fn test_unexpected_token_inside_class() {
        let source = "class A { x Int }";
        let diag = parse_err(source);

        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert_eq!(diag.primary_span(), Some(Span::new(12..15)));
    }

    #[test]
    fn test_missing_closing_brace_is_incomplete() {
        let diag = parse_err("class A {\n  att x: Int\n");

        assert_eq!(diag.code(), Some(ErrorCode::E101));
        assert!(diag.labels().iter().any(|l| l.is_secondary()));
    }

    #[test]
    fn test_keyword_not_accepted_as_name() {
        let diag = parse_err("class with { }");
        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert!(diag.message().contains("class name"), "{}", diag.message());
    }
}
