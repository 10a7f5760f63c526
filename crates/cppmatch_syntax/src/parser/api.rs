/// Parse a token stream into declarations.
///
/// This is the main public entrypoint for parsing.
///
/// ## Parameters
/// - `tokens`: Token stream produced by `cppmatch_syntax::lexer`.
///
/// ## Notes
/// Never fails: parse errors become diagnostics on the returned [`ParsedFile`] and `Damaged`
/// declarations in its list.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse(tokens: &[Token]) -> ParsedFile {
    let parsed = Parser::new(tokens).parse();
    tracing::trace!(
        declarations = parsed.declarations.len(),
        diagnostics = parsed.diagnostics.len(),
        "parsed token stream"
    );
    parsed
}
