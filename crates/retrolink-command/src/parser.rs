//! Line parsing.

/// A command line split into its token and argument remainder.
///
/// Borrows the line it was parsed from; it lives only as long as dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedCommand<'a> {
    /// Everything up to the first whitespace. Matched case-sensitively.
    pub token: &'a str,
    /// The trimmed rest of the line, possibly empty. Its structure belongs to
    /// whichever handler consumes it.
    pub args: &'a str,
}

/// Split a line into token and arguments. Blank lines parse to `None`.
pub fn parse(line: &str) -> Option<ParsedCommand<'_>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (token, args) = match line.find(char::is_whitespace) {
        Some(pos) => (&line[..pos], line[pos..].trim()),
        None => (line, ""),
    };
    Some(ParsedCommand { token, args })
}
