//! Re-joining of double-quoted literals split apart by the host shell.

/// Result of joining quoted tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedTokens {
    /// The token stream with quoted phrases collapsed.
    pub tokens: Vec<String>,
    /// The literal that was still open at end of input, if any.
    pub unterminated: Option<String>,
}

/// Collapse runs of tokens that form a `"..."` phrase into a single token.
///
/// Quote characters are removed from closed phrases. An unterminated phrase is
/// emitted as accumulated, quotes included.
pub fn join_quoted<S: AsRef<str>>(tokens: &[S]) -> JoinedTokens {
    let mut joined = Vec::with_capacity(tokens.len());
    let mut current = String::new();
    let mut in_quotes = false;

    for token in tokens {
        let token = token.as_ref();

        if !in_quotes {
            if !token.contains('"') {
                joined.push(token.to_string());
                continue;
            }
            if is_self_contained(token) {
                joined.push(token.replace('"', ""));
                continue;
            }
            in_quotes = true;
            current.push_str(token);
            continue;
        }

        current.push(' ');
        current.push_str(token);
        if token.ends_with('"') {
            joined.push(current.replace('"', ""));
            current.clear();
            in_quotes = false;
        }
    }

    let unterminated = if in_quotes {
        joined.push(current.clone());
        Some(current)
    } else {
        None
    };

    JoinedTokens {
        tokens: joined,
        unterminated,
    }
}

/// A token such as `"abc"` or `--k="v"` opens and closes its own quote.
fn is_self_contained(token: &str) -> bool {
    let quotes = token.matches('"').count();
    quotes >= 2 && quotes % 2 == 0 && token.ends_with('"')
}
