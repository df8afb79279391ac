//! Split a token stream at recognized command names.

/// The command names a parse should recognize.
#[derive(Debug, Clone, Default)]
pub struct KnownCommands {
    /// (lowercased, canonical) pairs.
    names: Vec<(String, String)>,
}

impl KnownCommands {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|n| {
                let canonical = n.as_ref().trim().to_string();
                (canonical.to_lowercase(), canonical)
            })
            .collect();
        Self { names }
    }

    /// Match a token against the known names, ignoring case and surrounding
    /// whitespace. Returns the canonical spelling.
    pub fn lookup(&self, token: &str) -> Option<&str> {
        let needle = token.trim().to_lowercase();
        self.names
            .iter()
            .find(|(lower, _)| *lower == needle)
            .map(|(_, canonical)| canonical.as_str())
    }
}

/// A contiguous slice of tokens belonging to one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket<'a> {
    /// The command that opens this bucket (None for the anonymous bucket).
    pub command: Option<&'a str>,
    /// The tokens, including the command token itself.
    pub tokens: &'a [String],
}

/// Split tokens into one bucket per recognized command, in order of discovery.
///
/// Tokens before the first command, or all tokens when no command is found,
/// go into a leading anonymous bucket.
pub fn segment<'a>(tokens: &'a [String], known: &'a KnownCommands) -> Vec<Bucket<'a>> {
    let starts: Vec<(usize, &str)> = tokens
        .iter()
        .enumerate()
        .filter_map(|(i, t)| known.lookup(t).map(|name| (i, name)))
        .collect();

    let Some(&(first, _)) = starts.first() else {
        return vec![Bucket {
            command: None,
            tokens,
        }];
    };

    let mut buckets = Vec::with_capacity(starts.len() + 1);
    if first != 0 {
        buckets.push(Bucket {
            command: None,
            tokens: &tokens[..first],
        });
    }

    for (n, &(start, name)) in starts.iter().enumerate() {
        let end = starts.get(n + 1).map_or(tokens.len(), |&(next, _)| next);
        buckets.push(Bucket {
            command: Some(name),
            tokens: &tokens[start..end],
        });
    }

    buckets
}
