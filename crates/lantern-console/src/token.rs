//! Input-line tokenizer.
//!
//! Splits a raw input line into a command name and raw argument strings.
//! A token starting with `"` opens a quoted argument that keeps accumulating
//! tokens (re-joined with single spaces) until a token ends with `"`; the
//! enclosing quotes are then stripped and the argument is emitted as one
//! unit. Embedded quote characters cannot be escaped; an interior `"` at the
//! end of a token closes the span early. That limitation is intentional and
//! matches the behavior users already rely on.

/// Split a raw input line into `(command_name, raw_arguments)`.
///
/// Empty or whitespace-only input yields `("", [])`. A single token yields
/// `(token, [])`.
pub fn parse(raw: &str) -> (String, Vec<String>) {
    let mut tokens = raw.split(' ').filter(|t| !t.is_empty());
    let Some(name) = tokens.next() else {
        return (String::new(), Vec::new());
    };

    let mut args = Vec::new();
    let mut quoted: Option<String> = None;

    for token in tokens {
        match quoted.take() {
            Some(mut span) => {
                span.push(' ');
                span.push_str(token);
                if token.ends_with('"') {
                    args.push(strip_quotes(&span));
                } else {
                    quoted = Some(span);
                }
            },
            None => {
                if token.starts_with('"') {
                    if token.len() >= 2 && token.ends_with('"') {
                        args.push(strip_quotes(token));
                    } else {
                        quoted = Some(token.to_string());
                    }
                } else {
                    args.push(token.to_string());
                }
            },
        }
    }

    // Unterminated quoted span: emit what accumulated, minus the opener.
    if let Some(span) = quoted {
        args.push(span[1..].to_string());
    }

    (name.to_string(), args)
}

/// Strip one leading and one trailing quote from a completed quoted span.
fn strip_quotes(span: &str) -> String {
    span[1..span.len() - 1].to_string()
}

/// Reconcile raw argument count against a command's declared parameter
/// count: when the command declares fewer parameters than there are raw
/// arguments (and declares at least one), the excess trailing arguments are
/// re-joined with spaces into the last slot. The caller checks the counts
/// afterwards; a remaining mismatch is an arity error.
pub fn reconcile_arity(mut args: Vec<String>, param_count: usize) -> Vec<String> {
    if param_count > 0 && args.len() > param_count {
        let tail = args.split_off(param_count - 1);
        args.push(tail.join(" "));
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_input() {
        assert_eq!(parse(""), (String::new(), vec![]));
        assert_eq!(parse("   "), (String::new(), vec![]));
    }

    #[test]
    fn single_token() {
        let (name, args) = parse("clear");
        assert_eq!(name, "clear");
        assert!(args.is_empty());
    }

    #[test]
    fn plain_arguments() {
        let (name, args) = parse("log hello world");
        assert_eq!(name, "log");
        assert_eq!(args, vec!["hello", "world"]);
    }

    #[test]
    fn repeated_spaces_collapse() {
        let (name, args) = parse("log   hello    world");
        assert_eq!(name, "log");
        assert_eq!(args, vec!["hello", "world"]);
    }

    #[test]
    fn quoted_argument_groups_spaces() {
        let (name, args) = parse("bind \"log hello\" A,B");
        assert_eq!(name, "bind");
        assert_eq!(args, vec!["log hello", "A,B"]);
    }

    #[test]
    fn quoted_argument_single_token() {
        let (_, args) = parse("log \"hi\"");
        assert_eq!(args, vec!["hi"]);
    }

    #[test]
    fn quoted_argument_spanning_many_tokens() {
        let (_, args) = parse("log \"a b c d\" tail");
        assert_eq!(args, vec!["a b c d", "tail"]);
    }

    #[test]
    fn unterminated_quote_emits_remainder() {
        let (_, args) = parse("log \"never closed here");
        assert_eq!(args, vec!["never closed here"]);
    }

    #[test]
    fn interior_quote_closes_early() {
        // Known limitation: the `"` ending the second token terminates the
        // span even though the user may have meant it literally.
        let (_, args) = parse("log \"a b\" c\" d");
        assert_eq!(args[0], "a b");
    }

    #[test]
    fn lone_quote_token_opens_span() {
        let (_, args) = parse("log \" a b\"");
        assert_eq!(args, vec![" a b"]);
    }

    #[test]
    fn reconcile_merges_trailing_args() {
        let args = vec!["hello".to_string(), "world".to_string()];
        assert_eq!(reconcile_arity(args, 1), vec!["hello world"]);
    }

    #[test]
    fn reconcile_keeps_exact_fit() {
        let args = vec!["a".to_string(), "b".to_string()];
        assert_eq!(reconcile_arity(args.clone(), 2), args);
    }

    #[test]
    fn reconcile_zero_params_is_untouched() {
        let args = vec!["a".to_string(), "b".to_string()];
        assert_eq!(reconcile_arity(args.clone(), 0), args);
    }

    #[test]
    fn reconcile_underfull_is_untouched() {
        let args = vec!["a".to_string()];
        assert_eq!(reconcile_arity(args.clone(), 3), args);
    }

    #[test]
    fn reconcile_merges_into_middle_slot() {
        let args = vec!["x".into(), "a".into(), "b".into(), "c".into()];
        assert_eq!(reconcile_arity(args, 2), vec!["x", "a b c"]);
    }

    /// Re-wrap parsed arguments the way a user would type them.
    fn rewrap(name: &str, args: &[String]) -> String {
        let mut out = name.to_string();
        for arg in args {
            out.push(' ');
            if arg.contains(' ') {
                out.push('"');
                out.push_str(arg);
                out.push('"');
            } else {
                out.push_str(arg);
            }
        }
        out
    }

    proptest! {
        // One parse -> rewrap -> reparse cycle is a fixed point for inputs
        // whose tokens contain no quote characters.
        #[test]
        fn roundtrip_is_fixed_point(
            name in "[a-z]{1,8}",
            args in proptest::collection::vec("[a-z0-9 ]{1,12}", 0..4),
        ) {
            let args: Vec<String> = args
                .into_iter()
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .map(|a| a.split_whitespace().collect::<Vec<_>>().join(" "))
                .collect();
            let input = rewrap(&name, &args);
            let (n1, a1) = parse(&input);
            let (n2, a2) = parse(&rewrap(&n1, &a1));
            prop_assert_eq!(n1, n2);
            prop_assert_eq!(a1, a2);
        }
    }
}
