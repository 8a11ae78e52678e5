//! Attribute-query clause construction.
//!
//! Feature stores accept SQL-92 style `WHERE` clauses. User text is only ever
//! interpolated into a clause through the helpers in this module, which
//! neutralise quotes so the text is read as a literal.

/// Character that introduces an escaped `LIKE` wildcard.
pub const LIKE_ESCAPE: char = '\\';

/// Escape `value` for use inside a single-quoted string literal.
///
/// # Examples
///
/// ```
/// use campus_search_core::clause::escape_literal;
///
/// assert_eq!(escape_literal("O'Brien"), "O''Brien");
/// ```
#[must_use]
pub fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Escape `value` for use inside a single-quoted `LIKE` pattern.
///
/// Quotes are doubled and the `LIKE` wildcards `%` and `_`, along with the
/// escape character itself, are prefixed with [`LIKE_ESCAPE`].
#[must_use]
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\'' => escaped.push_str("''"),
            '%' | '_' | LIKE_ESCAPE => {
                escaped.push(LIKE_ESCAPE);
                escaped.push(ch);
            }
            other => escaped.push(other),
        }
    }
    escaped
}

/// Case-insensitive substring match of `term` against `field`.
///
/// # Examples
///
/// ```
/// use campus_search_core::clause::contains_clause;
///
/// assert_eq!(
///     contains_clause("NAME", "o'brien"),
///     r"UPPER(NAME) LIKE '%O''BRIEN%' ESCAPE '\'",
/// );
/// ```
#[must_use]
pub fn contains_clause(field: &str, term: &str) -> String {
    format!(
        "UPPER({field}) LIKE '%{}%' ESCAPE '{LIKE_ESCAPE}'",
        escape_like(&term.to_uppercase())
    )
}

/// Exact match of `value` against `field`.
#[must_use]
pub fn equals_clause(field: &str, value: &str) -> String {
    format!("{field} = '{}'", escape_literal(value))
}

/// Disjunction of `clauses`, each parenthesised.
///
/// Returns `1=0` when no clauses are supplied so the query matches nothing.
#[must_use]
pub fn any_of<I>(clauses: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let joined = clauses
        .into_iter()
        .map(|clause| format!("({clause})"))
        .collect::<Vec<_>>()
        .join(" OR ");
    if joined.is_empty() {
        "1=0".to_owned()
    } else {
        joined
    }
}

/// Split a clause into its top-level single-quoted literals.
///
/// Returns `None` when a literal is left unterminated, which means user text
/// escaped the literal it was interpolated into.
#[must_use]
pub fn quoted_literals(clause: &str) -> Option<Vec<String>> {
    let mut literals = Vec::new();
    let mut chars = clause.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\'' {
            continue;
        }
        let mut literal = String::new();
        let mut closed = false;
        while let Some(inner) = chars.next() {
            if inner == '\'' {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    literal.push('\'');
                } else {
                    closed = true;
                    break;
                }
            } else {
                literal.push(inner);
            }
        }
        if !closed {
            return None;
        }
        literals.push(literal);
    }
    Some(literals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("Morrill", "Morrill")]
    #[case("O'Brien", "O''Brien")]
    #[case("''", "''''")]
    fn literal_doubles_quotes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape_literal(input), expected);
    }

    #[rstest]
    #[case("100%", r"100\%")]
    #[case("room_1", r"room\_1")]
    #[case(r"a\b", r"a\\b")]
    #[case("it's", "it''s")]
    fn like_escapes_wildcards(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape_like(input), expected);
    }

    #[rstest]
    fn injection_attempt_stays_inside_literal() {
        let clause = contains_clause("NAME", "x' OR '1'='1");
        let literals = quoted_literals(&clause).expect("clause literals should be balanced");
        assert_eq!(literals, vec!["%X' OR '1'='1%".to_owned(), r"\".to_owned()]);
    }

    #[rstest]
    fn equals_clause_quotes_value() {
        assert_eq!(
            equals_clause("CLIENT", "Dean's Office"),
            "CLIENT = 'Dean''s Office'"
        );
    }

    #[rstest]
    fn any_of_without_clauses_matches_nothing() {
        assert_eq!(any_of(Vec::new()), "1=0");
        assert_eq!(
            any_of(vec!["A = 1".to_owned(), "B = 2".to_owned()]),
            "(A = 1) OR (B = 2)"
        );
    }

    #[rstest]
    fn unterminated_literal_is_reported() {
        assert!(quoted_literals("NAME = 'O'Brien'").is_none());
    }

    proptest! {
        #[test]
        fn contains_clause_keeps_term_literal(term in ".*") {
            let clause = contains_clause("NAME", &term);
            let literals = quoted_literals(&clause);
            prop_assert!(literals.is_some());
            let literals = literals.unwrap_or_default();
            prop_assert_eq!(literals.len(), 2);
            prop_assert_eq!(
                literals.first().cloned(),
                Some(format!("%{}%", escape_like(&term.to_uppercase()).replace("''", "'")))
            );
        }

        #[test]
        fn equals_clause_round_trips_value(value in ".*") {
            let clause = equals_clause("CLIENT", &value);
            prop_assert_eq!(quoted_literals(&clause), Some(vec![value]));
        }
    }
}
