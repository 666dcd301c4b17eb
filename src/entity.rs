//! Entity reference decoding: `&lt; &gt; &amp; &apos; &quot;`.
//!
//! Only the five predefined XML entities are recognized; no DTD, no numeric
//! character references. A bare `<` in text is always an error, and `&` is
//! only legal as the start of one of the five fixed entities.

use crate::error::Error;

const ENTITIES: &[(&str, char)] = &[
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&amp;", '&'),
    ("&apos;", '\''),
    ("&quot;", '"'),
];

/// Decodes the five predefined XML entities in `raw`, rejecting bare `<` and
/// any `&` that isn't the start of one of those entities.
///
/// The output is sized to `raw`'s length up front: every replacement only
/// shrinks the string, so this is a safe over-allocation.
pub(crate) fn decode(raw: &str) -> Result<String, Error> {
    let mut out = String::with_capacity(raw.len());
    let mut anchor: Option<usize> = None;

    for (i, c) in raw.char_indices() {
        match c {
            '<' => return Err(Error::LessThanInText),
            '&' => {
                if anchor.is_some() {
                    return Err(Error::NestedAmpersand);
                }
                anchor = Some(i);
            }
            ';' => {
                if let Some(start) = anchor.take() {
                    let slice = &raw[start..=i];
                    let decoded = ENTITIES
                        .iter()
                        .find(|(pat, _)| *pat == slice)
                        .map(|(_, ch)| *ch)
                        .ok_or(Error::UnknownEntity)?;
                    out.push(decoded);
                } else {
                    out.push(';');
                }
            }
            other => {
                if anchor.is_none() {
                    out.push(other);
                }
                // else: buffered inside the pending entity, copied (or
                // rejected) once its closing ';' is seen.
            }
        }
    }

    if anchor.is_some() {
        return Err(Error::UnterminatedEntity);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_all_five_entities() {
        assert_eq!(decode("&lt;&gt;&amp;&apos;&quot;").unwrap(), "<>&'\"");
    }

    #[test]
    fn passes_through_plain_text() {
        assert_eq!(decode("Mount Gay").unwrap(), "Mount Gay");
        assert_eq!(decode("").unwrap(), "");
    }

    #[test]
    fn rejects_bare_less_than() {
        assert!(matches!(decode("a < b"), Err(Error::LessThanInText)));
    }

    #[test]
    fn rejects_nested_ampersand() {
        assert!(matches!(decode("&amp&lt;"), Err(Error::NestedAmpersand)));
    }

    #[test]
    fn rejects_unknown_entity() {
        assert!(matches!(decode("&foo;"), Err(Error::UnknownEntity)));
    }

    #[test]
    fn rejects_unterminated_entity() {
        assert!(matches!(decode("&amp"), Err(Error::UnterminatedEntity)));
    }

    #[test]
    fn idempotent_on_strings_without_lt_or_amp() {
        let s = "plain text, no markers";
        assert_eq!(decode(s).unwrap(), decode(&decode(s).unwrap()).unwrap());
    }

    #[test]
    fn is_identity_on_already_escaped_round_trip() {
        // Escaping the five named entities and decoding once restores the original.
        let original = "<tag>&\"'";
        let escaped = original
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('\'', "&apos;")
            .replace('"', "&quot;");
        assert_eq!(decode(&escaped).unwrap(), original);
    }
}
