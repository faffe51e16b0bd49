use crate::models::NormalizedName;
use human_name::Name;

/// Splits a full display name into first/middle/last components.
///
/// Blank input yields all-absent components rather than an error. Parsing
/// follows Western name conventions (honorifics, suffixes, multi-part
/// surnames) via the `human_name` parser; components the source name does not
/// carry stay `None`. Pure and deterministic for a given parser version.
pub fn split_name(raw: &str) -> NormalizedName {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return NormalizedName::default();
    }

    let Some(parsed) = Name::parse(trimmed) else {
        // The parser rejects strings it cannot segment into name tokens.
        // Keep the whole string as the given name so the row still gets a
        // lookup attempt instead of being dropped.
        return NormalizedName {
            first: Some(trimmed.to_string()),
            middle: None,
            last: None,
        };
    };

    let first = parsed.given_name().map(|given| given.to_string());
    let middle = parsed
        .middle_name()
        .map(|middle| punctuate_initials(middle.as_ref()))
        .filter(|middle| !middle.is_empty())
        .or_else(|| {
            parsed
                .middle_initials()
                .map(|initials| punctuate_initials(initials.as_ref()))
        });
    let last = Some(parsed.surname().to_string()).filter(|surname| !surname.is_empty());

    NormalizedName {
        first,
        middle,
        last,
    }
}

/// Renders bare single-letter tokens as initials: "Q" becomes "Q.".
/// Full middle names and already-punctuated initials pass through unchanged.
fn punctuate_initials(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match (chars.next(), chars.next()) {
                (Some(only), None) if only.is_alphabetic() => format!("{}.", only),
                _ => word.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
