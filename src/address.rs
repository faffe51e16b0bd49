use crate::models::NormalizedAddress;

/// Composes the two address lines the enrichment service expects.
///
/// `address_line1` is the trimmed primary line, with the secondary line
/// space-appended only when it is non-empty after trimming. `address_line2`
/// is "{city}, {state} {zip}". Numeric coercion of the zip happens upstream
/// in ingest; this step is pure string composition.
pub fn compose_address(
    line_one: &str,
    line_two: Option<&str>,
    city: &str,
    state: &str,
    zip: &str,
) -> NormalizedAddress {
    let primary = line_one.trim();

    let address_line1 = match line_two.map(str::trim).filter(|two| !two.is_empty()) {
        Some(secondary) => format!("{} {}", primary, secondary),
        None => primary.to_string(),
    };

    let address_line2 = format!("{}, {} {}", city.trim(), state.trim(), zip.trim());

    NormalizedAddress {
        address_line1,
        address_line2,
    }
}
