//! Species identifier → genus key.

/// Genus key for identifiers that carry no usable name.
pub const UNKNOWN_GENUS: &str = "unknown";

/// Resolve the lowercase genus key of a species identifier.
///
/// The genus is everything before the first `_` (`"Faecalibacterium_prausnitzii"`
/// → `"faecalibacterium"`). Identifiers whose genus part is blank resolve to
/// [`UNKNOWN_GENUS`], which keeps the function idempotent.
pub fn resolve(species: &str) -> String {
    let genus = species.split('_').next().unwrap_or(species);
    if genus.trim().is_empty() {
        return UNKNOWN_GENUS.to_string();
    }
    genus.to_lowercase()
}
