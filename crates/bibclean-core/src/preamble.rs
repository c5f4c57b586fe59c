//! `@String` abbreviation preamble written at the top of cleaned files

use bibclean_bibtex::format_string_definition;

use crate::venues::VenueTable;

/// One `@String(NAME = {Display})` line per venue, in table order, with
/// names upper-cased and padded to a common column. Ends with a blank line.
pub fn render(venues: &VenueTable) -> String {
    let width = venues
        .venues()
        .iter()
        .map(|v| v.token.len())
        .max()
        .unwrap_or(0);

    let mut result = String::new();
    for venue in venues.venues() {
        result.push_str(&format_string_definition(
            &venue.token.to_uppercase(),
            &venue.display,
            width,
        ));
        result.push('\n');
    }
    result.push('\n');
    result
}
