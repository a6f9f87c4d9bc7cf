//! Route table and the navigation bar labels.

use crate::models::Collection;

/// Below this terminal width the navigation bar switches to compact labels.
pub(crate) const COMPACT_NAV_WIDTH: u16 = 80;

/// Map a dashboard route to the page it shows. Both the singular route of the
/// registrations page and the collection name are accepted, and the leading
/// slash is optional.
pub fn route_to_collection(route: &str) -> Option<Collection> {
    let path = route.trim().trim_start_matches('/').trim_end_matches('/');
    match path {
        "students" => Some(Collection::Students),
        "professors" => Some(Collection::Professors),
        "subjects" => Some(Collection::Subjects),
        "registerStudentSubject" | "registerStudentSubjects" | "registrations" => {
            Some(Collection::Registrations)
        }
        _ => None,
    }
}

/// Canonical route of a page.
pub fn collection_route(collection: Collection) -> &'static str {
    match collection {
        Collection::Students => "/students",
        Collection::Professors => "/professors",
        Collection::Subjects => "/subjects",
        Collection::Registrations => "/registerStudentSubject",
    }
}

/// Navigation labels for the current terminal width.
pub(crate) fn nav_labels(width: u16) -> Vec<&'static str> {
    let compact = width < COMPACT_NAV_WIDTH;
    Collection::ALL
        .iter()
        .map(|collection| {
            if compact {
                collection.short_title()
            } else {
                collection.title()
            }
        })
        .collect()
}

/// Page selected by a digit key, `1` being the first page.
pub(crate) fn page_for_digit(ch: char) -> Option<Collection> {
    let index = ch.to_digit(10)? as usize;
    index
        .checked_sub(1)
        .and_then(|idx| Collection::ALL.get(idx).copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_resolve_with_or_without_slashes() {
        assert_eq!(route_to_collection("/students"), Some(Collection::Students));
        assert_eq!(route_to_collection("professors/"), Some(Collection::Professors));
        assert_eq!(
            route_to_collection("/registerStudentSubject"),
            Some(Collection::Registrations)
        );
        assert_eq!(route_to_collection("/grades"), None);
    }

    #[test]
    fn canonical_routes_round_trip() {
        for collection in Collection::ALL {
            assert_eq!(
                route_to_collection(collection_route(collection)),
                Some(collection)
            );
        }
    }

    #[test]
    fn narrow_terminals_get_compact_labels() {
        assert_eq!(nav_labels(120)[3], "Registrations");
        assert_eq!(nav_labels(COMPACT_NAV_WIDTH - 1)[3], "Reg");
    }

    #[test]
    fn digits_pick_pages() {
        assert_eq!(page_for_digit('1'), Some(Collection::Students));
        assert_eq!(page_for_digit('4'), Some(Collection::Registrations));
        assert_eq!(page_for_digit('0'), None);
        assert_eq!(page_for_digit('5'), None);
    }
}
