//! Search and category filtering over the track store.
//!
//! The filtered view is a list of indices into the store, always derived
//! from the full track list, the query text and the selected category.

use crate::library::Track;

/// Category value that matches every track.
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub query: String,
    pub category: String,
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: ALL_CATEGORIES.to_string(),
        }
    }
}

impl Filter {
    /// Indices of the tracks passing both the query and the category test, in store order.
    pub fn apply(&self, tracks: &[Track]) -> Vec<usize> {
        let query = self.query.trim().to_lowercase();
        tracks
            .iter()
            .enumerate()
            .filter(|(_, t)| matches_query(t, &query) && self.matches_category(t))
            .map(|(i, _)| i)
            .collect()
    }

    fn matches_category(&self, track: &Track) -> bool {
        self.category == ALL_CATEGORIES || track.category == self.category
    }
}

/// `query_lower` must already be trimmed and lowercased.
fn matches_query(track: &Track, query_lower: &str) -> bool {
    query_lower.is_empty()
        || track.title.to_lowercase().contains(query_lower)
        || track.artist.to_lowercase().contains(query_lower)
}

/// The selector's options: `"all"` followed by each distinct category in first-seen order.
pub fn category_options(tracks: &[Track]) -> Vec<String> {
    let mut options = vec![ALL_CATEGORIES.to_string()];
    for t in tracks {
        if !options.iter().any(|c| c == &t.category) {
            options.push(t.category.clone());
        }
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(title: &str, artist: &str, category: &str) -> Track {
        Track::remote(0, title, artist, &format!("https://x/{title}"), category)
    }

    fn library() -> Vec<Track> {
        vec![
            t("Blue Morning", "Ana", "Ambient"),
            t("Circuit", "BLUEPRINT", "Electronic"),
            t("Campfire", "Ana", "Acoustic"),
            t("Drift", "Oslo", "Ambient"),
        ]
    }

    fn filter(query: &str, category: &str) -> Filter {
        Filter {
            query: query.into(),
            category: category.into(),
        }
    }

    #[test]
    fn empty_query_and_all_keeps_everything() {
        assert_eq!(Filter::default().apply(&library()), vec![0, 1, 2, 3]);
    }

    #[test]
    fn query_matches_title_or_artist_case_insensitively() {
        assert_eq!(filter("blue", ALL_CATEGORIES).apply(&library()), vec![0, 1]);
        assert_eq!(filter("ANA", ALL_CATEGORIES).apply(&library()), vec![0, 2]);
    }

    #[test]
    fn query_is_a_substring_test_not_fuzzy() {
        assert!(filter("bmg", ALL_CATEGORIES).apply(&library()).is_empty());
    }

    #[test]
    fn query_is_trimmed() {
        assert_eq!(filter("  drift ", ALL_CATEGORIES).apply(&library()), vec![3]);
        assert_eq!(filter("   ", ALL_CATEGORIES).apply(&library()).len(), 4);
    }

    #[test]
    fn category_must_match_exactly() {
        assert_eq!(filter("", "Ambient").apply(&library()), vec![0, 3]);
        assert!(filter("", "ambient").apply(&library()).is_empty());
    }

    #[test]
    fn query_and_category_combine() {
        assert_eq!(filter("ana", "Acoustic").apply(&library()), vec![2]);
        assert!(filter("oslo", "Electronic").apply(&library()).is_empty());
    }

    #[test]
    fn filter_result_is_exactly_the_matching_set() {
        let tracks = library();
        for q in ["", "a", "o", "ri", "zzz"] {
            for c in category_options(&tracks) {
                let f = filter(q, &c);
                let got = f.apply(&tracks);
                let expected: Vec<usize> = (0..tracks.len())
                    .filter(|&i| {
                        let tr = &tracks[i];
                        let hit = q.is_empty()
                            || tr.title.to_lowercase().contains(q)
                            || tr.artist.to_lowercase().contains(q);
                        hit && (c == ALL_CATEGORIES || tr.category == c)
                    })
                    .collect();
                assert_eq!(got, expected, "query {q:?} category {c:?}");
            }
        }
    }

    #[test]
    fn category_options_are_distinct_in_first_seen_order() {
        assert_eq!(
            category_options(&library()),
            vec!["all", "Ambient", "Electronic", "Acoustic"]
        );
        assert_eq!(category_options(&[]), vec!["all"]);
    }
}
