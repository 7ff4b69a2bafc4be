//! Candidate ranking.
//!
//! Candidates are ordered by a composite key compared field by field:
//! 1. Language group (bilingual, simplified, English, traditional, untagged)
//! 2. Format score, with a bonus for the preferred format
//! 3. Download count (missing counts as zero)
//! 4. Year penalty (display text lacks the media year)
//! 5. Manual score hint
//!
//! Remaining ties keep discovery order.

use std::cmp::Reverse;

use crate::media::MediaDescriptor;
use crate::subtitle::{Candidate, SubtitleFormat, TextFormat};

/// Bonus added to the base weight of the preferred format.
pub const PREFERRED_FORMAT_BONUS: i32 = 15;

/// Language group rank given to candidates without any recognized tag.
pub const UNTAGGED_LANGUAGE_RANK: u8 = u8::MAX;

/// Base weight per format.
///
/// Archives often bundle several formats, so they sit between the text
/// formats and image subtitles.
pub fn format_weight(format: SubtitleFormat) -> i32 {
    match format {
        SubtitleFormat::Ass => 100,
        SubtitleFormat::Srt => 80,
        SubtitleFormat::Archive => 50,
        SubtitleFormat::Sup => 10,
        SubtitleFormat::Unknown => 0,
    }
}

/// Format weight plus the preferred-format bonus.
pub fn format_score(format: SubtitleFormat, preferred: TextFormat) -> i32 {
    let bonus = if format.as_text_format() == Some(preferred) {
        PREFERRED_FORMAT_BONUS
    } else {
        0
    };
    format_weight(format) + bonus
}

/// Composite ranking key. Smaller keys rank first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RankKey {
    pub language_rank: u8,
    pub format_score: Reverse<i32>,
    pub downloads: Reverse<u64>,
    pub year_penalty: u8,
    pub score_hint: Reverse<i32>,
}

/// Computes the ranking key of one candidate.
pub fn rank_key(candidate: &Candidate, preferred: TextFormat, media: &MediaDescriptor) -> RankKey {
    let year_penalty = match media.year {
        Some(year) if !candidate.display_text.contains(&year.to_string()) => 1,
        _ => 0,
    };

    RankKey {
        language_rank: candidate
            .best_language()
            .map(|l| l.group_rank())
            .unwrap_or(UNTAGGED_LANGUAGE_RANK),
        format_score: Reverse(format_score(candidate.format, preferred)),
        downloads: Reverse(candidate.download_count.unwrap_or(0)),
        year_penalty,
        score_hint: Reverse(candidate.score_hint),
    }
}

/// Orders candidates best first without touching the input.
pub fn rank_candidates<'a>(
    candidates: &'a [Candidate],
    preferred: TextFormat,
    media: &MediaDescriptor,
) -> Vec<&'a Candidate> {
    let mut keyed: Vec<(RankKey, &Candidate)> = candidates
        .iter()
        .map(|c| (rank_key(c, preferred, media), c))
        .collect();
    // `sort_by` is stable, which keeps discovery order among equal keys.
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().map(|(_, c)| c).collect()
}

/// Returns the best candidate, if any.
pub fn choose_best<'a>(
    candidates: &'a [Candidate],
    preferred: TextFormat,
    media: &MediaDescriptor,
) -> Option<&'a Candidate> {
    rank_candidates(candidates, preferred, media)
        .into_iter()
        .next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subtitle::{Language, LanguageSet};
    use crate::testing::fixtures::candidate;

    fn urls(ranked: &[&Candidate]) -> Vec<String> {
        ranked.iter().map(|c| c.download_url.clone()).collect()
    }

    fn tagged(url: &str, languages: &[Language]) -> Candidate {
        let mut c = candidate(url, "Movie.srt");
        c.format = SubtitleFormat::Srt;
        c.languages = languages.iter().copied().collect::<LanguageSet>();
        c
    }

    #[test]
    fn test_language_group_order() {
        let media = MediaDescriptor::new("Movie");
        let candidates = vec![
            tagged("none", &[]),
            tagged("traditional", &[Language::Traditional]),
            tagged("english", &[Language::English]),
            tagged("simplified", &[Language::Simplified]),
            tagged("bilingual", &[Language::Bilingual]),
        ];
        let ranked = rank_candidates(&candidates, TextFormat::Ass, &media);
        assert_eq!(
            urls(&ranked),
            vec!["bilingual", "simplified", "english", "traditional", "none"]
        );
    }

    #[test]
    fn test_best_tag_in_set_counts() {
        let media = MediaDescriptor::new("Movie");
        let candidates = vec![
            tagged("english", &[Language::English]),
            tagged("traditional+bilingual", &[Language::Traditional, Language::Bilingual]),
        ];
        let ranked = rank_candidates(&candidates, TextFormat::Ass, &media);
        assert_eq!(ranked[0].download_url, "traditional+bilingual");
    }

    #[test]
    fn test_format_score_with_preference() {
        assert_eq!(format_score(SubtitleFormat::Ass, TextFormat::Ass), 115);
        assert_eq!(format_score(SubtitleFormat::Srt, TextFormat::Ass), 80);
        assert_eq!(format_score(SubtitleFormat::Srt, TextFormat::Srt), 95);
        assert_eq!(format_score(SubtitleFormat::Archive, TextFormat::Srt), 50);
        assert_eq!(format_score(SubtitleFormat::Unknown, TextFormat::Ass), 0);
    }

    #[test]
    fn test_format_breaks_language_ties() {
        let media = MediaDescriptor::new("Movie");
        let mut srt = candidate("srt", "Movie.srt");
        srt.format = SubtitleFormat::Srt;
        let mut ass = candidate("ass", "Movie.ass");
        ass.format = SubtitleFormat::Ass;
        let mut zip = candidate("zip", "Movie.zip");
        zip.format = SubtitleFormat::Archive;
        let candidates = vec![zip, srt, ass];

        let ranked = rank_candidates(&candidates, TextFormat::Ass, &media);
        assert_eq!(urls(&ranked), vec!["ass", "srt", "zip"]);
    }

    #[test]
    fn test_downloads_then_year_then_hint() {
        let media = MediaDescriptor::new("Movie").with_year(2014);
        let mut popular = candidate("popular", "Movie");
        popular.download_count = Some(500);
        let mut missing = candidate("missing", "Movie 2014");
        missing.download_count = None;
        let mut zero_with_year = candidate("zero_with_year", "Movie 2014");
        zero_with_year.download_count = Some(0);
        let mut hinted = candidate("hinted", "Movie");
        hinted.score_hint = 5;
        let candidates = vec![hinted, zero_with_year, missing, popular];

        let ranked = rank_candidates(&candidates, TextFormat::Ass, &media);
        assert_eq!(
            urls(&ranked),
            vec!["popular", "zero_with_year", "missing", "hinted"]
        );
    }

    #[test]
    fn test_no_year_means_no_penalty() {
        let media = MediaDescriptor::new("Movie");
        let key = rank_key(&candidate("a", "no year here"), TextFormat::Ass, &media);
        assert_eq!(key.year_penalty, 0);
    }

    #[test]
    fn test_ties_keep_discovery_order() {
        let media = MediaDescriptor::new("Movie");
        let candidates = vec![
            candidate("first", "Movie"),
            candidate("second", "Movie"),
            candidate("third", "Movie"),
        ];
        let ranked = rank_candidates(&candidates, TextFormat::Ass, &media);
        assert_eq!(urls(&ranked), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_ranking_is_deterministic_under_reshuffle() {
        let media = MediaDescriptor::new("Movie").with_year(2020);
        let mut candidates = Vec::new();
        for i in 0..8u64 {
            let mut c = candidate(&format!("url-{i}"), "Movie");
            c.download_count = Some(i * 10);
            c.format = if i % 2 == 0 {
                SubtitleFormat::Archive
            } else {
                SubtitleFormat::Srt
            };
            if i % 3 == 0 {
                c.languages.insert(Language::Simplified);
            }
            candidates.push(c);
        }

        let first = urls(&rank_candidates(&candidates, TextFormat::Srt, &media));
        let again = urls(&rank_candidates(&candidates, TextFormat::Srt, &media));
        assert_eq!(first, again);

        candidates.reverse();
        candidates.swap(1, 5);
        let reshuffled = urls(&rank_candidates(&candidates, TextFormat::Srt, &media));
        assert_eq!(first, reshuffled);
    }

    #[test]
    fn test_input_is_untouched() {
        let media = MediaDescriptor::new("Movie");
        let mut low = candidate("low", "Movie");
        low.download_count = Some(1);
        let mut high = candidate("high", "Movie");
        high.download_count = Some(2);
        let candidates = vec![low, high];
        let before = candidates.clone();

        let best = choose_best(&candidates, TextFormat::Ass, &media).unwrap();
        assert_eq!(best.download_url, "high");
        assert_eq!(candidates, before);
    }

    #[test]
    fn test_choose_best_empty() {
        let media = MediaDescriptor::new("Movie");
        assert!(choose_best(&[], TextFormat::Ass, &media).is_none());
    }
}
