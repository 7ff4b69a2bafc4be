//! Language tag inference from flag icons and text hints.

use crate::markup::MarkupNode;
use crate::subtitle::{Language, LanguageSet};

/// Icon `src` substrings, checked in order for each image.
const ICON_RULES: &[(&str, Language)] = &[
    ("jollyroger", Language::Bilingual),
    ("china", Language::Simplified),
    ("uk", Language::English),
    ("hongkong", Language::Traditional),
];

/// Text that marks a bilingual subtitle.
const BILINGUAL_HINTS: &[&str] = &["双语", "中英双语", "简英双语", "chs&eng", "chs_eng"];

/// Maps one icon `src` to a language tag.
pub fn language_from_icon(src: &str) -> Option<Language> {
    ICON_RULES
        .iter()
        .find(|(needle, _)| src.contains(needle))
        .map(|(_, language)| *language)
}

/// Whether `text` carries a bilingual keyword.
pub fn has_bilingual_hint(text: &str) -> bool {
    BILINGUAL_HINTS.iter().any(|hint| text.contains(hint))
}

/// Union of icon tags and text hints found in a row container.
pub fn detect_languages<N: MarkupNode>(container: &N) -> LanguageSet {
    let mut languages: LanguageSet = container
        .select_all("img")
        .iter()
        .filter_map(|img| img.attr("src"))
        .filter_map(|src| language_from_icon(&src))
        .collect();

    if has_bilingual_hint(&container.text()) {
        languages.insert(Language::Bilingual);
    }
    languages
}

/// Bilingual flag: the bilingual tag, or a bilingual marker in the row text.
pub fn is_bilingual(languages: &LanguageSet, row_text: &str) -> bool {
    languages.contains(&Language::Bilingual)
        || row_text.to_lowercase().contains("&eng")
        || row_text.contains("双语")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::DomNode;
    use dom_query::Document;

    fn languages_of(html: &str) -> LanguageSet {
        let doc = Document::from(html);
        let root = DomNode::root(&doc).unwrap();
        let div = root.select_first("div").unwrap();
        detect_languages(&div)
    }

    #[test]
    fn test_icon_mapping() {
        assert_eq!(language_from_icon("/img/jollyroger.gif"), Some(Language::Bilingual));
        assert_eq!(language_from_icon("/img/china.gif"), Some(Language::Simplified));
        assert_eq!(language_from_icon("/img/uk.gif"), Some(Language::English));
        assert_eq!(language_from_icon("/img/hongkong.gif"), Some(Language::Traditional));
        assert_eq!(language_from_icon("/img/france.gif"), None);
    }

    #[test]
    fn test_icons_and_text_hint_union() {
        let langs = languages_of(
            r#"<div>
                 <img src="/img/jollyroger.gif"/>
                 <img src="/img/china.gif"/>
                 <a href="/download/abc/xxx.sub">中英双语 字幕 SRT</a>
               </div>"#,
        );
        assert_eq!(
            langs.into_iter().collect::<Vec<_>>(),
            vec![Language::Bilingual, Language::Simplified]
        );
    }

    #[test]
    fn test_text_hint_adds_bilingual_once() {
        let langs = languages_of(r#"<div><a href="/download/1">Movie.chs&amp;eng.srt</a></div>"#);
        assert_eq!(langs.len(), 1);
        assert!(langs.contains(&Language::Bilingual));
    }

    #[test]
    fn test_repeated_icons_collapse() {
        let langs = languages_of(
            r#"<div><img src="/img/uk.gif"/><img src="/img/uk.gif"/><img/></div>"#,
        );
        assert_eq!(langs.len(), 1);
        assert!(langs.contains(&Language::English));
    }

    #[test]
    fn test_no_tags() {
        assert!(languages_of("<div><span>plain</span></div>").is_empty());
    }

    #[test]
    fn test_is_bilingual_from_text() {
        let empty = LanguageSet::new();
        assert!(is_bilingual(&empty, "Movie.CHS&ENG.srt"));
        assert!(is_bilingual(&empty, "简体双语"));
        assert!(!is_bilingual(&empty, "Movie.chs.srt"));

        let tagged: LanguageSet = [Language::Bilingual].into_iter().collect();
        assert!(is_bilingual(&tagged, ""));
    }
}
