use phf::phf_map;

/// Part-of-speech headings and their short names. Covers the headings
/// listed at WT:POS plus a handful of accepted extras.
pub static POS_TITLES: phf::Map<&'static str, &'static str> = phf_map! {
    "Adjective" => "adj",
    "Adverb" => "adv",
    "Ambiposition" => "ambip",
    "Article" => "art",
    "Circumposition" => "circump",
    "Classifier" => "classifier",
    "Clitic" => "clitic",
    "Conjunction" => "conj",
    "Contraction" => "contraction",
    "Counter" => "counter",
    "Determiner" => "determiner",
    "Ideophone" => "ideophone",
    "Interjection" => "interj",
    "Noun" => "n",
    "Numeral" => "num",
    "Participle" => "v",
    "Particle" => "particle",
    "Postposition" => "postp",
    "Preposition" => "prep",
    "Pronoun" => "pron",
    "Proper noun" => "prop",
    "Verb" => "v",

    // morphemes
    "Circumfix" => "circumfix",
    "Combining form" => "affix",
    "Infix" => "infix",
    "Interfix" => "interfix",
    "Prefix" => "prefix",
    "Root" => "root",
    "Suffix" => "suffix",

    // symbols and characters
    "Diacritical mark" => "diacrit",
    "Letter" => "letter",
    "Ligature" => "ligature",
    "Number" => "num",
    "Punctuation mark" => "punct",
    "Syllable" => "syllable",
    "Symbol" => "symbol",

    "Phrase" => "phrase",
    "Proverb" => "proverb",
    "Prepositional phrase" => "prep",

    "Romanization" => "rom",
    "Logogram" => "logo",
    "Determinative" => "dtv",

    // accepted, but not at WT:POS
    "Adjectival noun" => "adj",
    "Adnominal" => "adnominal",
    "Affix" => "affix",
    "Enclitic" => "enclitic",
    "Medial" => "medial",
    "Idiom" => "idiom",
    "Ordinal number" => "onum",
    "Preverb" => "preverb",
    "Prenoun" => "prenoun",
    "Transliteration" => "translit",
    "Verbal noun" => "verbalnoun",
    "Final" => "final",
    "Stem" => "stem",
    "Initial" => "initial",
};

pub fn is_pos_title(title: &str) -> bool {
    POS_TITLES.contains_key(title.trim())
}

/// Short name for a part-of-speech heading, e.g. `n` for `Noun`
pub fn pos_abbreviation(title: &str) -> Option<&'static str> {
    POS_TITLES.get(title.trim()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_titles() {
        assert!(is_pos_title("Noun"));
        assert!(is_pos_title(" Proper noun "));
        assert!(is_pos_title("Verbal noun"));
        assert!(!is_pos_title("Etymology"));
        assert!(!is_pos_title("noun"));
        assert_eq!(pos_abbreviation("Participle"), Some("v"));
        assert_eq!(pos_abbreviation("Pronunciation"), None);
    }
}
