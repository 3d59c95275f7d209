use serde::{Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Semantic role of a definition-list item
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemType {
    Sense,
    Syn,
    Ant,
    Hyper,
    Hypo,
    Holo,
    Mero,
    Tropo,
    Comero,
    Cot,
    Parasyn,
    Perfect,
    Imperfect,
    Active,
    Midvoice,
    Alti,
    Co,
    Ux,
    Quote,
    BareQuote,
    BareUx,
    Unknown,
    /// A category introduced by configuration
    Other(String),
}

impl ItemType {
    pub fn as_str(&self) -> &str {
        match self {
            ItemType::Sense => "sense",
            ItemType::Syn => "syn",
            ItemType::Ant => "ant",
            ItemType::Hyper => "hyper",
            ItemType::Hypo => "hypo",
            ItemType::Holo => "holo",
            ItemType::Mero => "mero",
            ItemType::Tropo => "tropo",
            ItemType::Comero => "comero",
            ItemType::Cot => "cot",
            ItemType::Parasyn => "parasyn",
            ItemType::Perfect => "perfect",
            ItemType::Imperfect => "imperfect",
            ItemType::Active => "active",
            ItemType::Midvoice => "midvoice",
            ItemType::Alti => "alti",
            ItemType::Co => "co",
            ItemType::Ux => "ux",
            ItemType::Quote => "quote",
            ItemType::BareQuote => "bare_quote",
            ItemType::BareUx => "bare_ux",
            ItemType::Unknown => "unknown",
            ItemType::Other(name) => name,
        }
    }
}

impl FromStr for ItemType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "sense" => ItemType::Sense,
            "syn" => ItemType::Syn,
            "ant" => ItemType::Ant,
            "hyper" => ItemType::Hyper,
            "hypo" => ItemType::Hypo,
            "holo" => ItemType::Holo,
            "mero" => ItemType::Mero,
            "tropo" => ItemType::Tropo,
            "comero" => ItemType::Comero,
            "cot" => ItemType::Cot,
            "parasyn" => ItemType::Parasyn,
            "perfect" => ItemType::Perfect,
            "imperfect" => ItemType::Imperfect,
            "active" => ItemType::Active,
            "midvoice" => ItemType::Midvoice,
            "alti" => ItemType::Alti,
            "co" => ItemType::Co,
            "ux" => ItemType::Ux,
            "quote" => ItemType::Quote,
            "bare_quote" => ItemType::BareQuote,
            "bare_ux" => ItemType::BareUx,
            "unknown" => ItemType::Unknown,
            other => ItemType::Other(other.to_string()),
        })
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ItemType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_parse_back() {
        for item_type in [ItemType::Sense, ItemType::BareQuote, ItemType::BareUx, ItemType::Midvoice] {
            assert_eq!(item_type.as_str().parse::<ItemType>(), Ok(item_type));
        }
    }

    #[test]
    fn test_unrecognized_name_is_other() {
        assert_eq!("rhymes".parse::<ItemType>(), Ok(ItemType::Other("rhymes".to_string())));
        assert_eq!(ItemType::Other("rhymes".to_string()).to_string(), "rhymes");
    }
}
