use crate::feature::Feature;

/// Answering mode of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Level {
    /// Level 1: the answer is picked from a list of canonical names.
    Selection,
    /// Level 2: the answer is typed and may be any accepted name of the feature.
    FreeText,
}

impl Level {
    pub fn number(self) -> u8 {
        match self {
            Level::Selection => 1,
            Level::FreeText => 2,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown quiz level {0}; expected 1 or 2")]
pub struct UnknownLevel(pub u8);

impl TryFrom<u8> for Level {
    type Error = UnknownLevel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Level::Selection),
            2 => Ok(Level::FreeText),
            other => Err(UnknownLevel(other)),
        }
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.number()
    }
}

/// Strips every whitespace character and lower-cases the rest.
pub fn normalize(input: &str) -> String {
    input
        .chars()
        .filter(|character| !character.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Returns whether `answer` identifies `feature` under the rules of `level`.
///
/// Selection answers must equal the canonical name exactly. Free-text answers
/// are compared after [`normalize`] against every accepted name. A missing
/// answer never matches.
pub fn matches(feature: &Feature, answer: Option<&str>, level: Level) -> bool {
    let Some(answer) = answer else {
        return false;
    };

    match level {
        Level::Selection => answer == feature.canonical_name(),
        Level::FreeText => {
            let typed = normalize(answer);
            feature
                .accepted_answers
                .iter()
                .any(|candidate| normalize(candidate) == typed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::LatLng;

    fn sully_road() -> Feature {
        Feature::road(
            "Rt 28 (Sully Road)",
            &["rt28", "route28", "sullyroad", "sullyrd"],
            vec![vec![LatLng::new(38.99, -77.43), LatLng::new(39.03, -77.43)]],
        )
    }

    #[test]
    fn normalize_strips_whitespace_and_case() {
        assert_eq!(normalize("Rt 7"), "rt7");
        assert_eq!(normalize(" RT7 "), "rt7");
        assert_eq!(normalize("rt7"), "rt7");
        assert_eq!(normalize("\tSully\u{00a0}Rd\n"), "sullyrd");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        for input in ["  SteRling Blvd", "Rt 28 (Sully Road)", "İstanbul Rd", ""] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn missing_answer_never_matches() {
        let feature = sully_road();

        assert!(!matches(&feature, None, Level::Selection));
        assert!(!matches(&feature, None, Level::FreeText));
    }

    #[test]
    fn selection_requires_exact_canonical_name() {
        let feature = sully_road();

        assert!(matches(&feature, Some("Rt 28 (Sully Road)"), Level::Selection));
        assert!(!matches(&feature, Some("rt 28 (sully road)"), Level::Selection));
        assert!(!matches(&feature, Some("sullyrd"), Level::Selection));
    }

    #[test]
    fn free_text_accepts_any_synonym() {
        let feature = sully_road();

        for answer in feature.accepted_answers.clone() {
            assert!(matches(&feature, Some(&answer), Level::FreeText), "{answer}");
        }
        assert!(matches(&feature, Some("sully rd"), Level::FreeText));
        assert!(matches(&feature, Some("  ROUTE 28 "), Level::FreeText));
        assert!(matches(&feature, Some("rt 28 (sully road)"), Level::FreeText));
    }

    #[test]
    fn free_text_rejects_near_misses() {
        let feature = sully_road();

        assert!(!matches(&feature, Some("Rt289"), Level::FreeText));
        assert!(!matches(&feature, Some(""), Level::FreeText));
        assert!(!matches(&feature, Some("sully"), Level::FreeText));
    }

    #[test]
    fn level_parses_from_number() {
        assert_eq!(Level::try_from(1), Ok(Level::Selection));
        assert_eq!(Level::try_from(2), Ok(Level::FreeText));
        assert_eq!(Level::try_from(3), Err(UnknownLevel(3)));

        let parsed: Level = serde_json::from_str("2").expect("level should parse");
        assert_eq!(parsed, Level::FreeText);
        assert!(serde_json::from_str::<Level>("0").is_err());
    }
}
