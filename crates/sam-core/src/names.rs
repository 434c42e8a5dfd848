//! Account display-name folding and owner matching.
//!
//! LinkedIn display names often use "fancy" Unicode letters (𝐁𝐨𝐥𝐝, 𝖲𝖺𝗇𝗌) that
//! defeat plain text matching. Names are folded to lowercase ASCII before being
//! compared with the configured owner rules.

use serde::{Deserialize, Serialize};

/// First code point of the Mathematical Alphanumeric Symbols letter runs.
const MATH_LETTERS_START: u32 = 0x1D400;
/// Last code point of the final (monospace) letter run.
const MATH_LETTERS_END: u32 = 0x1D6A3;
const MATH_DIGITS_START: u32 = 0x1D7CE;
const MATH_DIGITS_END: u32 = 0x1D7FF;

/// Styled letters that live outside the math block. Their slots inside it
/// are unassigned, so names styled italic, script, fraktur or double-struck
/// pick these up instead.
const LETTERLIKE: &[(char, char)] = &[
    ('\u{210E}', 'h'),
    ('\u{212C}', 'B'),
    ('\u{2130}', 'E'),
    ('\u{2131}', 'F'),
    ('\u{210B}', 'H'),
    ('\u{2110}', 'I'),
    ('\u{2112}', 'L'),
    ('\u{2133}', 'M'),
    ('\u{211B}', 'R'),
    ('\u{212F}', 'e'),
    ('\u{210A}', 'g'),
    ('\u{2134}', 'o'),
    ('\u{212D}', 'C'),
    ('\u{210C}', 'H'),
    ('\u{2111}', 'I'),
    ('\u{211C}', 'R'),
    ('\u{2128}', 'Z'),
    ('\u{2102}', 'C'),
    ('\u{210D}', 'H'),
    ('\u{2115}', 'N'),
    ('\u{2119}', 'P'),
    ('\u{211A}', 'Q'),
    ('\u{211D}', 'R'),
    ('\u{2124}', 'Z'),
    ('\u{1D6A4}', 'i'),
    ('\u{1D6A5}', 'j'),
];

/// Maps an account display name to the workspace member who owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRule {
    /// Lowercase words; any one appearing as a whole word in the folded
    /// display name selects this rule.
    pub tokens: Vec<String>,
    /// Email of the owning workspace member.
    pub email: String,
    /// Optional human label for reports.
    #[serde(default)]
    pub name: Option<String>,
}

/// Fold mathematical alphanumeric letters, their letterlike stand-ins, and
/// math digits to ASCII and lowercase the result.
#[must_use]
pub fn fold_display_name(name: &str) -> String {
    name.chars().map(fold_char).collect::<String>().to_lowercase()
}

fn fold_char(c: char) -> char {
    let cp = u32::from(c);
    let folded = match cp {
        MATH_LETTERS_START..=MATH_LETTERS_END => {
            // 26 capitals then 26 lowercase per style.
            let offset = (cp - MATH_LETTERS_START) % 52;
            if offset < 26 {
                u32::from(b'A') + offset
            } else {
                u32::from(b'a') + offset - 26
            }
        }
        MATH_DIGITS_START..=MATH_DIGITS_END => u32::from(b'0') + (cp - MATH_DIGITS_START) % 10,
        _ => {
            return LETTERLIKE
                .iter()
                .find(|(styled, _)| *styled == c)
                .map_or(c, |(_, plain)| *plain);
        }
    };
    char::from_u32(folded).unwrap_or(c)
}

/// Find the first owner rule matching a display name.
#[must_use]
pub fn match_owner<'a>(display_name: &str, rules: &'a [OwnerRule]) -> Option<&'a OwnerRule> {
    let folded = fold_display_name(display_name);
    let words = folded
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>();

    rules.iter().find(|rule| {
        rule.tokens
            .iter()
            .map(|token| token.trim().to_lowercase())
            .any(|token| !token.is_empty() && words.contains(&token.as_str()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rules() -> Vec<OwnerRule> {
        vec![
            OwnerRule {
                tokens: vec!["charissa".into(), "saniel".into()],
                email: "cs@example.com".into(),
                name: Some("Charissa Saniel".into()),
            },
            OwnerRule {
                tokens: vec!["michelle".into(), "gestuveo".into()],
                email: "ma@example.com".into(),
                name: None,
            },
        ]
    }

    #[test]
    fn folds_bold_and_sans_serif_letters() {
        assert_eq!(fold_display_name("𝐂𝐡𝐚𝐫𝐢𝐬𝐬𝐚"), "charissa");
        assert_eq!(fold_display_name("𝖲𝖺𝗇𝗂𝖾𝗅"), "saniel");
        assert_eq!(fold_display_name("𝗦𝗔𝗡𝗜𝗘𝗟"), "saniel");
        assert_eq!(fold_display_name("𝟐𝟎𝟐𝟓"), "2025");
    }

    #[test]
    fn folds_letterlike_stand_ins() {
        // Italic h is U+210E, not a math-block code point.
        assert_eq!(fold_display_name("𝐶ℎ𝑎𝑟𝑖𝑠𝑠𝑎"), "charissa");
        assert_eq!(fold_display_name("ℬℯℛℐℒ"), "beril");
        assert_eq!(fold_display_name("ℭℌℜℨ"), "chrz");
        assert_eq!(fold_display_name("ℂℍℕℙℚℝℤ"), "chnpqrz");
        assert_eq!(fold_display_name("𝚤𝚥"), "ij");
    }

    #[test]
    fn matches_italic_display_name() {
        let rules = rules();
        let owner = match_owner("𝐶ℎ𝑎𝑟𝑖𝑠𝑠𝑎 𝑆𝑎𝑛𝑖𝑒𝑙", &rules).unwrap();
        assert_eq!(owner.email, "cs@example.com");
    }

    #[test]
    fn leaves_regular_text_alone_except_case() {
        assert_eq!(fold_display_name("Jürgen Heim"), "jürgen heim");
    }

    #[test]
    fn matches_fancy_display_name() {
        let rules = rules();
        let owner = match_owner("𝐂𝐡𝐚𝐫𝐢𝐬𝐬𝐚 Saniel | Growth", &rules).unwrap();
        assert_eq!(owner.email, "cs@example.com");
    }

    #[test]
    fn requires_whole_word_match() {
        let rules = rules();
        assert!(match_owner("Michelleville Partners", &rules).is_none());
        assert_eq!(
            match_owner("Michelle Angelica Gestuveo", &rules).map(|r| r.email.as_str()),
            Some("ma@example.com")
        );
    }

    #[test]
    fn first_matching_rule_wins() {
        let mut rules = rules();
        rules.push(OwnerRule {
            tokens: vec!["charissa".into()],
            email: "other@example.com".into(),
            name: None,
        });
        assert_eq!(
            match_owner("Charissa", &rules).map(|r| r.email.as_str()),
            Some("cs@example.com")
        );
    }
}
