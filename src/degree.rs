//! Wave degrees and their label notation
//!
//! Static configuration only: degrees name the timeframe scale a count
//! belongs to and pick the label style for its points.

use serde::{Deserialize, Serialize};

use crate::PatternType;

/// Elliott Wave degree, largest first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Degree {
    GrandSupercycle,
    Supercycle,
    Cycle,
    Primary,
    Intermediate,
    #[default]
    Minor,
    Minute,
    Minuette,
    Subminuette,
}

/// Label notation of one degree. Index 0 is always the origin "0".
struct Notation {
    name: &'static str,
    motive: [&'static str; 6],
    corrective: [&'static str; 6],
}

const NOTATIONS: [Notation; 9] = [
    Notation {
        name: "Grand Supercycle",
        motive: ["0", "[I]", "[II]", "[III]", "[IV]", "[V]"],
        corrective: ["0", "[a]", "[b]", "[c]", "[d]", "[e]"],
    },
    Notation {
        name: "Supercycle",
        motive: ["0", "(I)", "(II)", "(III)", "(IV)", "(V)"],
        corrective: ["0", "(a)", "(b)", "(c)", "(d)", "(e)"],
    },
    Notation {
        name: "Cycle",
        motive: ["0", "I", "II", "III", "IV", "V"],
        corrective: ["0", "a", "b", "c", "d", "e"],
    },
    Notation {
        name: "Primary",
        motive: ["0", "①", "②", "③", "④", "⑤"],
        corrective: ["0", "Ⓐ", "Ⓑ", "Ⓒ", "Ⓓ", "Ⓔ"],
    },
    Notation {
        name: "Intermediate",
        motive: ["0", "(1)", "(2)", "(3)", "(4)", "(5)"],
        corrective: ["0", "(A)", "(B)", "(C)", "(D)", "(E)"],
    },
    Notation {
        name: "Minor",
        motive: ["0", "1", "2", "3", "4", "5"],
        corrective: ["0", "A", "B", "C", "D", "E"],
    },
    Notation {
        name: "Minute",
        motive: ["0", "((i))", "((ii))", "((iii))", "((iv))", "((v))"],
        corrective: ["0", "((a))", "((b))", "((c))", "((d))", "((e))"],
    },
    Notation {
        name: "Minuette",
        motive: ["0", "(i)", "(ii)", "(iii)", "(iv)", "(v)"],
        corrective: ["0", "(a)", "(b)", "(c)", "(d)", "(e)"],
    },
    Notation {
        name: "Subminuette",
        motive: ["0", "i", "ii", "iii", "iv", "v"],
        corrective: ["0", "a", "b", "c", "d", "e"],
    },
];

impl Degree {
    pub const ALL: [Degree; 9] = [
        Degree::GrandSupercycle,
        Degree::Supercycle,
        Degree::Cycle,
        Degree::Primary,
        Degree::Intermediate,
        Degree::Minor,
        Degree::Minute,
        Degree::Minuette,
        Degree::Subminuette,
    ];

    #[inline]
    fn notation(self) -> &'static Notation {
        &NOTATIONS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.notation().name
    }

    /// Point labels for a pattern of this degree, one per required point
    pub fn labels(self, pattern: PatternType) -> &'static [&'static str] {
        let notation = self.notation();
        match pattern {
            PatternType::Impulse | PatternType::Diagonal => &notation.motive,
            PatternType::Triangle => &notation.corrective,
            PatternType::Corrective(_) => &notation.corrective[..4],
        }
    }

    /// Next larger degree, `None` at the top
    pub fn higher(self) -> Option<Degree> {
        (self as usize).checked_sub(1).map(|i| Self::ALL[i])
    }

    /// Next smaller degree, `None` at the bottom
    pub fn lower(self) -> Option<Degree> {
        Self::ALL.get(self as usize + 1).copied()
    }
}
