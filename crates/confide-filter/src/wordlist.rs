//! Canonical term list. Never served to clients.

use std::collections::HashSet;

pub const HINDI_DEVANAGARI: &[&str] = &[
    "बहनचोद", "भोसडी", "मादरचोद", "चूतिया", "गांड", "लौड़ा", "लंड", "भड़वा",
    "रंडी", "हरामी", "कमीना", "कुत्ता", "सूअर", "उल्लू", "गधा", "बकचोद",
    "चूस", "लौड़े", "भोसड़ी", "झाटू", "टट्टी", "मूत", "हग", "फुद्दी",
    "बेवकूफ", "नालायक", "निकम्मा", "बदतमीज़", "बदमाश",
];

pub const HINDI_ROMAN: &[&str] = &[
    "bhenchod", "behenchod", "bhosdike", "madarchod", "madarjaat", "chutiya",
    "chut", "gaand", "gandu", "lauda", "lavde", "lund", "bhadwa", "randi",
    "harami", "kamina", "kutta", "suar", "bakchod", "chod", "choos", "jhatu",
    "jhant", "tatti", "tatte", "moot", "fuddi", "bc", "mc", "bsdk",
];

pub const ENGLISH: &[&str] = &[
    "fuck", "shit", "ass", "bitch", "bastard", "damn", "crap", "dick", "cock",
    "pussy", "whore", "slut", "cunt", "nigger", "fag", "faggot", "retard",
    "idiot", "stupid", "dumb", "hate", "kill", "die", "suicide", "murder",
    "rape", "porn", "sex", "nude", "naked", "xxx", "wtf", "stfu", "gtfo",
    "lmao", "asshole", "motherfucker", "fucker", "bullshit", "piss", "wanker",
];

/// Every list above, in order, without duplicates.
pub fn standard_terms() -> Vec<&'static str> {
    let mut seen = HashSet::new();
    HINDI_DEVANAGARI
        .iter()
        .chain(HINDI_ROMAN)
        .chain(ENGLISH)
        .copied()
        .filter(|t| seen.insert(*t))
        .collect()
}
