/// Leetspeak substitutions applied after lowercasing.
const LEETSPEAK: &[(char, char)] = &[
    ('4', 'a'),
    ('@', 'a'),
    ('3', 'e'),
    ('1', 'i'),
    ('!', 'i'),
    ('0', 'o'),
    ('5', 's'),
    ('$', 's'),
    ('7', 't'),
    ('+', 't'),
];

/// The three views of a message the word list is matched against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    /// Lowercased, de-leeted, runs of 3+ identical chars cut to 2.
    pub with_spaces: String,
    /// `with_spaces` without any whitespace.
    pub no_spaces: String,
    /// `no_spaces` with every run cut to a single char.
    pub squeezed: String,
}

pub fn normalize(text: &str) -> NormalizedText {
    let lowered: String = text.to_lowercase().chars().map(unleet).collect();
    let with_spaces = limit_runs(&lowered, 2);
    let no_spaces: String = with_spaces.chars().filter(|c| !c.is_whitespace()).collect();
    let squeezed = squeeze(&no_spaces);

    NormalizedText {
        with_spaces,
        no_spaces,
        squeezed,
    }
}

/// Collapse every run of identical characters to one.
pub fn squeeze(text: &str) -> String {
    limit_runs(text, 1)
}

fn unleet(c: char) -> char {
    LEETSPEAK
        .iter()
        .find(|(leet, _)| *leet == c)
        .map_or(c, |(_, plain)| *plain)
}

fn limit_runs(text: &str, max: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;
    let mut run = 0usize;

    for c in text.chars() {
        if prev == Some(c) {
            run += 1;
        } else {
            prev = Some(c);
            run = 1;
        }
        if run <= max {
            out.push(c);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_unleets() {
        let n = normalize("H3LL0 W0RLD!");
        assert_eq!(n.with_spaces, "hello worldi");
    }

    #[test]
    fn long_runs_keep_two() {
        let n = normalize("fuuuuck  yeah");
        assert_eq!(n.with_spaces, "fuuck  yeah");
        assert_eq!(n.no_spaces, "fuuckyeah");
        assert_eq!(n.squeezed, "fuckyeah");
    }

    #[test]
    fn whitespace_of_any_kind_is_removed() {
        let n = normalize("a b\tc\nd");
        assert_eq!(n.no_spaces, "abcd");
    }

    #[test]
    fn squeeze_handles_multibyte() {
        assert_eq!(squeeze("गगगांड"), "गांड");
        assert_eq!(squeeze(""), "");
    }
}
