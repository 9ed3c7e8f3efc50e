//! Replace / split / filter (spec §4.9). A match vector plus a small
//! template mini-language drives the substitution: `indicator` followed by
//! decimal digits names a capture group, and `\U \L \E \u \l` shift the
//! case of everything emitted until the next shift (or the template's end).

use super::error::VmError;
use super::Regex;

#[derive(Copy, Clone, PartialEq)]
enum CaseShift {
    None,
    Upper,
    Lower,
    UpperNext,
    LowerNext,
}

struct CaseState {
    run: CaseShift,
    next: Option<CaseShift>,
}

impl CaseState {
    fn new() -> CaseState {
        CaseState {
            run: CaseShift::None,
            next: None,
        }
    }

    fn apply(&mut self, c: char) -> char {
        let shift = self.next.take().unwrap_or(self.run);
        match shift {
            CaseShift::None => c,
            CaseShift::Upper | CaseShift::UpperNext => c.to_uppercase().next().unwrap_or(c),
            CaseShift::Lower | CaseShift::LowerNext => c.to_lowercase().next().unwrap_or(c),
        }
    }
}

/// Expands `template` against one match's captures, appending the result
/// to `out`. `indicator` introduces a `\d+` group reference; everything
/// else passes through, subject to the running case-shift state.
fn expand_template(template: &str, subject: &[char], m: &super::Match, indicator: char, out: &mut String) {
    let mut state = CaseState::new();
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c == indicator && chars.peek().map(|d| d.is_ascii_digit()).unwrap_or(false) {
            let mut n = 0usize;
            while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
                n = n * 10 + d as usize;
                chars.next();
            }
            if let Some((s, e)) = m.group(n) {
                for &ch in &subject[s..e] {
                    out.push(state.apply(ch));
                }
            }
            continue;
        }
        if c == '\\' {
            match chars.peek() {
                Some('U') => {
                    chars.next();
                    state.run = CaseShift::Upper;
                    continue;
                }
                Some('L') => {
                    chars.next();
                    state.run = CaseShift::Lower;
                    continue;
                }
                Some('E') => {
                    chars.next();
                    state.run = CaseShift::None;
                    continue;
                }
                Some('u') => {
                    chars.next();
                    state.next = Some(CaseShift::UpperNext);
                    continue;
                }
                Some('l') => {
                    chars.next();
                    state.next = Some(CaseShift::LowerNext);
                    continue;
                }
                _ => {}
            }
        }
        out.push(state.apply(c));
    }
}

pub fn replace(regex: &Regex, subject: &str, template: &str, indicator: char) -> Result<String, VmError> {
    let chars: Vec<char> = subject.chars().collect();
    let matches = regex.find_all_chars(&chars)?;
    let mut out = String::new();
    let mut cursor = 0usize;
    for m in &matches {
        for &ch in &chars[cursor..m.start()] {
            out.push(ch);
        }
        expand_template(template, &chars, m, indicator, &mut out);
        cursor = m.end();
    }
    for &ch in &chars[cursor..] {
        out.push(ch);
    }
    Ok(out)
}

/// Splits `subject` on every match, skipping only a zero-width match that
/// falls at the very start or end of the subject (a `\b`-style pattern
/// matching in the interior still splits there; spec §4.9).
pub fn split(regex: &Regex, subject: &str) -> Result<Vec<String>, VmError> {
    let chars: Vec<char> = subject.chars().collect();
    let matches = regex.find_all_chars(&chars)?;
    let mut pieces = Vec::new();
    let mut cursor = 0usize;
    for m in &matches {
        if m.start() == 0 || m.start() == chars.len() {
            continue;
        }
        pieces.push(chars[cursor..m.start()].iter().collect());
        cursor = m.end();
    }
    pieces.push(chars[cursor..].iter().collect());
    Ok(pieces)
}

#[cfg(test)]
mod tests {
    use super::super::Regex;

    #[test]
    fn replace_reorders_groups() {
        let re = Regex::compile(r"(\w+) (\w+)", 0).unwrap();
        assert_eq!(re.replace("John Smith", "$2 $1", '$').unwrap(), "Smith John");
    }

    #[test]
    fn replace_applies_upper_shift() {
        let re = Regex::compile(r"(\w+)", Regex::GLOBAL).unwrap();
        assert_eq!(re.replace("hi there", r"\U$1\E", '$').unwrap(), "HI THERE");
    }

    #[test]
    fn split_skips_zero_width_matches() {
        let re = Regex::compile(r"\s+", Regex::GLOBAL).unwrap();
        assert_eq!(re.split("one two  three").unwrap(), vec!["one", "two", "three"]);
    }

    #[test]
    fn split_on_word_boundary_only_skips_start_and_end() {
        // \b matches (zero-width) at offsets 0, 2, 3 and 5 in "ab cd"; only
        // the ones at the very start and end are skipped, so the interior
        // boundaries at 2 and 3 still split.
        let re = Regex::compile(r"\b", Regex::GLOBAL).unwrap();
        assert_eq!(re.split("ab cd").unwrap(), vec!["ab", " ", "cd"]);
    }

    #[test]
    fn filter_is_replace_with_dollar_indicator() {
        let re = Regex::compile(r"(\d+)", Regex::GLOBAL).unwrap();
        assert_eq!(re.filter("id=42", "[$1]").unwrap(), "id=[42]");
    }
}
