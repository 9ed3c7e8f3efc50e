use kdgu_text::Regex;

#[test]
fn backreference_matches_repeated_word() {
    let re = Regex::compile(r"(cat|dog)\1", Regex::UNANCHORED).unwrap();
    let m = re.find("catcat").unwrap().expect("should match");
    assert_eq!((m.start(), m.end()), (0, 6));
    assert!(re.find("catdog").unwrap().is_none());
}

#[test]
fn case_insensitive_inline_modifier() {
    let re = Regex::compile("(?i)hello", Regex::UNANCHORED).unwrap();
    let m = re.find("say HELLO now").unwrap().expect("should match");
    assert_eq!((m.start(), m.end()), (4, 9));
}

#[test]
fn multiline_anchors_with_global() {
    let re = Regex::compile(r"^(\w+):(\d+)$", Regex::MULTILINE | Regex::GLOBAL).unwrap();
    let matches = re.exec("alpha:1\nbeta:22\ngamma:333").unwrap().expect("should match");
    assert_eq!(matches.len(), 3);
    assert_eq!(matches[0].group(1), Some((0, 5)));
    assert_eq!(matches[1].group(2), Some((13, 15)));
    assert_eq!(matches[2].group(2), Some((22, 25)));
}

#[test]
fn atomic_group_does_not_give_back_on_failure() {
    let re = Regex::compile(r"(?>a+)a", Regex::UNANCHORED).unwrap();
    assert!(re.find("aaa").unwrap().is_none());
}

#[test]
fn catastrophic_nested_star_terminates_without_match() {
    let re = Regex::compile(r"(a*)*b", Regex::UNANCHORED).unwrap();
    assert!(re.find("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaac").unwrap().is_none());
}

#[test]
fn lookbehind_and_lookahead_compose() {
    let re = Regex::compile(r"(?<=\$)\d+(?=\.00)", Regex::UNANCHORED).unwrap();
    let m = re.find("price: $42.00").unwrap().expect("should match");
    assert_eq!((m.start(), m.end()), (8, 10));
}

#[test]
fn named_groups_across_global_matches() {
    let re = Regex::compile(r"(?<user>\w+)@(?<host>\w+)", Regex::GLOBAL).unwrap();
    let matches = re.exec("a@b c@d").unwrap().expect("should match");
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].name("user"), Some((0, 1)));
    assert_eq!(matches[1].name("host"), Some((6, 7)));
}

#[test]
fn replace_with_case_shift_template() {
    let re = Regex::compile(r"(\w+)", Regex::GLOBAL).unwrap();
    assert_eq!(re.replace("hello world", r"\u$1", '$').unwrap(), "Hello World");
}

#[test]
fn split_on_whitespace_skips_empty_boundary_pieces() {
    let re = Regex::compile(r"\s+", Regex::GLOBAL).unwrap();
    assert_eq!(re.split("  a  b   c").unwrap(), vec!["", "a", "b", "c"]);
}

#[test]
fn continue_mode_steps_through_successive_matches() {
    let re = Regex::compile(r"\d+", Regex::CONTINUE | Regex::UNANCHORED).unwrap();
    let first = re.exec("12 and 34").unwrap().expect("first match");
    assert_eq!((first[0].start(), first[0].end()), (0, 2));
    let second = re.exec("12 and 34").unwrap().expect("second match");
    assert_eq!((second[0].start(), second[0].end()), (7, 9));
    re.reset();
    let again = re.exec("12 and 34").unwrap().expect("reset restarts at 0");
    assert_eq!((again[0].start(), again[0].end()), (0, 2));
}

#[test]
fn global_and_continue_together_is_rejected() {
    assert!(Regex::compile("a", Regex::GLOBAL | Regex::CONTINUE).is_err());
}

#[test]
fn unset_group_backreference_never_matches() {
    let re = Regex::compile(r"(a)?\1b", Regex::UNANCHORED).unwrap();
    assert!(re.find("b").unwrap().is_none());
    let m = re.find("aab").unwrap().expect("first branch taken");
    assert_eq!((m.start(), m.end()), (0, 3));
}
