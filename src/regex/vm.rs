//! Backtracking VM (spec §4.8). An explicit `Vec<Task>` choice-point stack
//! stands in for the thread stack: a `Branch` clones the current task onto
//! the stack for its other arm and keeps executing the first; a failed
//! instruction pops the next alternative. Subroutine calls push a return
//! address onto the task's own call stack; atomic groups truncate the
//! choice-point stack back to the depth recorded at `Try`; lookaround runs
//! the same machinery recursively against a nested sub-program.

use std::collections::HashMap;

use super::ast::ClassItem;
use super::compiler::fold_key;
use super::limits::VmLimits;
use super::opcode::Inst;
use super::error::VmError;

#[derive(Copy, Clone, Debug, Default)]
pub struct VmOptions {
    pub insensitive: bool,
    pub multiline: bool,
}

pub type Captures = Vec<Option<usize>>;

#[derive(Clone)]
struct Task {
    ip: usize,
    sp: usize,
    match_start: usize,
    saves: Captures,
    call_stack: Vec<usize>,
    try_marks: Vec<usize>,
    progress: HashMap<usize, usize>,
}

enum Outcome {
    Continue,
    Matched,
    Failed,
}

/// Approximate heap footprint of one choice-point (spec §5/§6's `MEM_CAP`),
/// counting the backing allocations a `Task` owns beyond its own `size_of`.
fn task_heap_size(task: &Task) -> usize {
    std::mem::size_of::<Task>()
        + task.saves.capacity() * std::mem::size_of::<Option<usize>>()
        + task.call_stack.capacity() * std::mem::size_of::<usize>()
        + task.try_marks.capacity() * std::mem::size_of::<usize>()
        + task.progress.capacity() * (std::mem::size_of::<usize>() * 2)
}

fn stack_heap_size(stack: &[Task]) -> usize {
    stack.iter().map(task_heap_size).sum()
}

/// Runs the program starting at instruction 0, anchored at `start` in
/// `subject`. Returns `Ok(None)` when the pattern does not match there,
/// `Ok(Some(captures))` on success (`captures[0]`/`captures[1]` are the
/// overall match bounds), and `Err` when a resource limit is exceeded.
pub fn exec(
    program: &[Inst],
    subject: &[char],
    start: usize,
    group_count: usize,
    opts: VmOptions,
    limits: &VmLimits,
) -> Result<Option<Captures>, VmError> {
    let slots = 2 * group_count.max(1);
    let mut task = Task {
        ip: 0,
        sp: start,
        match_start: start,
        saves: vec![None; slots],
        call_stack: Vec::new(),
        try_marks: Vec::new(),
        progress: HashMap::new(),
    };
    let mut stack: Vec<Task> = Vec::new();

    loop {
        match step(program, subject, &mut task, &mut stack, limits, opts)? {
            Outcome::Continue => {}
            Outcome::Matched => {
                let mut saves = task.saves;
                saves[0] = Some(task.match_start);
                saves[1] = Some(task.sp);
                return Ok(Some(saves));
            }
            Outcome::Failed => match stack.pop() {
                Some(prev) => task = prev,
                None => return Ok(None),
            },
        }
    }
}

/// Tries every start offset from `from..=subject.len()` (or, for an
/// unanchored backward scan used by lookbehind, every offset from `0..=at`)
/// and returns the first captures that matches. This stands in for the
/// compiler-injected `UNANCHORED` scan prefix (spec §4.7): trying successive
/// starts here is observationally identical and keeps the compiled program
/// itself anchor-only.
pub fn exec_unanchored(
    program: &[Inst],
    subject: &[char],
    from: usize,
    group_count: usize,
    opts: VmOptions,
    limits: &VmLimits,
) -> Result<Option<Captures>, VmError> {
    for start in from..=subject.len() {
        if let Some(caps) = exec(program, subject, start, group_count, opts, limits)? {
            return Ok(Some(caps));
        }
    }
    Ok(None)
}

fn step(
    program: &[Inst],
    subject: &[char],
    task: &mut Task,
    stack: &mut Vec<Task>,
    limits: &VmLimits,
    opts: VmOptions,
) -> Result<Outcome, VmError> {
    let inst = &program[task.ip];
    match inst {
        Inst::Match => Ok(Outcome::Matched),
        Inst::Char(c) => consume(task, subject, |ch| ch == *c),
        Inst::CharFold(c) => {
            let want = *c;
            consume(task, subject, |ch| fold_key(ch) == want)
        }
        Inst::Str(s) => consume_str(task, subject, s, false),
        Inst::StrFold(s) => consume_str(task, subject, s, true),
        Inst::Class { negated, items } => {
            if task.sp >= subject.len() {
                return Ok(Outcome::Failed);
            }
            let ch = subject[task.sp];
            let hit = class_matches(items, ch, opts.insensitive);
            if hit != *negated {
                task.sp += 1;
                task.ip += 1;
                Ok(Outcome::Continue)
            } else {
                Ok(Outcome::Failed)
            }
        }
        Inst::Any => consume(task, subject, |ch| opts.multiline || (ch != '\n' && ch != '\0')),
        Inst::AnyChar => consume(task, subject, |_| true),
        Inst::Digit(neg) => consume(task, subject, |ch| ch.is_ascii_digit() != *neg),
        Inst::Word(neg) => consume(task, subject, |ch| is_word_char(ch) != *neg),
        Inst::Space(neg) => consume(task, subject, |ch| ch.is_whitespace() != *neg),
        Inst::Bol => {
            let at_line_start = task.sp == 0
                || (opts.multiline && subject[task.sp - 1] == '\n');
            if at_line_start {
                task.ip += 1;
                Ok(Outcome::Continue)
            } else {
                Ok(Outcome::Failed)
            }
        }
        Inst::Eol => {
            let at_line_end = task.sp == subject.len()
                || (opts.multiline && subject[task.sp] == '\n');
            if at_line_end {
                task.ip += 1;
                Ok(Outcome::Continue)
            } else {
                Ok(Outcome::Failed)
            }
        }
        Inst::Bos => {
            if task.sp == 0 {
                task.ip += 1;
                Ok(Outcome::Continue)
            } else {
                Ok(Outcome::Failed)
            }
        }
        Inst::Eos => {
            if task.sp == subject.len() {
                task.ip += 1;
                Ok(Outcome::Continue)
            } else {
                Ok(Outcome::Failed)
            }
        }
        Inst::Wb | Inst::Nwb => {
            let before = task.sp > 0 && is_word_char(subject[task.sp - 1]);
            let after = task.sp < subject.len() && is_word_char(subject[task.sp]);
            let boundary = before != after;
            let want = matches!(inst, Inst::Wb);
            if boundary == want {
                task.ip += 1;
                Ok(Outcome::Continue)
            } else {
                Ok(Outcome::Failed)
            }
        }
        Inst::Branch(a, b) => {
            if stack.len() >= limits.max_thread {
                tracing::warn!(limit = limits.max_thread, "regex thread stack exhausted");
                return Err(VmError::StackOverflow { limit: limits.max_thread });
            }
            let mut alt = task.clone();
            alt.ip = *b;
            let used = stack_heap_size(stack) + task_heap_size(&alt) + task_heap_size(task);
            if used > limits.mem_cap {
                tracing::warn!(limit = limits.mem_cap, used, "regex memory cap exceeded");
                return Err(VmError::OutOfMemory { limit: limits.mem_cap });
            }
            stack.push(alt);
            task.ip = *a;
            Ok(Outcome::Continue)
        }
        Inst::Jmp(a) => {
            task.ip = *a;
            Ok(Outcome::Continue)
        }
        Inst::Save(slot) => {
            if *slot < task.saves.len() {
                task.saves[*slot] = Some(task.sp);
            }
            task.ip += 1;
            Ok(Outcome::Continue)
        }
        Inst::Backref(n) => step_backref(task, subject, *n, opts.insensitive),
        Inst::Call(addr) => {
            if task.call_stack.len() >= limits.max_call_depth {
                tracing::warn!(limit = limits.max_call_depth, "regex subroutine depth exhausted");
                return Err(VmError::CallOverflow { limit: limits.max_call_depth });
            }
            task.call_stack.push(task.ip + 1);
            task.ip = *addr;
            Ok(Outcome::Continue)
        }
        Inst::Ret => match task.call_stack.pop() {
            Some(addr) => {
                task.ip = addr;
                Ok(Outcome::Continue)
            }
            None => Ok(Outcome::Failed),
        },
        Inst::Progress(id) => {
            if task.progress.get(id) == Some(&task.sp) {
                Ok(Outcome::Failed)
            } else {
                task.progress.insert(*id, task.sp);
                task.ip += 1;
                Ok(Outcome::Continue)
            }
        }
        Inst::Try => {
            task.try_marks.push(stack.len());
            task.ip += 1;
            Ok(Outcome::Continue)
        }
        Inst::Catch => {
            if let Some(mark) = task.try_marks.pop() {
                stack.truncate(mark);
            }
            task.ip += 1;
            Ok(Outcome::Continue)
        }
        Inst::SetStart => {
            task.match_start = task.sp;
            task.ip += 1;
            Ok(Outcome::Continue)
        }
        Inst::Lookaround {
            ahead,
            negate,
            sub_start,
        } => step_lookaround(task, subject, program, *ahead, *negate, *sub_start, limits, opts),
    }
}

fn consume(task: &mut Task, subject: &[char], pred: impl Fn(char) -> bool) -> Result<Outcome, VmError> {
    if task.sp < subject.len() && pred(subject[task.sp]) {
        task.sp += 1;
        task.ip += 1;
        Ok(Outcome::Continue)
    } else {
        Ok(Outcome::Failed)
    }
}

fn consume_str(task: &mut Task, subject: &[char], s: &str, fold: bool) -> Result<Outcome, VmError> {
    let chars: Vec<char> = s.chars().collect();
    if task.sp + chars.len() > subject.len() {
        return Ok(Outcome::Failed);
    }
    for (i, c) in chars.iter().enumerate() {
        let got = subject[task.sp + i];
        let matched = if fold { fold_key(got) == fold_key(*c) } else { got == *c };
        if !matched {
            return Ok(Outcome::Failed);
        }
    }
    task.sp += chars.len();
    task.ip += 1;
    Ok(Outcome::Continue)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn class_matches(items: &[ClassItem], ch: char, insensitive: bool) -> bool {
    items.iter().any(|item| class_item_matches(item, ch, insensitive))
}

fn class_item_matches(item: &ClassItem, ch: char, insensitive: bool) -> bool {
    match item {
        ClassItem::Char(c) => {
            if insensitive {
                fold_key(ch) == fold_key(*c)
            } else {
                ch == *c
            }
        }
        ClassItem::Range(lo, hi) => {
            if (*lo..=*hi).contains(&ch) {
                return true;
            }
            if insensitive {
                let folded = fold_key(ch);
                return (*lo..=*hi).contains(&folded)
                    || ch.to_uppercase().any(|u| (*lo..=*hi).contains(&u));
            }
            false
        }
        ClassItem::Digit(neg) => ch.is_ascii_digit() != *neg,
        ClassItem::Word(neg) => is_word_char(ch) != *neg,
        ClassItem::Space(neg) => ch.is_whitespace() != *neg,
        ClassItem::Posix { name, negated } => posix_class(name, ch) != *negated,
    }
}

fn posix_class(name: &str, ch: char) -> bool {
    match name {
        "upper" => ch.is_uppercase(),
        "lower" => ch.is_lowercase(),
        "alpha" => ch.is_alphabetic(),
        "digit" => ch.is_ascii_digit(),
        "xdigit" => ch.is_ascii_hexdigit(),
        "alnum" => ch.is_alphanumeric(),
        "punct" => ch.is_ascii_punctuation(),
        "blank" => ch == ' ' || ch == '\t',
        "space" => ch.is_whitespace(),
        "cntrl" => ch.is_control(),
        "graph" => !ch.is_whitespace() && !ch.is_control(),
        "print" => !ch.is_control(),
        _ => false,
    }
}

fn step_backref(task: &mut Task, subject: &[char], n: usize, insensitive: bool) -> Result<Outcome, VmError> {
    let start = task.saves.get(2 * n).copied().flatten();
    let end = task.saves.get(2 * n + 1).copied().flatten();
    let (start, end) = match (start, end) {
        (Some(s), Some(e)) => (s, e),
        // An unset group backreference never matches (spec leaves this an
        // open question; this mirrors PCRE's default).
        _ => return Ok(Outcome::Failed),
    };
    let len = end.saturating_sub(start);
    if task.sp + len > subject.len() {
        return Ok(Outcome::Failed);
    }
    for i in 0..len {
        let a = subject[start + i];
        let b = subject[task.sp + i];
        let eq = if insensitive { fold_key(a) == fold_key(b) } else { a == b };
        if !eq {
            return Ok(Outcome::Failed);
        }
    }
    task.sp += len;
    task.ip += 1;
    Ok(Outcome::Continue)
}

fn step_lookaround(
    task: &mut Task,
    subject: &[char],
    program: &[Inst],
    ahead: bool,
    negate: bool,
    sub_start: usize,
    limits: &VmLimits,
    opts: VmOptions,
) -> Result<Outcome, VmError> {
    let found = if ahead {
        sub_match_at(program, subject, sub_start, task.sp, task, limits, opts)?
    } else {
        let mut any = false;
        for candidate in (0..=task.sp).rev() {
            if sub_matches_exactly(program, subject, sub_start, candidate, task.sp, task, limits, opts)? {
                any = true;
                break;
            }
        }
        any
    };
    if found != negate {
        task.ip += 1;
        Ok(Outcome::Continue)
    } else {
        Ok(Outcome::Failed)
    }
}

/// Runs `sub_start` as a nested program anchored at `at`, sharing the
/// enclosing task's captures so a lookaround can feed group state to the
/// rest of the pattern; succeeds iff the sub-program reaches `Match`.
fn sub_match_at(
    program: &[Inst],
    subject: &[char],
    sub_start: usize,
    at: usize,
    outer: &Task,
    limits: &VmLimits,
    opts: VmOptions,
) -> Result<bool, VmError> {
    let mut task = Task {
        ip: sub_start,
        sp: at,
        match_start: at,
        saves: outer.saves.clone(),
        call_stack: Vec::new(),
        try_marks: Vec::new(),
        progress: HashMap::new(),
    };
    let mut stack: Vec<Task> = Vec::new();
    loop {
        match step(program, subject, &mut task, &mut stack, limits, opts)? {
            Outcome::Continue => {}
            Outcome::Matched => return Ok(true),
            Outcome::Failed => match stack.pop() {
                Some(prev) => task = prev,
                None => return Ok(false),
            },
        }
    }
}

fn sub_matches_exactly(
    program: &[Inst],
    subject: &[char],
    sub_start: usize,
    at: usize,
    must_end_at: usize,
    outer: &Task,
    limits: &VmLimits,
    opts: VmOptions,
) -> Result<bool, VmError> {
    let mut task = Task {
        ip: sub_start,
        sp: at,
        match_start: at,
        saves: outer.saves.clone(),
        call_stack: Vec::new(),
        try_marks: Vec::new(),
        progress: HashMap::new(),
    };
    let mut stack: Vec<Task> = Vec::new();
    loop {
        match step(program, subject, &mut task, &mut stack, limits, opts)? {
            Outcome::Continue => {}
            Outcome::Matched => {
                if task.sp == must_end_at {
                    return Ok(true);
                }
                match stack.pop() {
                    Some(prev) => task = prev,
                    None => return Ok(false),
                }
            }
            Outcome::Failed => match stack.pop() {
                Some(prev) => task = prev,
                None => return Ok(false),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regex::ast::ParseOptions;
    use crate::regex::compiler::compile;
    use crate::regex::limits::MAX_CALL_DEPTH;
    use crate::regex::parser::parse;

    fn run(pattern: &str, subject: &str) -> Option<Captures> {
        let r = parse(pattern, ParseOptions::default()).unwrap();
        let compiled = compile(&r.ast, &r.groups, ParseOptions::default());
        let chars: Vec<char> = subject.chars().collect();
        exec(
            &compiled.program,
            &chars,
            0,
            compiled.group_count,
            VmOptions::default(),
            &VmLimits::default(),
        )
        .unwrap()
    }

    #[test]
    fn literal_match() {
        let caps = run("abc", "abc").expect("should match");
        assert_eq!(caps[0], Some(0));
        assert_eq!(caps[1], Some(3));
    }

    #[test]
    fn backreference_matches_repeated_text() {
        let caps = run(r"(cat)\1", "catcat");
        assert!(caps.is_some());
    }

    #[test]
    fn backreference_rejects_mismatch() {
        let caps = run(r"(cat)\1", "catdog");
        assert!(caps.is_none());
    }

    #[test]
    fn atomic_group_does_not_backtrack_into_itself() {
        // (?>a*)a never matches since the atomic group greedily consumes
        // every `a` and can't give one back.
        let caps = run(r"(?>a*)a", "aaa");
        assert!(caps.is_none());
    }

    #[test]
    fn star_on_empty_matching_body_terminates() {
        let caps = run(r"(a*)*b", "aaaaac");
        assert!(caps.is_none());
    }

    #[test]
    fn branch_past_mem_cap_is_out_of_memory() {
        // (a|a)* never settles into Match against this subject, so it keeps
        // branching until the artificially tiny mem_cap below is exceeded.
        let r = parse(r"(a|a)*b", ParseOptions::default()).unwrap();
        let compiled = compile(&r.ast, &r.groups, ParseOptions::default());
        let chars: Vec<char> = "a".repeat(64).chars().collect();
        let limits = VmLimits {
            max_thread: 10_000,
            max_call_depth: MAX_CALL_DEPTH,
            mem_cap: 256,
        };
        let err = exec(
            &compiled.program,
            &chars,
            0,
            compiled.group_count,
            VmOptions::default(),
            &limits,
        )
        .unwrap_err();
        assert!(matches!(err, VmError::OutOfMemory { limit: 256 }));
    }

    #[test]
    fn positive_lookbehind() {
        let r = parse(r"(?<=foo)bar", ParseOptions::default()).unwrap();
        let compiled = compile(&r.ast, &r.groups, ParseOptions::default());
        let chars: Vec<char> = "foobar".chars().collect();
        let caps = exec(
            &compiled.program,
            &chars,
            3,
            compiled.group_count,
            VmOptions::default(),
            &VmLimits::default(),
        )
        .unwrap();
        assert!(caps.is_some());
    }
}
