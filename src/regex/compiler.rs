//! AST to bytecode lowering (spec §4.7). Each capturing group and each
//! lookaround body is compiled once into its own segment; segments are laid
//! out back to back after the main program and every `Call`/`Lookaround`
//! reference is patched to the segment's final absolute address. This is
//! what lets a forward subroutine reference like `(?+1)` resolve correctly
//! even though group 1's body is compiled later in the traversal.

use super::ast::{Ast, ClassItem, GroupInfo, ParseOptions};
use super::opcode::Inst;

pub struct Compiled {
    pub program: Vec<Inst>,
    pub group_count: usize,
}

pub fn compile(ast: &Ast, groups: &[GroupInfo], opts: ParseOptions) -> Compiled {
    let mut c = Compiler {
        segments: vec![Vec::new(); groups.len().max(1)],
        defined: vec![false; groups.len().max(1)],
        pending_calls: Vec::new(),
        next_loop_id: 0,
    };
    c.compile_node(0, ast, opts);
    c.segments[0].push(Inst::Match);

    let mut base = vec![0usize; c.segments.len()];
    let mut offset = 0;
    for (i, seg) in c.segments.iter().enumerate() {
        base[i] = offset;
        offset += seg.len();
    }

    let mut program = Vec::with_capacity(offset);
    for seg in &c.segments {
        program.extend(seg.iter().cloned());
    }

    for (seg_idx, local_pos, target) in &c.pending_calls {
        let abs_pos = base[*seg_idx] + local_pos;
        let entry = base[*target];
        match &program[abs_pos] {
            Inst::Lookaround { ahead, negate, .. } => {
                program[abs_pos] = Inst::Lookaround {
                    ahead: *ahead,
                    negate: *negate,
                    sub_start: entry,
                };
            }
            _ => program[abs_pos] = Inst::Call(entry),
        }
    }

    // Rewrite local (segment-relative) Branch/Jmp/Lookaround targets to
    // absolute addresses now that every segment's base offset is fixed.
    let mut abs_pos = 0;
    for (seg_idx, seg) in c_segment_lengths(&c.segments).into_iter().enumerate() {
        let b = base[seg_idx];
        for _ in 0..seg {
            match &mut program[abs_pos] {
                Inst::Branch(a, bb) => {
                    *a += b;
                    *bb += b;
                }
                Inst::Jmp(a) => *a += b,
                _ => {}
            }
            abs_pos += 1;
        }
    }

    Compiled {
        program,
        group_count: groups.len(),
    }
}

fn c_segment_lengths(segments: &[Vec<Inst>]) -> Vec<usize> {
    segments.iter().map(|s| s.len()).collect()
}

struct Compiler {
    segments: Vec<Vec<Inst>>,
    defined: Vec<bool>,
    /// (segment index, local instruction position holding a `Call`
    /// placeholder, target group number — 0 means whole-pattern `(?R)`).
    pending_calls: Vec<(usize, usize, usize)>,
    next_loop_id: usize,
}

impl Compiler {
    fn emit(&mut self, seg: usize, inst: Inst) -> usize {
        self.segments[seg].push(inst);
        self.segments[seg].len() - 1
    }

    fn len(&self, seg: usize) -> usize {
        self.segments[seg].len()
    }

    fn new_segment(&mut self) -> usize {
        self.segments.push(Vec::new());
        self.defined.push(true);
        self.segments.len() - 1
    }

    fn ensure_group_body(&mut self, n: usize, node: &Ast, opts: ParseOptions) {
        if self.defined[n] {
            return;
        }
        self.defined[n] = true;
        self.compile_node(n, node, opts);
        self.emit(n, Inst::Ret);
    }

    fn compile_node(&mut self, seg: usize, node: &Ast, opts: ParseOptions) {
        match node {
            Ast::Empty => {}
            Ast::Literal(ch) => {
                if opts.insensitive {
                    self.emit(seg, Inst::CharFold(fold_key(*ch)));
                } else {
                    self.emit(seg, Inst::Char(*ch));
                }
            }
            Ast::Any => {
                self.emit(seg, if opts.dot_all { Inst::AnyChar } else { Inst::Any });
            }
            Ast::Class { negated, items } => {
                self.emit(
                    seg,
                    Inst::Class {
                        negated: *negated,
                        items: items.clone(),
                    },
                );
            }
            Ast::Bol => {
                self.emit(seg, Inst::Bol);
            }
            Ast::Eol => {
                self.emit(seg, Inst::Eol);
            }
            Ast::Bos => {
                self.emit(seg, Inst::Bos);
            }
            Ast::Eos => {
                self.emit(seg, Inst::Eos);
            }
            Ast::WordBoundary { negated } => {
                self.emit(seg, if *negated { Inst::Nwb } else { Inst::Wb });
            }
            Ast::Digit(negated) => {
                self.emit(seg, Inst::Digit(*negated));
            }
            Ast::Word(negated) => {
                self.emit(seg, Inst::Word(*negated));
            }
            Ast::Space(negated) => {
                self.emit(seg, Inst::Space(*negated));
            }
            Ast::SetStart => {
                self.emit(seg, Inst::SetStart);
            }
            Ast::Concat(nodes) => {
                for n in nodes {
                    self.compile_node(seg, n, opts);
                }
            }
            Ast::Alternate(branches) => self.compile_alternate(seg, branches, opts),
            Ast::Group {
                index,
                atomic,
                node,
                ..
            } => self.compile_group(seg, *index, *atomic, node, opts),
            Ast::Repeat {
                node,
                min,
                max,
                greedy,
            } => self.compile_repeat(seg, node, *min, *max, *greedy, opts),
            Ast::Backref(n) => {
                self.emit(seg, Inst::Backref(*n));
            }
            Ast::NamedBackref(_name) => {
                // Resolved to a numeric Backref by the caller before this
                // node type would reach the compiler in practice; treat an
                // unresolved one defensively as group 1.
                self.emit(seg, Inst::Backref(1));
            }
            Ast::Lookaround { ahead, negate, node } => {
                let sub = self.new_segment();
                self.compile_node(sub, node, opts);
                self.emit(sub, Inst::Match);
                self.emit(
                    seg,
                    Inst::Lookaround {
                        ahead: *ahead,
                        negate: *negate,
                        sub_start: 0,
                    },
                );
                let pos = self.len(seg) - 1;
                // Lookaround sub-programs live in an anonymous segment
                // appended past the group segments; patched the same way
                // as a `Call` target once every segment's base offset is
                // known (see the patch loop in `compile`).
                self.pending_calls.push((seg, pos, sub));
            }
            Ast::Call(target) => {
                self.emit(seg, Inst::Call(0));
                let pos = self.len(seg) - 1;
                self.pending_calls.push((seg, pos, *target));
            }
        }
    }

    fn compile_alternate(&mut self, seg: usize, branches: &[Ast], opts: ParseOptions) {
        let mut end_jmps = Vec::new();
        for (i, branch) in branches.iter().enumerate() {
            if i + 1 == branches.len() {
                self.compile_node(seg, branch, opts);
            } else {
                let branch_pos = self.emit(seg, Inst::Branch(0, 0));
                let body_start = self.len(seg);
                self.compile_node(seg, branch, opts);
                let jmp_pos = self.emit(seg, Inst::Jmp(0));
                end_jmps.push(jmp_pos);
                let next = self.len(seg);
                self.segments[seg][branch_pos] = Inst::Branch(body_start, next);
            }
        }
        let end = self.len(seg);
        for pos in end_jmps {
            self.segments[seg][pos] = Inst::Jmp(end);
        }
    }

    fn compile_group(
        &mut self,
        seg: usize,
        index: Option<usize>,
        atomic: bool,
        node: &Ast,
        opts: ParseOptions,
    ) {
        let try_pos = if atomic { Some(self.emit(seg, Inst::Try)) } else { None };
        match index {
            Some(n) => {
                self.ensure_group_body(n, node, opts);
                self.emit(seg, Inst::Save(2 * n));
                self.emit(seg, Inst::Call(0));
                let pos = self.len(seg) - 1;
                self.pending_calls.push((seg, pos, n));
                self.emit(seg, Inst::Save(2 * n + 1));
            }
            None => {
                self.compile_node(seg, node, opts);
            }
        }
        if try_pos.is_some() {
            self.emit(seg, Inst::Catch);
        }
    }

    fn compile_repeat(
        &mut self,
        seg: usize,
        node: &Ast,
        min: u32,
        max: Option<u32>,
        greedy: bool,
        opts: ParseOptions,
    ) {
        for _ in 0..min {
            self.compile_node(seg, node, opts);
        }
        match max {
            None => {
                let loop_id = self.next_loop_id;
                self.next_loop_id += 1;
                let head = self.len(seg);
                self.emit(seg, Inst::Progress(loop_id));
                let branch_pos = self.emit(seg, Inst::Branch(0, 0));
                let body_start = self.len(seg);
                self.compile_node(seg, node, opts);
                self.emit(seg, Inst::Jmp(head));
                let end = self.len(seg);
                self.segments[seg][branch_pos] = if greedy {
                    Inst::Branch(body_start, end)
                } else {
                    Inst::Branch(end, body_start)
                };
            }
            Some(max) if max > min => {
                self.compile_optional_chain(seg, node, opts, max - min, greedy);
            }
            _ => {}
        }
    }

    fn compile_optional_chain(
        &mut self,
        seg: usize,
        node: &Ast,
        opts: ParseOptions,
        remaining: u32,
        greedy: bool,
    ) {
        if remaining == 0 {
            return;
        }
        let branch_pos = self.emit(seg, Inst::Branch(0, 0));
        let body_start = self.len(seg);
        self.compile_node(seg, node, opts);
        self.compile_optional_chain(seg, node, opts, remaining - 1, greedy);
        let end = self.len(seg);
        self.segments[seg][branch_pos] = if greedy {
            Inst::Branch(body_start, end)
        } else {
            Inst::Branch(end, body_start)
        };
    }
}

/// Case-insensitive literal matching folds both sides through this before
/// comparison; single-codepoint simple fold is sufficient for the Latin,
/// Greek and Cyrillic text this engine targets (spec §4.7, Open Question).
pub(crate) fn fold_key(ch: char) -> char {
    ch.to_lowercase().next().unwrap_or(ch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regex::parser::parse;

    fn compile_pattern(pattern: &str) -> Compiled {
        let r = parse(pattern, ParseOptions::default()).expect("parses");
        compile(&r.ast, &r.groups, ParseOptions::default())
    }

    #[test]
    fn simple_literal_compiles_to_chars_and_match() {
        let c = compile_pattern("ab");
        assert!(matches!(c.program[0], Inst::Char('a')));
        assert!(matches!(c.program[1], Inst::Char('b')));
        assert!(matches!(c.program.last(), Some(Inst::Match)));
    }

    #[test]
    fn capturing_group_compiles_to_save_call_save() {
        let c = compile_pattern("(a)");
        let has_call = c.program.iter().any(|i| matches!(i, Inst::Call(_)));
        let has_save0 = c.program.iter().any(|i| matches!(i, Inst::Save(0)));
        let has_save1 = c.program.iter().any(|i| matches!(i, Inst::Save(1)));
        assert!(has_call && has_save0 && has_save1);
    }

    #[test]
    fn star_repeat_has_a_progress_guard() {
        let c = compile_pattern("a*");
        assert!(c.program.iter().any(|i| matches!(i, Inst::Progress(_))));
    }

    #[test]
    fn backreference_compiles_to_backref_inst() {
        let c = compile_pattern(r"(cat|dog)\1");
        assert!(c.program.iter().any(|i| matches!(i, Inst::Backref(1))));
    }

    #[test]
    fn lookbehind_compiles_a_separate_segment() {
        let c = compile_pattern("(?<=foo)bar");
        assert!(c
            .program
            .iter()
            .any(|i| matches!(i, Inst::Lookaround { ahead: false, .. })));
    }
}
