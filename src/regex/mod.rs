//! Public regex API (spec §4.6-§4.9). Ties the parser, compiler and VM
//! together behind a `Regex` value that is cheap to clone (an `Rc` around
//! the compiled program, matching spec §6's "clone is `Rc`-backed").

mod ast;
mod compiler;
mod error;
mod limits;
mod opcode;
mod parser;
mod replace;
mod vm;

pub use error::{CompileError, VmError};

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use ast::{Ast, ParseOptions};
use limits::VmLimits;
use opcode::Inst;
use vm::VmOptions;

/// A single match: the whole-match span plus every capture group's span,
/// both in code-point offsets. Unset groups (didn't participate in this
/// match) are `None`.
#[derive(Clone, Debug)]
pub struct Match {
    groups: Vec<Option<(usize, usize)>>,
    names: Rc<HashMap<String, usize>>,
}

impl Match {
    pub fn start(&self) -> usize {
        self.groups[0].map(|(s, _)| s).unwrap_or(0)
    }

    pub fn end(&self) -> usize {
        self.groups[0].map(|(_, e)| e).unwrap_or(0)
    }

    pub fn group(&self, n: usize) -> Option<(usize, usize)> {
        self.groups.get(n).copied().flatten()
    }

    pub fn name(&self, name: &str) -> Option<(usize, usize)> {
        self.names.get(name).and_then(|&i| self.group(i))
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

pub type MatchVector = Vec<Match>;

#[derive(Clone)]
pub struct Regex {
    program: Rc<Vec<Inst>>,
    group_count: usize,
    names: Rc<HashMap<String, usize>>,
    insensitive: bool,
    multiline: bool,
    global: bool,
    continue_opt: bool,
    unanchored: bool,
    limits: VmLimits,
    cursor: Rc<Cell<usize>>,
}

impl Regex {
    pub const INSENSITIVE: u32 = 1 << 0;
    pub const UNANCHORED: u32 = 1 << 1;
    pub const EXTENDED: u32 = 1 << 2;
    pub const GLOBAL: u32 = 1 << 3;
    pub const MULTILINE: u32 = 1 << 4;
    pub const CONTINUE: u32 = 1 << 5;

    pub fn compile(pattern: &str, opts: u32) -> Result<Regex, CompileError> {
        if opts & Self::GLOBAL != 0 && opts & Self::CONTINUE != 0 {
            return Err(CompileError::InvalidOptions);
        }
        let parse_opts = ParseOptions {
            insensitive: opts & Self::INSENSITIVE != 0,
            extended: opts & Self::EXTENDED != 0,
            multiline: opts & Self::MULTILINE != 0,
            dot_all: false,
        };
        let parsed = parser::parse(pattern, parse_opts)?;
        let mut names = HashMap::new();
        for (i, g) in parsed.groups.iter().enumerate() {
            if let Some(name) = &g.name {
                names.insert(name.clone(), i);
            }
        }
        let ast = resolve_named_backrefs(&parsed.ast, &names)?;
        let compiled = compiler::compile(&ast, &parsed.groups, parse_opts);
        tracing::trace!(pattern, instructions = compiled.program.len(), "compiled regex");
        Ok(Regex {
            program: Rc::new(compiled.program),
            group_count: compiled.group_count,
            names: Rc::new(names),
            insensitive: parse_opts.insensitive,
            multiline: parse_opts.multiline,
            global: opts & Self::GLOBAL != 0,
            continue_opt: opts & Self::CONTINUE != 0,
            unanchored: opts & (Self::UNANCHORED | Self::GLOBAL) != 0,
            limits: VmLimits::default(),
            cursor: Rc::new(Cell::new(0)),
        })
    }

    fn vm_opts(&self) -> VmOptions {
        VmOptions {
            insensitive: self.insensitive,
            multiline: self.multiline,
        }
    }

    fn build_match(&self, caps: &[Option<usize>]) -> Match {
        let groups = caps
            .chunks(2)
            .map(|pair| match (pair[0], pair[1]) {
                (Some(s), Some(e)) => Some((s, e)),
                _ => None,
            })
            .collect();
        Match {
            groups,
            names: Rc::clone(&self.names),
        }
    }

    fn find_at(&self, chars: &[char], start: usize) -> Result<Option<Match>, VmError> {
        let caps = if self.unanchored {
            vm::exec_unanchored(&self.program, chars, start, self.group_count, self.vm_opts(), &self.limits)?
        } else {
            vm::exec(&self.program, chars, start, self.group_count, self.vm_opts(), &self.limits)?
        };
        Ok(caps.map(|c| self.build_match(&c)))
    }

    /// Every match in `chars`, scanning unconditionally (replace/split
    /// always search the whole subject regardless of the `UNANCHORED`
    /// option bit the pattern itself was compiled with).
    fn find_all_chars(&self, chars: &[char]) -> Result<Vec<Match>, VmError> {
        let mut results = Vec::new();
        let mut start = 0usize;
        while start <= chars.len() {
            let caps = vm::exec_unanchored(&self.program, chars, start, self.group_count, self.vm_opts(), &self.limits)?;
            match caps.map(|c| self.build_match(&c)) {
                None => break,
                Some(m) => {
                    let (s, e) = (m.start(), m.end());
                    results.push(m);
                    start = if e > s { e } else { e + 1 };
                }
            }
        }
        Ok(results)
    }

    /// Runs the pattern against `subject`. Returns every match when
    /// `GLOBAL` is set, otherwise at most one; `None` when nothing matched.
    pub fn exec(&self, subject: &str) -> Result<Option<MatchVector>, VmError> {
        let chars: Vec<char> = subject.chars().collect();
        if self.global {
            let all = self.find_all_chars(&chars)?;
            return Ok(if all.is_empty() { None } else { Some(all) });
        }
        if self.continue_opt {
            let start = self.cursor.get().min(chars.len());
            return match self.find_at(&chars, start)? {
                None => {
                    self.cursor.set(0);
                    Ok(None)
                }
                Some(m) => {
                    let (s, e) = (m.start(), m.end());
                    self.cursor.set(if e > s { e } else { e + 1 });
                    Ok(Some(vec![m]))
                }
            };
        }
        Ok(self.find_at(&chars, 0)?.map(|m| vec![m]))
    }

    /// Resets `CONTINUE` state back to the start of the subject.
    pub fn reset(&self) {
        self.cursor.set(0);
    }

    pub fn find(&self, subject: &str) -> Result<Option<Match>, VmError> {
        let chars: Vec<char> = subject.chars().collect();
        self.find_at(&chars, 0)
    }

    pub fn replace(&self, subject: &str, template: &str, indicator: char) -> Result<String, VmError> {
        replace::replace(self, subject, template, indicator)
    }

    pub fn filter(&self, subject: &str, template: &str) -> Result<String, VmError> {
        replace::replace(self, subject, template, '$')
    }

    pub fn split(&self, subject: &str) -> Result<Vec<String>, VmError> {
        replace::split(self, subject)
    }
}

fn resolve_named_backrefs(ast: &Ast, names: &HashMap<String, usize>) -> Result<Ast, CompileError> {
    Ok(match ast {
        Ast::NamedBackref(name) => {
            let n = names
                .get(name)
                .copied()
                .ok_or_else(|| CompileError::UnknownGroupName {
                    loc: 0,
                    name: name.clone(),
                })?;
            Ast::Backref(n)
        }
        Ast::Concat(nodes) => Ast::Concat(
            nodes
                .iter()
                .map(|n| resolve_named_backrefs(n, names))
                .collect::<Result<_, _>>()?,
        ),
        Ast::Alternate(nodes) => Ast::Alternate(
            nodes
                .iter()
                .map(|n| resolve_named_backrefs(n, names))
                .collect::<Result<_, _>>()?,
        ),
        Ast::Group {
            index,
            name,
            atomic,
            node,
        } => Ast::Group {
            index: *index,
            name: name.clone(),
            atomic: *atomic,
            node: Box::new(resolve_named_backrefs(node, names)?),
        },
        Ast::Repeat {
            node,
            min,
            max,
            greedy,
        } => Ast::Repeat {
            node: Box::new(resolve_named_backrefs(node, names)?),
            min: *min,
            max: *max,
            greedy: *greedy,
        },
        Ast::Lookaround { ahead, negate, node } => Ast::Lookaround {
            ahead: *ahead,
            negate: *negate,
            node: Box::new(resolve_named_backrefs(node, names)?),
        },
        other => other.clone(),
    })
}
