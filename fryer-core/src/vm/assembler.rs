//! Assembler (loader de duas passagens)
//!
//! Converte o texto fonte em um [`Program`].
//!
//! # Sintaxe
//!
//! ```text
//! ; Comentário
//!     SDEF 0 "Batata pronta!"   ; String na tabela
//!     SETMODE 1
//!     SET TIME 3
//! loop:                          ; Label
//!     DECJZ TIME, fim
//!     GOTO loop
//! fim:
//!     SPRINT 0
//!     HALT
//! ```
//!
//! - 1ª passagem: coleta labels (índice da próxima instrução real) e SDEFs.
//! - 2ª passagem: valida cada instrução contra a tabela de assinaturas.
//!
//! O primeiro erro aborta a carga; nenhum programa parcial é produzido.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::error::{LoadError, LoadErrorKind, VmResult};
use super::instruction::{Instruction, Operation};
use super::opcode::Opcode;
use super::program::Program;
use super::state::Register;

// ═══════════════════════════════════════════════════════════════════════════════
// TOKENIZER
// ═══════════════════════════════════════════════════════════════════════════════

/// Quebras de linha reconhecidas (as mesmas do firmware, incluindo `\r` e form-feed)
#[inline]
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Divide o fonte em linhas. `\r\n` conta como uma única quebra.
pub fn split_lines(source: &str) -> impl Iterator<Item = &str> {
    let mut rest = source;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.char_indices().find(|&(_, c)| is_line_break(c)) {
            Some((i, c)) => {
                let line = &rest[..i];
                let mut next = i + c.len_utf8();
                if c == '\r' && rest[next..].starts_with('\n') {
                    next += 1;
                }
                rest = &rest[next..];
                Some(line)
            }
            None => Some(std::mem::take(&mut rest)),
        }
    })
}

/// Remove o comentário (`;` até o fim da linha) e espaços nas bordas
pub fn strip_comment(raw: &str) -> &str {
    raw.split_once(';').map_or(raw, |(code, _)| code).trim()
}

/// Divide uma linha de instrução em tokens (espaços e vírgulas separam)
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Classificação de uma linha já sem comentário
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    Blank,
    Label(&'a str),
    StringDef { id: i64, text: &'a str },
    Instruction(&'a str),
}

/// Classifica uma linha do fonte
pub fn classify_line(line_no: usize, raw: &str) -> Result<Line<'_>, LoadError> {
    let line = strip_comment(raw);
    // Só vírgulas também não gera instrução
    if tokenize(line).is_empty() {
        return Ok(Line::Blank);
    }

    if let Some(name) = line.strip_suffix(':') {
        let name = name.trim();
        // ":" sozinho não define nada
        return Ok(if name.is_empty() { Line::Blank } else { Line::Label(name) });
    }

    let keyword = line.split_whitespace().next().unwrap_or_default();
    if keyword.eq_ignore_ascii_case("SDEF") {
        return parse_string_def(line_no, line[keyword.len()..].trim_start());
    }

    Ok(Line::Instruction(line))
}

fn parse_string_def(line_no: usize, rest: &str) -> Result<Line<'_>, LoadError> {
    let malformed = |detail: &str| {
        LoadError::new(line_no, LoadErrorKind::MalformedStringLiteral(detail.to_string()))
    };

    let (id, text) = rest
        .split_once(char::is_whitespace)
        .ok_or_else(|| malformed("SDEF requires an id and a quoted text"))?;

    let id = parse_integer(line_no, id)?;

    let text = text.trim_start();
    let inner = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .ok_or_else(|| malformed("text must be enclosed in double quotes"))?;

    Ok(Line::StringDef { id, text: inner })
}

fn parse_integer(line_no: usize, token: &str) -> Result<i64, LoadError> {
    token
        .parse::<i64>()
        .map_err(|_| LoadError::new(line_no, LoadErrorKind::InvalidIntegerLiteral(token.to_string())))
}

fn parse_register(line_no: usize, token: &str) -> Result<Register, LoadError> {
    Register::parse(token)
        .ok_or_else(|| LoadError::new(line_no, LoadErrorKind::InvalidRegister(token.to_string())))
}

/// Valida uma linha de instrução e constrói a [`Instruction`]
pub fn parse_instruction(line_no: usize, line: &str) -> Result<Instruction, LoadError> {
    let tokens = tokenize(line);
    let Some((&mnemonic, args)) = tokens.split_first() else {
        return Err(LoadError::new(line_no, LoadErrorKind::UnknownOpcode(String::new())));
    };

    let opcode = Opcode::from_mnemonic(mnemonic).ok_or_else(|| {
        LoadError::new(line_no, LoadErrorKind::UnknownOpcode(mnemonic.to_ascii_uppercase()))
    })?;

    if args.len() != opcode.arity() {
        return Err(LoadError::new(
            line_no,
            LoadErrorKind::WrongArity {
                opcode: opcode.mnemonic(),
                expected: opcode.arity(),
                found: args.len(),
            },
        ));
    }

    let reg = |i: usize| parse_register(line_no, args[i]);
    let int = |i: usize| parse_integer(line_no, args[i]);

    let operation = match opcode {
        Opcode::Nullary(op) => Operation::Nullary(op),
        Opcode::Unary(op) => Operation::Unary(op, reg(0)?),
        Opcode::Set => Operation::Set(reg(0)?, int(1)?),
        Opcode::Binary(op) => Operation::Binary(op, reg(0)?, reg(1)?),
        Opcode::Branch(op) => Operation::Branch(op, reg(0)?, args[1].to_string()),
        Opcode::Goto => Operation::Goto(args[0].to_string()),
        Opcode::SetMode => Operation::SetMode(int(0)?),
        Opcode::Sprint => Operation::Sprint(int(0)?),
    };

    Ok(Instruction::new(operation, line_no))
}

// ═══════════════════════════════════════════════════════════════════════════════
// ASSEMBLER
// ═══════════════════════════════════════════════════════════════════════════════

/// Loader de duas passagens
#[derive(Debug, Default)]
pub struct Assembler {
    labels: HashMap<String, usize>,
    strings: BTreeMap<i64, String>,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembla o fonte completo
    pub fn assemble(mut self, source: &str) -> Result<Program, LoadError> {
        let pending = self.first_pass(source)?;
        let instructions = Self::second_pass(&pending)?;

        debug!(
            instructions = instructions.len(),
            labels = self.labels.len(),
            strings = self.strings.len(),
            "program assembled"
        );

        Ok(Program {
            instructions,
            labels: self.labels,
            strings: self.strings,
        })
    }

    /// Labels e strings; devolve as linhas de instrução para a 2ª passagem
    fn first_pass<'a>(&mut self, source: &'a str) -> Result<Vec<(usize, &'a str)>, LoadError> {
        let mut pending = Vec::new();

        for (index, raw) in split_lines(source).enumerate() {
            let line_no = index + 1;
            match classify_line(line_no, raw)? {
                Line::Blank => {}
                Line::Label(name) => {
                    if self.labels.contains_key(name) {
                        return Err(LoadError::new(
                            line_no,
                            LoadErrorKind::DuplicateLabel(name.to_string()),
                        ));
                    }
                    self.labels.insert(name.to_string(), pending.len());
                }
                Line::StringDef { id, text } => {
                    // Redefinição sobrescreve o texto anterior
                    self.strings.insert(id, text.to_string());
                }
                Line::Instruction(text) => pending.push((line_no, text)),
            }
        }

        Ok(pending)
    }

    fn second_pass(pending: &[(usize, &str)]) -> Result<Vec<Instruction>, LoadError> {
        pending
            .iter()
            .map(|&(line_no, text)| parse_instruction(line_no, text))
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// FUNÇÕES DE CONVENIÊNCIA
// ═══════════════════════════════════════════════════════════════════════════════

/// Assembla código fonte
pub fn assemble(source: &str) -> Result<Program, LoadError> {
    Assembler::new().assemble(source)
}

/// Assembla um arquivo fonte
pub fn assemble_file(path: impl AsRef<std::path::Path>) -> VmResult<Program> {
    let source = std::fs::read_to_string(path)?;
    Ok(assemble(&source)?)
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTES
// ═══════════════════════════════════════════════════════════════════════════════
