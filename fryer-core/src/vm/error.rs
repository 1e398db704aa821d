//! Erros da VM
//!
//! Duas classes: erros de carga (detectados pelo assembler, antes de qualquer
//! execução) e erros de execução (fatais, detectados durante `step`). Ambos
//! carregam a linha de origem no código fonte.

use thiserror::Error;

/// Tipo de resultado genérico da VM
pub type VmResult<T> = Result<T, VmError>;

/// Motivo de um erro de carga
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadErrorKind {
    /// Label definido mais de uma vez
    #[error("duplicate label: {0}")]
    DuplicateLabel(String),

    /// SDEF mal formado (sem id, sem texto ou sem aspas)
    #[error("malformed string literal: {0}")]
    MalformedStringLiteral(String),

    /// Mnemônico fora do conjunto de instruções
    #[error("unknown opcode: {0}")]
    UnknownOpcode(String),

    /// Número de operandos diferente da assinatura
    #[error("{opcode} expects {expected} operand(s), found {found}")]
    WrongArity {
        opcode: &'static str,
        expected: usize,
        found: usize,
    },

    /// Operando não é um registrador gravável
    #[error("invalid register: {0}")]
    InvalidRegister(String),

    /// Operando não é um inteiro decimal válido
    #[error("invalid integer literal: {0}")]
    InvalidIntegerLiteral(String),
}

/// Erro de carga com a linha de origem
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct LoadError {
    pub line: usize,
    pub kind: LoadErrorKind,
}

impl LoadError {
    pub fn new(line: usize, kind: LoadErrorKind) -> Self {
        Self { line, kind }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn kind(&self) -> &LoadErrorKind {
        &self.kind
    }
}

/// Motivo de um erro de execução
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeErrorKind {
    /// Salto para label inexistente
    #[error("undefined label: {0}")]
    UndefinedLabel(String),

    /// POP com pilha vazia
    #[error("stack underflow")]
    StackUnderflow,

    /// DIV, MOD ou DIVF com divisor zero
    #[error("division by zero")]
    DivisionByZero,

    /// SPRINT de id sem SDEF
    #[error("undefined string id: {0}")]
    UndefinedString(i64),

    /// Limite de passos excedido (provável loop infinito)
    #[error("step limit exceeded ({0}), possible infinite loop")]
    StepLimitExceeded(u64),
}

/// Erro de execução com a linha da instrução que falhou
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct RuntimeError {
    pub line: usize,
    pub kind: RuntimeErrorKind,
}

impl RuntimeError {
    pub fn new(line: usize, kind: RuntimeErrorKind) -> Self {
        Self { line, kind }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn kind(&self) -> &RuntimeErrorKind {
        &self.kind
    }
}

/// Erros da VM
#[derive(Debug, Error)]
pub enum VmError {
    /// Erro de carga
    #[error("load error at {0}")]
    Load(#[from] LoadError),

    /// Erro de execução
    #[error("runtime error at {0}")]
    Runtime(#[from] RuntimeError),

    /// Erro de I/O
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LoadError::new(7, LoadErrorKind::DuplicateLabel("loop".into()));
        assert_eq!(err.to_string(), "line 7: duplicate label: loop");

        let err = RuntimeError::new(3, RuntimeErrorKind::DivisionByZero);
        assert_eq!(err.to_string(), "line 3: division by zero");
    }

    #[test]
    fn test_arity_message() {
        let kind = LoadErrorKind::WrongArity { opcode: "SET", expected: 2, found: 1 };
        assert!(kind.to_string().contains("SET expects 2"));
    }

    #[test]
    fn test_vm_error_wraps_line() {
        let err: VmError = RuntimeError::new(12, RuntimeErrorKind::StackUnderflow).into();
        assert!(err.to_string().contains("line 12"));
        assert!(matches!(err, VmError::Runtime(_)));
    }
}
