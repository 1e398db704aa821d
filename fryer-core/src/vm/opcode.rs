//! Opcodes da VM
//!
//! Conjunto fechado de instruções, agrupado pela assinatura de operandos.
//! Cada grupo carrega a sub-operação concreta, de modo que o dispatch do
//! interpretador é um `match` total, sem caso "opcode desconhecido".

use std::fmt;

/// Categorias de opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpcodeCategory {
    /// Controle de fluxo
    Control,
    /// Pilha
    Stack,
    /// Aritmética inteira
    Arithmetic,
    /// Aritmética fixed-point (escala 100)
    FixedPoint,
    /// Comparações
    Comparison,
    /// Lógica booleana
    Logic,
    /// Impressão
    Output,
    /// Controle do aparelho
    Device,
}

/// Tipo de um operando na assinatura
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    Register,
    Integer,
    Label,
}

/// Instruções sem operandos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullaryOp {
    Halt,
    Print,
    Pause,
    Resume,
    Stop,
}

/// Instruções com um registrador
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Inc,
    Dec,
    Push,
    Pop,
    Not,
    Itof,
    Ftoi,
    PrintI,
    PrintF,
    PrintB,
}

/// Instruções com dois registradores (resultado no primeiro)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    AddF,
    SubF,
    MulF,
    DivF,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

/// Saltos condicionais (registrador + label)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchOp {
    /// Salta se zero, senão decrementa
    DecJz,
    Jz,
    Jnz,
}

/// Opcode da VM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Nullary(NullaryOp),
    Unary(UnaryOp),
    /// SET R n
    Set,
    Binary(BinaryOp),
    Branch(BranchOp),
    /// GOTO label
    Goto,
    /// SETMODE n
    SetMode,
    /// SPRINT id
    Sprint,
}

impl NullaryOp {
    pub const ALL: [NullaryOp; 5] = [Self::Halt, Self::Print, Self::Pause, Self::Resume, Self::Stop];

    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Halt => "HALT",
            Self::Print => "PRINT",
            Self::Pause => "PAUSE",
            Self::Resume => "RESUME",
            Self::Stop => "STOP",
        }
    }
}

impl UnaryOp {
    pub const ALL: [UnaryOp; 10] = [
        Self::Inc,
        Self::Dec,
        Self::Push,
        Self::Pop,
        Self::Not,
        Self::Itof,
        Self::Ftoi,
        Self::PrintI,
        Self::PrintF,
        Self::PrintB,
    ];

    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Inc => "INC",
            Self::Dec => "DEC",
            Self::Push => "PUSH",
            Self::Pop => "POP",
            Self::Not => "NOT",
            Self::Itof => "ITOF",
            Self::Ftoi => "FTOI",
            Self::PrintI => "PRINTI",
            Self::PrintF => "PRINTF",
            Self::PrintB => "PRINTB",
        }
    }
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 17] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Mod,
        Self::AddF,
        Self::SubF,
        Self::MulF,
        Self::DivF,
        Self::Eq,
        Self::Ne,
        Self::Lt,
        Self::Le,
        Self::Gt,
        Self::Ge,
        Self::And,
        Self::Or,
    ];

    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Mul => "MUL",
            Self::Div => "DIV",
            Self::Mod => "MOD",
            Self::AddF => "ADDF",
            Self::SubF => "SUBF",
            Self::MulF => "MULF",
            Self::DivF => "DIVF",
            Self::Eq => "EQ",
            Self::Ne => "NE",
            Self::Lt => "LT",
            Self::Le => "LE",
            Self::Gt => "GT",
            Self::Ge => "GE",
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl BranchOp {
    pub const ALL: [BranchOp; 3] = [Self::DecJz, Self::Jz, Self::Jnz];

    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::DecJz => "DECJZ",
            Self::Jz => "JZ",
            Self::Jnz => "JNZ",
        }
    }
}

impl Opcode {
    /// Todos os opcodes, na ordem da tabela de assinaturas
    pub fn all() -> impl Iterator<Item = Opcode> {
        NullaryOp::ALL
            .into_iter()
            .map(Opcode::Nullary)
            .chain(UnaryOp::ALL.into_iter().map(Opcode::Unary))
            .chain(std::iter::once(Opcode::Set))
            .chain(BinaryOp::ALL.into_iter().map(Opcode::Binary))
            .chain(BranchOp::ALL.into_iter().map(Opcode::Branch))
            .chain([Opcode::Goto, Opcode::SetMode, Opcode::Sprint])
    }

    /// Busca por mnemônico, sem diferenciar maiúsculas
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        let upper = mnemonic.to_ascii_uppercase();
        Self::all().find(|op| op.mnemonic() == upper)
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Nullary(op) => op.mnemonic(),
            Self::Unary(op) => op.mnemonic(),
            Self::Set => "SET",
            Self::Binary(op) => op.mnemonic(),
            Self::Branch(op) => op.mnemonic(),
            Self::Goto => "GOTO",
            Self::SetMode => "SETMODE",
            Self::Sprint => "SPRINT",
        }
    }

    /// Tipos dos operandos, em ordem
    pub fn signature(self) -> &'static [OperandKind] {
        use OperandKind::*;
        match self {
            Self::Nullary(_) => &[],
            Self::Unary(_) => &[Register],
            Self::Set => &[Register, Integer],
            Self::Binary(_) => &[Register, Register],
            Self::Branch(_) => &[Register, Label],
            Self::Goto => &[Label],
            Self::SetMode | Self::Sprint => &[Integer],
        }
    }

    #[inline]
    pub fn arity(self) -> usize {
        self.signature().len()
    }

    pub fn category(self) -> OpcodeCategory {
        match self {
            Self::Nullary(NullaryOp::Halt) | Self::Branch(_) | Self::Goto => OpcodeCategory::Control,
            Self::Nullary(NullaryOp::Print) | Self::Sprint => OpcodeCategory::Output,
            Self::Nullary(_) | Self::SetMode => OpcodeCategory::Device,
            Self::Unary(UnaryOp::Push | UnaryOp::Pop) => OpcodeCategory::Stack,
            Self::Unary(UnaryOp::Inc | UnaryOp::Dec) | Self::Set => OpcodeCategory::Arithmetic,
            Self::Unary(UnaryOp::Not) => OpcodeCategory::Logic,
            Self::Unary(UnaryOp::Itof | UnaryOp::Ftoi) => OpcodeCategory::FixedPoint,
            Self::Unary(UnaryOp::PrintI | UnaryOp::PrintF | UnaryOp::PrintB) => OpcodeCategory::Output,
            Self::Binary(op) => match op {
                BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
                    OpcodeCategory::Arithmetic
                }
                BinaryOp::AddF | BinaryOp::SubF | BinaryOp::MulF | BinaryOp::DivF => {
                    OpcodeCategory::FixedPoint
                }
                BinaryOp::And | BinaryOp::Or => OpcodeCategory::Logic,
                _ => OpcodeCategory::Comparison,
            },
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
