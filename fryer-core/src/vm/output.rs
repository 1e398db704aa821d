//! Saída produzida pelas instruções PRINT*

use std::fmt;

/// Como o item termina quando renderizado
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// `PRINT` (caminho legado) termina a linha
    Newline,
    /// Demais impressões são separadas por espaço
    Space,
}

impl Terminator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Newline => "\n",
            Self::Space => " ",
        }
    }
}

/// Um item impresso
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Printed {
    pub text: String,
    pub terminator: Terminator,
}

impl Printed {
    pub fn word(text: impl Into<String>) -> Self {
        Self { text: text.into(), terminator: Terminator::Space }
    }

    pub fn line(text: impl Into<String>) -> Self {
        Self { text: text.into(), terminator: Terminator::Newline }
    }
}

impl fmt::Display for Printed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.text, self.terminator.as_str())
    }
}

/// Formata um valor fixed-point (escala 100) com duas casas, sem float
pub fn format_fixed(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let abs = value.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Concatena os itens como apareceriam no terminal
pub fn render(items: &[Printed]) -> String {
    items.iter().map(ToString::to_string).collect()
}
