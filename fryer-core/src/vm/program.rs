//! Programa carregado
//!
//! Resultado imutável do assembler: instruções, tabela de labels e tabela de
//! strings.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Write;

use super::instruction::{Instruction, Operation};

/// Programa pronto para execução
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub(crate) instructions: Vec<Instruction>,
    pub(crate) labels: HashMap<String, usize>,
    pub(crate) strings: BTreeMap<i64, String>,
}

/// Referências que só falhariam em tempo de execução
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DanglingReferences {
    /// (linha, label) usados em saltos sem definição
    pub labels: Vec<(usize, String)>,
    /// (linha, id) usados em SPRINT sem SDEF
    pub strings: Vec<(usize, i64)>,
}

impl DanglingReferences {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.strings.is_empty()
    }
}

impl Program {
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn instruction(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    /// Índice da instrução apontada pelo label
    pub fn label(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }

    pub fn labels(&self) -> &HashMap<String, usize> {
        &self.labels
    }

    pub fn string(&self, id: i64) -> Option<&str> {
        self.strings.get(&id).map(String::as_str)
    }

    pub fn strings(&self) -> &BTreeMap<i64, String> {
        &self.strings
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Saltos para labels inexistentes e SPRINT de ids indefinidos.
    /// Continuam sendo erros de execução; isto é só um aviso antecipado.
    pub fn dangling_references(&self) -> DanglingReferences {
        let mut dangling = DanglingReferences::default();
        for instr in &self.instructions {
            match &instr.operation {
                Operation::Sprint(id) if !self.strings.contains_key(id) => {
                    dangling.strings.push((instr.line, *id));
                }
                op => {
                    if let Some(label) = op.label() {
                        if !self.labels.contains_key(label) {
                            dangling.labels.push((instr.line, label.to_string()));
                        }
                    }
                }
            }
        }
        dangling
    }

    /// Listagem desassemblada: tabela de strings, labels e instruções numeradas
    pub fn listing(&self) -> String {
        let mut out = String::new();

        for (id, text) in &self.strings {
            let _ = writeln!(out, "      SDEF {} \"{}\"", id, text);
        }
        if !self.strings.is_empty() {
            out.push('\n');
        }

        // Mais de um label pode apontar para o mesmo índice
        let mut by_index: BTreeMap<usize, BTreeSet<&str>> = BTreeMap::new();
        for (name, &index) in &self.labels {
            by_index.entry(index).or_default().insert(name);
        }

        for (index, instr) in self.instructions.iter().enumerate() {
            if let Some(names) = by_index.get(&index) {
                for name in names {
                    let _ = writeln!(out, "{}:", name);
                }
            }
            let _ = writeln!(out, "{:04}  {:<24} ; line {}", index, instr.to_string(), instr.line);
        }

        // Label no fim do programa (aponta para len())
        if let Some(names) = by_index.get(&self.instructions.len()) {
            for name in names {
                let _ = writeln!(out, "{}:", name);
            }
        }

        out
    }
}
