//! # 🍟 Fryer-Core
//!
//! Assembler e interpretador da linguagem de controle da fritadeira.
//!
//! > *"Seis registradores, quatro sensores e uma pilha. O resto é óleo quente."*
//!
//! ## O Modelo
//!
//! 1. O fonte é carregado em **duas passagens** (labels/strings, depois instruções)
//! 2. Toda instrução inválida falha no **load**, com a linha do fonte
//! 3. Sensores (`TEMP`, `WEIGHT`, `MODE`, `STATE`) só mudam por instruções de controle
//! 4. Números são inteiros `i64`; fixed-point usa escala **100**
//! 5. Erros de execução abortam a corrida e deixam o estado **intacto**
//!
//! ## Módulos
//!
//! - [`vm`]: assembler, programa, motor de execução e debugger
//! - [`prelude`]: re-exportações para uso rápido
//!
//! ## Quick Start
//!
//! ```
//! use fryer_core::prelude::*;
//!
//! let mut vm = Vm::new(VmConfig::default());
//! vm.load("SET TIME 30\nSETMODE 2\nPRINT\nHALT").unwrap();
//!
//! let state = vm.run().unwrap();
//! assert_eq!(state.sensors.mode, 2);
//! assert_eq!(vm.rendered_output(), "30\n");
//! ```

pub mod prelude;
pub mod vm;

// Re-exportações de nível superior
pub use vm::{
    assemble, assemble_file,
    Assembler, Program, Instruction, Operation,
    Vm, VmConfig, Locale, StepOutcome, Snapshot,
    LoadError, LoadErrorKind, RuntimeError, RuntimeErrorKind, VmError, VmResult,
};

// Re-exporta debugger
pub use vm::{Debugger, DebugEvent};
