//! # 🍟 VM da Fritadeira
//!
//! Assembler de duas passagens e motor de execução para a linguagem de
//! controle da fritadeira simulada.
//!
//! ## Arquitetura
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          FRYER VM                               │
//! │  ┌───────────┐    ┌───────────┐    ┌─────────────────────────┐  │
//! │  │  fonte    │───▶│ Assembler │───▶│ Program                 │  │
//! │  │  (.fry)   │    │ (2 passos)│    │ instr + labels + strings│  │
//! │  └───────────┘    └───────────┘    └────────────┬────────────┘  │
//! │                                                 │               │
//! │                                                 ▼               │
//! │  ┌──────────┐ ┌──────────┐ ┌────────┐ ┌──────────────────────┐  │
//! │  │ TIME     │ │ TEMP     │ │ Stack  │ │ Engine               │  │
//! │  │ POWER    │ │ WEIGHT   │ │ (LIFO) │ │ (fetch + dispatch)   │  │
//! │  │ R0..R3   │ │ MODE     │ │        │ │                      │  │
//! │  │ (regs)   │ │ STATE    │ │        │ │                      │  │
//! │  └──────────┘ └──────────┘ └────────┘ └──────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Módulos
//!
//! - [`opcode`] - ISA fechada com 39 opcodes
//! - [`instruction`] - Instruções com operandos tipados
//! - [`program`] - Programa carregado e listagem
//! - [`assembler`] - Fonte → [`Program`]
//! - [`state`] - Registradores, sensores e snapshot
//! - [`arith`] - Divisão com floor e fixed-point
//! - [`output`] - Itens impressos
//! - [`debugger`] - Breakpoints por linha
//!
//! ## Uso
//!
//! ```
//! use fryer_core::vm::{Vm, VmConfig};
//!
//! let mut vm = Vm::new(VmConfig::default());
//! vm.load("SET R0 3\nloop:\nDECJZ R0 end\nGOTO loop\nend:\nPRINTI R0\nHALT").unwrap();
//!
//! let state = vm.run().unwrap();
//! assert!(state.halted);
//! assert_eq!(vm.rendered_output(), "0 ");
//! ```

pub mod arith;
pub mod assembler;
pub mod config;
pub mod debugger;
mod engine;
pub mod error;
pub mod instruction;
pub mod opcode;
pub mod output;
pub mod program;
pub mod state;

// Re-exports
pub use assembler::{assemble, assemble_file, Assembler};
pub use config::{Locale, VmConfig};
pub use debugger::{DebugEvent, Debugger};
pub use error::{LoadError, LoadErrorKind, RuntimeError, RuntimeErrorKind, VmError, VmResult};
pub use instruction::{Instruction, Operation};
pub use opcode::{Opcode, OpcodeCategory, OperandKind};
pub use output::{Printed, Terminator};
pub use program::{DanglingReferences, Program};
pub use state::{DeviceState, Register, RegisterFile, Sensor, SensorFile, Snapshot};

use tracing::{debug, info, warn};

use engine::Machine;

/// Resultado de um `step` bem-sucedido
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Uma instrução foi aplicada
    Executed,
    /// Máquina parada (HALT ou PC fora do programa); nada foi executado
    Halted,
}

/// Máquina virtual
///
/// Um erro de execução não marca a máquina como parada: o estado fica
/// exatamente como estava antes da instrução que falhou (apenas o contador
/// de passos já foi incrementado) e pode ser inspecionado via [`Vm::snapshot`].
#[derive(Debug, Clone, Default)]
pub struct Vm {
    config: VmConfig,
    program: Program,
    machine: Machine,
}

impl Vm {
    /// Cria uma VM vazia
    pub fn new(config: VmConfig) -> Self {
        Self {
            config,
            program: Program::default(),
            machine: Machine::default(),
        }
    }

    /// Zera o estado e carrega um novo programa a partir do fonte.
    /// Em caso de erro a VM fica zerada e sem programa.
    pub fn load(&mut self, source: &str) -> Result<&Program, LoadError> {
        self.reset();
        self.program = Program::default();
        let program = assemble(source)?;
        Ok(self.install(program))
    }

    /// Instala um programa já assemblado
    pub fn load_program(&mut self, program: Program) -> &Program {
        self.reset();
        self.install(program)
    }

    fn install(&mut self, program: Program) -> &Program {
        self.program = program;
        &self.program
    }

    /// Volta ao estado inicial sem trocar o programa
    pub fn reset(&mut self) {
        self.machine = Machine::default();
    }

    /// Executa uma única instrução
    pub fn step(&mut self) -> Result<StepOutcome, RuntimeError> {
        let machine = &mut self.machine;
        if machine.halted {
            return Ok(StepOutcome::Halted);
        }

        let Some(instr) = self.program.instruction(machine.pc) else {
            machine.halted = true;
            info!(pc = machine.pc, steps = machine.steps, "program ran off the end");
            return Ok(StepOutcome::Halted);
        };

        machine.steps += 1;
        if machine.steps > self.config.max_steps {
            let err = RuntimeError::new(
                instr.line,
                RuntimeErrorKind::StepLimitExceeded(self.config.max_steps),
            );
            warn!(%err, "execution aborted");
            return Err(err);
        }

        debug!(pc = machine.pc, line = instr.line, op = instr.mnemonic(), "step");

        match machine.execute(instr, &self.program, &self.config) {
            Ok(flow) => {
                machine.apply(flow);
                if machine.halted {
                    info!(pc = machine.pc, steps = machine.steps, "halted");
                }
                Ok(StepOutcome::Executed)
            }
            Err(kind) => {
                let err = RuntimeError::new(instr.line, kind);
                warn!(%err, pc = machine.pc, "execution aborted");
                Err(err)
            }
        }
    }

    /// Executa até parar ou até o primeiro erro
    pub fn run(&mut self) -> Result<Snapshot, RuntimeError> {
        while self.step()? == StepOutcome::Executed {}
        Ok(self.snapshot())
    }

    pub fn snapshot(&self) -> Snapshot {
        self.machine.snapshot()
    }

    pub fn pc(&self) -> usize {
        self.machine.pc
    }

    pub fn steps(&self) -> u64 {
        self.machine.steps
    }

    pub fn is_halted(&self) -> bool {
        self.machine.halted
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.machine.registers
    }

    pub fn sensors(&self) -> &SensorFile {
        &self.machine.sensors
    }

    /// Pilha, da base para o topo
    pub fn stack(&self) -> &[i64] {
        &self.machine.stack
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    /// Instrução que o próximo `step` executaria
    pub fn current_instruction(&self) -> Option<&Instruction> {
        if self.machine.halted {
            return None;
        }
        self.program.instruction(self.machine.pc)
    }

    /// Tudo o que foi impresso desde o último `load`/`take_output`
    pub fn output(&self) -> &[Printed] {
        &self.machine.output
    }

    pub fn take_output(&mut self) -> Vec<Printed> {
        std::mem::take(&mut self.machine.output)
    }

    /// Saída concatenada como apareceria no terminal
    pub fn rendered_output(&self) -> String {
        output::render(&self.machine.output)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTES
// ═══════════════════════════════════════════════════════════════════════════════
