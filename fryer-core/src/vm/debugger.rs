//! Debugger por passos
//!
//! Envolve um [`Vm`] e adiciona:
//! - Breakpoints por linha do fonte
//! - Execução passo a passo
//! - Histórico das últimas instruções executadas

use std::collections::{BTreeSet, VecDeque};

use super::error::{LoadError, RuntimeError};
use super::program::Program;
use super::{StepOutcome, Vm, VmConfig};

/// Máximo de entradas guardadas no histórico
const MAX_HISTORY: usize = 256;

// ═══════════════════════════════════════════════════════════════════════════════
// EVENTOS
// ═══════════════════════════════════════════════════════════════════════════════

/// Resultado de um comando do debugger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugEvent {
    /// Uma instrução foi executada (pc e linha dela)
    Stepped { pc: usize, line: usize },
    /// Parou antes de executar a instrução desta linha
    BreakpointHit { line: usize },
    /// Programa terminou
    Halted,
}

/// Estado do debugger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebuggerState {
    /// Nada executado ainda
    Ready,
    /// Parado entre passos
    Paused,
    /// Programa terminou
    Stopped,
    /// Abortado por erro de execução
    Faulted,
}

// ═══════════════════════════════════════════════════════════════════════════════
// DEBUGGER
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct Debugger {
    vm: Vm,
    breakpoints: BTreeSet<usize>,
    state: DebuggerState,
    /// (pc, linha) das instruções executadas, mais antiga primeiro
    history: VecDeque<(usize, usize)>,
}

impl Debugger {
    pub fn new(vm: Vm) -> Self {
        Self {
            vm,
            breakpoints: BTreeSet::new(),
            state: DebuggerState::Ready,
            history: VecDeque::new(),
        }
    }

    pub fn with_config(config: VmConfig) -> Self {
        Self::new(Vm::new(config))
    }

    /// Carrega um novo programa. Breakpoints são mantidos.
    pub fn load(&mut self, source: &str) -> Result<&Program, LoadError> {
        self.state = DebuggerState::Ready;
        self.history.clear();
        self.vm.load(source)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // BREAKPOINTS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Adiciona breakpoint na linha; `false` se já existia
    pub fn add_breakpoint(&mut self, line: usize) -> bool {
        self.breakpoints.insert(line)
    }

    pub fn remove_breakpoint(&mut self, line: usize) -> bool {
        self.breakpoints.remove(&line)
    }

    pub fn clear_breakpoints(&mut self) {
        self.breakpoints.clear();
    }

    /// Linhas com breakpoint, em ordem
    pub fn breakpoints(&self) -> impl Iterator<Item = usize> + '_ {
        self.breakpoints.iter().copied()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // EXECUTION CONTROL
    // ═══════════════════════════════════════════════════════════════════════════

    /// Executa uma instrução
    pub fn step(&mut self) -> Result<DebugEvent, RuntimeError> {
        let pc = self.vm.pc();
        let line = self.vm.current_instruction().map(|i| i.line);

        let outcome = self.vm.step().inspect_err(|_| self.state = DebuggerState::Faulted)?;

        match (outcome, line) {
            (StepOutcome::Executed, Some(line)) => {
                self.record(pc, line);
                if self.vm.is_halted() {
                    self.state = DebuggerState::Stopped;
                    Ok(DebugEvent::Halted)
                } else {
                    self.state = DebuggerState::Paused;
                    Ok(DebugEvent::Stepped { pc, line })
                }
            }
            _ => {
                self.state = DebuggerState::Stopped;
                Ok(DebugEvent::Halted)
            }
        }
    }

    /// Executa até o próximo breakpoint ou até o fim.
    /// A instrução atual sempre roda, mesmo que tenha breakpoint.
    pub fn continue_run(&mut self) -> Result<DebugEvent, RuntimeError> {
        loop {
            if self.step()? == DebugEvent::Halted {
                return Ok(DebugEvent::Halted);
            }
            if let Some(line) = self.pending_breakpoint() {
                return Ok(DebugEvent::BreakpointHit { line });
            }
        }
    }

    /// Linha da próxima instrução, se ela tiver breakpoint
    fn pending_breakpoint(&self) -> Option<usize> {
        self.vm
            .current_instruction()
            .map(|i| i.line)
            .filter(|line| self.breakpoints.contains(line))
    }

    fn record(&mut self, pc: usize, line: usize) {
        if self.history.len() == MAX_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back((pc, line));
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // INSPEÇÃO
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn state(&self) -> DebuggerState {
        self.state
    }

    pub fn history(&self) -> impl Iterator<Item = &(usize, usize)> + '_ {
        self.history.iter()
    }

    pub fn vm(&self) -> &Vm {
        &self.vm
    }

    pub fn vm_mut(&mut self) -> &mut Vm {
        &mut self.vm
    }

    pub fn into_vm(self) -> Vm {
        self.vm
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTES
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::RuntimeErrorKind;

    const COUNTDOWN: &str = "SET R0 3\nloop:\nDECJZ R0 end\nGOTO loop\nend:\nPRINTI R0\nHALT";

    fn debugger(source: &str) -> Debugger {
        let mut dbg = Debugger::with_config(VmConfig::default());
        dbg.load(source).unwrap();
        dbg
    }

    #[test]
    fn test_breakpoint_management() {
        let mut dbg = debugger(COUNTDOWN);
        assert!(dbg.add_breakpoint(4));
        assert!(!dbg.add_breakpoint(4));
        dbg.add_breakpoint(1);
        assert_eq!(dbg.breakpoints().collect::<Vec<_>>(), vec![1, 4]);
        assert!(dbg.remove_breakpoint(1));
        assert!(!dbg.remove_breakpoint(1));
        dbg.clear_breakpoints();
        assert_eq!(dbg.breakpoints().count(), 0);
    }

    #[test]
    fn test_step_reports_executed_instruction() {
        let mut dbg = debugger(COUNTDOWN);
        assert_eq!(dbg.state(), DebuggerState::Ready);
        assert_eq!(dbg.step().unwrap(), DebugEvent::Stepped { pc: 0, line: 1 });
        assert_eq!(dbg.step().unwrap(), DebugEvent::Stepped { pc: 1, line: 3 });
        assert_eq!(dbg.state(), DebuggerState::Paused);
        assert_eq!(dbg.vm().registers().r0, 2);
    }

    #[test]
    fn test_continue_stops_at_breakpoint() {
        let mut dbg = debugger(COUNTDOWN);
        dbg.add_breakpoint(4);

        assert_eq!(dbg.continue_run().unwrap(), DebugEvent::BreakpointHit { line: 4 });
        assert_eq!(dbg.vm().registers().r0, 2);

        // Continuar a partir do breakpoint executa a instrução dele
        assert_eq!(dbg.continue_run().unwrap(), DebugEvent::BreakpointHit { line: 4 });
        assert_eq!(dbg.vm().registers().r0, 1);
    }

    #[test]
    fn test_continue_runs_to_halt() {
        let mut dbg = debugger(COUNTDOWN);
        assert_eq!(dbg.continue_run().unwrap(), DebugEvent::Halted);
        assert_eq!(dbg.state(), DebuggerState::Stopped);
        assert_eq!(dbg.vm().rendered_output(), "0 ");
        assert_eq!(dbg.history().count(), 10);
        assert_eq!(dbg.step().unwrap(), DebugEvent::Halted);
    }

    #[test]
    fn test_runtime_error_faults() {
        let mut dbg = debugger("SET R1 0\nDIV R0 R1");
        let err = dbg.continue_run().unwrap_err();
        assert_eq!(err.kind(), &RuntimeErrorKind::DivisionByZero);
        assert_eq!(err.line(), 2);
        assert_eq!(dbg.state(), DebuggerState::Faulted);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut dbg = debugger("loop:\nGOTO loop");
        for _ in 0..(MAX_HISTORY + 10) {
            dbg.step().unwrap();
        }
        assert_eq!(dbg.history().count(), MAX_HISTORY);
        assert_eq!(dbg.history().next(), Some(&(0, 2)));
    }
}
