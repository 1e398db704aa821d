//! Núcleo de execução
//!
//! [`Machine`] guarda todo o estado mutável e aplica uma instrução por vez.
//! O programa e a configuração chegam por referência, de modo que o `Vm`
//! empresta campos disjuntos a cada passo.

use std::io::{self, Write};

use tracing::warn;

use super::arith::{
    fixed_div, fixed_mul, fixed_to_int, flag, floor_div, floor_mod, int_to_fixed, truthy,
};
use super::config::VmConfig;
use super::error::RuntimeErrorKind;
use super::instruction::{Instruction, Operation};
use super::opcode::{BinaryOp, BranchOp, NullaryOp, UnaryOp};
use super::output::{format_fixed, Printed};
use super::program::Program;
use super::state::{DeviceState, Register, RegisterFile, SensorFile, Snapshot};

/// Efeito de uma instrução sobre o PC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    /// pc += 1
    Next,
    /// pc = alvo
    Jump(usize),
    /// Marca halted, pc fica onde está
    Halt,
}

/// Estado mutável da máquina
#[derive(Debug, Clone, Default)]
pub(crate) struct Machine {
    pub registers: RegisterFile,
    pub sensors: SensorFile,
    pub stack: Vec<i64>,
    pub pc: usize,
    pub halted: bool,
    pub steps: u64,
    pub output: Vec<Printed>,
}

impl Machine {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            registers: self.registers,
            sensors: self.sensors,
            stack: self.stack.clone(),
            pc: self.pc,
            halted: self.halted,
            steps: self.steps,
        }
    }

    pub fn apply(&mut self, flow: Flow) {
        match flow {
            Flow::Next => self.pc += 1,
            Flow::Jump(target) => self.pc = target,
            Flow::Halt => self.halted = true,
        }
    }

    /// Executa uma instrução. Em erro, nenhum efeito foi aplicado.
    pub fn execute(
        &mut self,
        instr: &Instruction,
        program: &Program,
        config: &VmConfig,
    ) -> Result<Flow, RuntimeErrorKind> {
        match &instr.operation {
            Operation::Nullary(op) => Ok(self.exec_nullary(*op, config)),
            Operation::Unary(op, r) => self.exec_unary(*op, *r, config),
            Operation::Set(r, value) => {
                self.registers.set(*r, *value);
                Ok(Flow::Next)
            }
            Operation::Binary(op, a, b) => self.exec_binary(*op, *a, *b),
            Operation::Branch(op, r, label) => self.exec_branch(*op, *r, label, program),
            Operation::Goto(label) => Ok(Flow::Jump(resolve(program, label)?)),
            Operation::SetMode(mode) => {
                self.sensors.mode = *mode;
                self.sensors.set_state(DeviceState::Active);
                Ok(Flow::Next)
            }
            Operation::Sprint(id) => {
                let text = program
                    .string(*id)
                    .ok_or(RuntimeErrorKind::UndefinedString(*id))?;
                self.emit(Printed::word(text), config);
                Ok(Flow::Next)
            }
        }
    }

    fn exec_nullary(&mut self, op: NullaryOp, config: &VmConfig) -> Flow {
        match op {
            NullaryOp::Halt => return Flow::Halt,
            NullaryOp::Print => {
                let time = self.registers.get(Register::Time);
                self.emit(Printed::line(time.to_string()), config);
            }
            NullaryOp::Pause => self.sensors.set_state(DeviceState::Paused),
            NullaryOp::Resume => self.sensors.set_state(DeviceState::Active),
            NullaryOp::Stop => {
                self.sensors.set_state(DeviceState::Stopped);
                self.registers.power = 0;
            }
        }
        Flow::Next
    }

    fn exec_unary(
        &mut self,
        op: UnaryOp,
        r: Register,
        config: &VmConfig,
    ) -> Result<Flow, RuntimeErrorKind> {
        let value = self.registers.get(r);
        match op {
            UnaryOp::Inc => self.registers.set(r, value.wrapping_add(1)),
            UnaryOp::Dec => self.registers.set(r, value.wrapping_sub(1)),
            UnaryOp::Push => self.stack.push(value),
            UnaryOp::Pop => {
                let top = self.stack.pop().ok_or(RuntimeErrorKind::StackUnderflow)?;
                self.registers.set(r, top);
            }
            UnaryOp::Not => self.registers.set(r, flag(!truthy(value))),
            UnaryOp::Itof => self.registers.set(r, int_to_fixed(value)),
            UnaryOp::Ftoi => self.registers.set(r, fixed_to_int(value)),
            UnaryOp::PrintI => self.emit(Printed::word(value.to_string()), config),
            UnaryOp::PrintF => self.emit(Printed::word(format_fixed(value)), config),
            UnaryOp::PrintB => {
                let word = config.locale.bool_word(truthy(value));
                self.emit(Printed::word(word), config);
            }
        }
        Ok(Flow::Next)
    }

    fn exec_binary(&mut self, op: BinaryOp, a: Register, b: Register) -> Result<Flow, RuntimeErrorKind> {
        let x = self.registers.get(a);
        let y = self.registers.get(b);

        let result = match op {
            BinaryOp::Add | BinaryOp::AddF => x.wrapping_add(y),
            BinaryOp::Sub | BinaryOp::SubF => x.wrapping_sub(y),
            BinaryOp::Mul => x.wrapping_mul(y),
            BinaryOp::Div => floor_div(x, nonzero(y)?),
            BinaryOp::Mod => floor_mod(x, nonzero(y)?),
            BinaryOp::MulF => fixed_mul(x, y),
            BinaryOp::DivF => fixed_div(x, nonzero(y)?),
            BinaryOp::Eq => flag(x == y),
            BinaryOp::Ne => flag(x != y),
            BinaryOp::Lt => flag(x < y),
            BinaryOp::Le => flag(x <= y),
            BinaryOp::Gt => flag(x > y),
            BinaryOp::Ge => flag(x >= y),
            BinaryOp::And => flag(truthy(x) && truthy(y)),
            BinaryOp::Or => flag(truthy(x) || truthy(y)),
        };

        self.registers.set(a, result);
        Ok(Flow::Next)
    }

    fn exec_branch(
        &mut self,
        op: BranchOp,
        r: Register,
        label: &str,
        program: &Program,
    ) -> Result<Flow, RuntimeErrorKind> {
        let value = self.registers.get(r);
        match op {
            BranchOp::DecJz => {
                if !truthy(value) {
                    Ok(Flow::Jump(resolve(program, label)?))
                } else {
                    self.registers.set(r, value.wrapping_sub(1));
                    Ok(Flow::Next)
                }
            }
            BranchOp::Jz if !truthy(value) => Ok(Flow::Jump(resolve(program, label)?)),
            BranchOp::Jnz if truthy(value) => Ok(Flow::Jump(resolve(program, label)?)),
            BranchOp::Jz | BranchOp::Jnz => Ok(Flow::Next),
        }
    }

    fn emit(&mut self, printed: Printed, config: &VmConfig) {
        if config.echo_output {
            if let Err(e) = echo(&mut io::stdout().lock(), &printed) {
                warn!(error = %e, "failed to echo output");
            }
        }
        self.output.push(printed);
    }
}

/// Escreve a saída já formatada e descarrega o writer
fn echo(writer: &mut impl Write, printed: &Printed) -> io::Result<()> {
    write!(writer, "{}", printed)?;
    writer.flush()
}

#[inline]
fn resolve(program: &Program, label: &str) -> Result<usize, RuntimeErrorKind> {
    program
        .label(label)
        .ok_or_else(|| RuntimeErrorKind::UndefinedLabel(label.to_string()))
}

#[inline]
fn nonzero(divisor: i64) -> Result<i64, RuntimeErrorKind> {
    if divisor == 0 {
        Err(RuntimeErrorKind::DivisionByZero)
    } else {
        Ok(divisor)
    }
}
