//! Estado da VM
//!
//! Registradores graváveis, sensores somente-leitura e o snapshot exportado
//! para o CLI e o debugger.
//!
//! Largura dos registradores: `i64`. Toda aritmética é feita com
//! `wrapping_*`, ou seja, overflow dá a volta em complemento de dois.

use serde::Serialize;
use std::fmt;

/// Registrador gravável
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Register {
    Time,
    Power,
    R0,
    R1,
    R2,
    R3,
}

impl Register {
    /// Todos os registradores graváveis, em ordem
    pub const ALL: [Register; 6] = [
        Register::Time,
        Register::Power,
        Register::R0,
        Register::R1,
        Register::R2,
        Register::R3,
    ];

    /// Nome canônico (maiúsculo)
    pub fn name(self) -> &'static str {
        match self {
            Self::Time => "TIME",
            Self::Power => "POWER",
            Self::R0 => "R0",
            Self::R1 => "R1",
            Self::R2 => "R2",
            Self::R3 => "R3",
        }
    }

    /// Resolve um nome de registrador sem diferenciar maiúsculas.
    /// Nomes de sensores não são aceitos.
    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(token))
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sensor somente-leitura
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sensor {
    Temp,
    Weight,
    Mode,
    State,
}

impl Sensor {
    pub const ALL: [Sensor; 4] = [Sensor::Temp, Sensor::Weight, Sensor::Mode, Sensor::State];

    pub fn name(self) -> &'static str {
        match self {
            Self::Temp => "TEMP",
            Self::Weight => "WEIGHT",
            Self::Mode => "MODE",
            Self::State => "STATE",
        }
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Valores do sensor STATE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i64)]
pub enum DeviceState {
    /// Parado
    Stopped = 0,
    /// Ativo
    Active = 1,
    /// Pausado
    Paused = 2,
}

impl DeviceState {
    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Stopped),
            1 => Some(Self::Active),
            2 => Some(Self::Paused),
            _ => None,
        }
    }
}

/// Arquivo de registradores graváveis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct RegisterFile {
    pub time: i64,
    pub power: i64,
    pub r0: i64,
    pub r1: i64,
    pub r2: i64,
    pub r3: i64,
}

impl RegisterFile {
    #[inline]
    pub fn get(&self, reg: Register) -> i64 {
        match reg {
            Register::Time => self.time,
            Register::Power => self.power,
            Register::R0 => self.r0,
            Register::R1 => self.r1,
            Register::R2 => self.r2,
            Register::R3 => self.r3,
        }
    }

    #[inline]
    pub fn slot(&mut self, reg: Register) -> &mut i64 {
        match reg {
            Register::Time => &mut self.time,
            Register::Power => &mut self.power,
            Register::R0 => &mut self.r0,
            Register::R1 => &mut self.r1,
            Register::R2 => &mut self.r2,
            Register::R3 => &mut self.r3,
        }
    }

    #[inline]
    pub fn set(&mut self, reg: Register, value: i64) {
        *self.slot(reg) = value;
    }

    /// Pares (registrador, valor) em ordem canônica
    pub fn iter(&self) -> impl Iterator<Item = (Register, i64)> + '_ {
        Register::ALL.into_iter().map(move |r| (r, self.get(r)))
    }
}

/// Sensores do aparelho. Só as instruções de controle escrevem aqui.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct SensorFile {
    pub temp: i64,
    pub weight: i64,
    pub mode: i64,
    pub state: i64,
}

impl Default for SensorFile {
    fn default() -> Self {
        Self {
            temp: 0,
            weight: 100,
            mode: 0,
            state: DeviceState::Stopped as i64,
        }
    }
}

impl SensorFile {
    pub fn get(&self, sensor: Sensor) -> i64 {
        match sensor {
            Sensor::Temp => self.temp,
            Sensor::Weight => self.weight,
            Sensor::Mode => self.mode,
            Sensor::State => self.state,
        }
    }

    pub fn device_state(&self) -> Option<DeviceState> {
        DeviceState::from_value(self.state)
    }

    pub(crate) fn set_state(&mut self, state: DeviceState) {
        self.state = state as i64;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Sensor, i64)> + '_ {
        Sensor::ALL.into_iter().map(move |s| (s, self.get(s)))
    }
}

/// Visão somente-leitura do estado da máquina
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub registers: RegisterFile,
    pub sensors: SensorFile,
    /// Pilha, da base para o topo
    pub stack: Vec<i64>,
    pub pc: usize,
    pub halted: bool,
    pub steps: u64,
}

impl Snapshot {
    /// Serializa como JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Steps: {}", self.steps)?;
        writeln!(f, "PC: {}{}", self.pc, if self.halted { " (halted)" } else { "" })?;
        write!(f, "Registers:")?;
        for (reg, value) in self.registers.iter() {
            write!(f, " {}={}", reg, value)?;
        }
        writeln!(f)?;
        write!(f, "Sensors:")?;
        for (sensor, value) in self.sensors.iter() {
            write!(f, " {}={}", sensor, value)?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            write!(f, "Stack: {:?}", self.stack)?;
        }
        Ok(())
    }
}
