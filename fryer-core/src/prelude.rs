//! # Prelude — Re-exportações Convenientes
//!
//! ```
//! use fryer_core::prelude::*;
//! ```

// Motor
pub use crate::vm::{
    Vm,
    VmConfig,
    Locale,
    StepOutcome,
    Snapshot,
};

// Programa
pub use crate::vm::{
    assemble,
    Program,
    Instruction,
    Operation,
    Opcode,
};

// Estado
pub use crate::vm::{
    Register,
    Sensor,
    DeviceState,
    RegisterFile,
    SensorFile,
    Printed,
};

// Erros
pub use crate::vm::{
    LoadError,
    LoadErrorKind,
    RuntimeError,
    RuntimeErrorKind,
    VmError,
    VmResult,
};

// Debugger
pub use crate::vm::{Debugger, DebugEvent};
