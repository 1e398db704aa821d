//! Fryer - air fryer assembly
//! Command-line interface for loading, running and stepping through fryer programs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use fryer_core::vm::{
    assemble, DebugEvent, Debugger, Locale, Opcode, OperandKind, Printed, Snapshot, Terminator,
    Vm, VmConfig,
};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fryer")]
#[command(author = "Silvano Neto <dev@silvanoneto.com>")]
#[command(version = "2026.1.16")]
#[command(about = "Fryer - assembler and interpreter for the air fryer control language", long_about = None)]
struct Cli {
    /// Log every executed step to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and run a program, then print the final state
    Run {
        /// Input source file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Print output and final state as JSON
        #[arg(long)]
        json: bool,

        /// Maximum number of executed instructions
        #[arg(long, value_name = "N")]
        max_steps: Option<u64>,

        /// Boolean words for PRINTB (pt or en)
        #[arg(long, value_name = "LOCALE")]
        locale: Option<Locale>,
    },

    /// Validate a program without running it
    Check {
        /// Input source file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Print the disassembled listing
        #[arg(short, long)]
        listing: bool,
    },

    /// Step through a program interactively
    Debug {
        /// Input source file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Maximum number of executed instructions
        #[arg(long, value_name = "N")]
        max_steps: Option<u64>,

        /// Boolean words for PRINTB (pt or en)
        #[arg(long, value_name = "LOCALE")]
        locale: Option<Locale>,
    },

    /// List the instruction set
    Opcodes,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run { input, json, max_steps, locale } => {
            run_command(&input, json, build_config(max_steps, locale))
        }
        Commands::Check { input, listing } => check_command(&input, listing),
        Commands::Debug { input, max_steps, locale } => {
            debug_command(&input, build_config(max_steps, locale), cli.verbose)
        }
        Commands::Opcodes => {
            print_opcodes();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("fryer_core=debug,fryer=debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Ambiente (`.env`, `FRYER_*`) primeiro, flags da linha de comando por cima
fn build_config(max_steps: Option<u64>, locale: Option<Locale>) -> VmConfig {
    let mut config = VmConfig::from_env();
    if let Some(max_steps) = max_steps {
        config = config.with_max_steps(max_steps);
    }
    if let Some(locale) = locale {
        config = config.with_locale(locale);
    }
    config
}

fn read_source(input: &Path) -> Result<String> {
    fs::read_to_string(input).with_context(|| format!("cannot read {}", input.display()))
}

// ============================================================================
// run
// ============================================================================

fn run_command(input: &Path, json: bool, config: VmConfig) -> Result<()> {
    let source = read_source(input)?;

    let mut vm = Vm::new(config.with_echo(!json));
    vm.load(&source)
        .with_context(|| format!("failed to load {}", input.display()))?;
    tracing::debug!(path = %input.display(), instructions = vm.program().len(), "program loaded");

    let result = vm.run();
    if !json {
        finish_output_line(vm.output());
    }

    match result {
        Ok(snapshot) if json => {
            let report = serde_json::json!({
                "output": vm.rendered_output(),
                "state": snapshot,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Ok(snapshot) => {
            println!("{}", "Final state".green().bold());
            print_snapshot(&snapshot);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", "State at failure".yellow().bold());
            eprintln!("{}", vm.snapshot());
            Err(e).with_context(|| format!("runtime error in {}", input.display()))
        }
    }
}

/// Garante que o estado final comece em linha nova
fn finish_output_line(output: &[Printed]) {
    if output.last().is_some_and(|p| p.terminator == Terminator::Space) {
        println!();
    }
}

fn print_snapshot(snapshot: &Snapshot) {
    println!("{}", snapshot);
}

// ============================================================================
// check
// ============================================================================

fn check_command(input: &Path, listing: bool) -> Result<()> {
    let source = read_source(input)?;

    println!(
        "{} {}",
        "Checking".green().bold(),
        input.display().to_string().cyan()
    );

    let program = assemble(&source)?;

    let dangling = program.dangling_references();
    for (line, label) in &dangling.labels {
        println!(
            "{} line {}: jump to undefined label '{}'",
            "warning:".yellow().bold(),
            line,
            label
        );
    }
    for (line, id) in &dangling.strings {
        println!(
            "{} line {}: SPRINT of undefined string id {}",
            "warning:".yellow().bold(),
            line,
            id
        );
    }

    if listing {
        println!();
        print!("{}", program.listing());
        println!();
    }

    println!(
        "{} {} instructions, {} labels, {} strings",
        "    Finished".green().bold(),
        program.len(),
        program.labels().len(),
        program.strings().len()
    );

    Ok(())
}

// ============================================================================
// debug
// ============================================================================

/// Com `verbose`, mostra os registradores após cada passo
fn debug_command(input: &Path, config: VmConfig, verbose: bool) -> Result<()> {
    let source = read_source(input)?;

    let mut dbg = Debugger::with_config(config);
    dbg.load(&source)
        .with_context(|| format!("failed to load {}", input.display()))?;

    println!(
        "{} {} ({} instructions)",
        "Debugging".green().bold(),
        input.display().to_string().cyan(),
        dbg.vm().program().len()
    );
    print_debug_help();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print_current(&dbg);
        print!("{} ", "(fryer)".bold());
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        let words: Vec<&str> = line.split_whitespace().collect();

        let event = match words.as_slice() {
            [] | ["n"] | ["next"] => dbg.step(),
            ["c"] | ["continue"] => dbg.continue_run(),
            ["b", n] => {
                match n.parse::<usize>() {
                    Ok(line) => {
                        dbg.add_breakpoint(line);
                        println!("breakpoint at line {}", line);
                    }
                    Err(_) => println!("{} invalid line number '{}'", "warning:".yellow().bold(), n),
                }
                continue;
            }
            ["d", n] => {
                let removed = n.parse::<usize>().is_ok_and(|line| dbg.remove_breakpoint(line));
                if removed {
                    println!("removed breakpoint at line {}", n);
                } else {
                    println!("no breakpoint at line {}", n);
                }
                continue;
            }
            ["l"] => {
                let listed: Vec<String> = dbg.breakpoints().map(|l| l.to_string()).collect();
                println!("breakpoints: {}", if listed.is_empty() { "none".to_string() } else { listed.join(", ") });
                continue;
            }
            ["r"] => {
                print_registers(&dbg.vm().snapshot());
                continue;
            }
            ["s"] => {
                println!("stack (bottom → top): {:?}", dbg.vm().stack());
                continue;
            }
            ["q"] | ["quit"] => break,
            _ => {
                print_debug_help();
                continue;
            }
        };

        for printed in dbg.vm_mut().take_output() {
            println!("{} {}", "out:".dimmed(), printed.text);
        }

        match event {
            Ok(DebugEvent::Stepped { .. }) => {
                if verbose {
                    print_registers(&dbg.vm().snapshot());
                }
            }
            Ok(DebugEvent::BreakpointHit { line }) => {
                println!("{} line {}", "breakpoint".yellow().bold(), line);
                if verbose {
                    print_registers(&dbg.vm().snapshot());
                }
            }
            Ok(DebugEvent::Halted) => {
                println!("{}", "Halted".green().bold());
                print_snapshot(&dbg.vm().snapshot());
                break;
            }
            Err(e) => {
                eprintln!("{}", "State at failure".yellow().bold());
                eprintln!("{}", dbg.vm().snapshot());
                return Err(e.into());
            }
        }
    }

    Ok(())
}

fn print_current(dbg: &Debugger) {
    match dbg.vm().current_instruction() {
        Some(instr) => println!(
            "{} {:04}  {:<24} {}",
            "→".cyan(),
            dbg.vm().pc(),
            instr.to_string(),
            format!("(line {})", instr.line).dimmed()
        ),
        None => println!("{} end of program", "→".cyan()),
    }
}

fn print_registers(snapshot: &Snapshot) {
    println!("{}", register_line(snapshot, false));
    println!("{}", register_line(snapshot, true));
}

/// `TIME=0 POWER=0 ...` ou, com `sensors`, `TEMP=.. WEIGHT=..`
fn register_line(snapshot: &Snapshot, sensors: bool) -> String {
    let pairs: Vec<String> = if sensors {
        snapshot
            .sensors
            .iter()
            .map(|(sensor, value)| format!("{}={}", sensor.to_string().magenta(), value))
            .collect()
    } else {
        snapshot
            .registers
            .iter()
            .map(|(reg, value)| format!("{}={}", reg.to_string().cyan(), value))
            .collect()
    };
    pairs.join(" ")
}

fn print_debug_help() {
    println!("{}", "Commands:".bold());
    println!("  <enter>, n     step one instruction");
    println!("  c              continue until breakpoint or halt");
    println!("  b N            breakpoint at source line N");
    println!("  d N            delete breakpoint at line N");
    println!("  l              list breakpoints");
    println!("  r              show registers and sensors");
    println!("  s              show stack");
    println!("  q              quit");
}

// ============================================================================
// opcodes
// ============================================================================

fn print_opcodes() {
    println!("{}", "Instruction set".bold());
    println!();
    for op in Opcode::all() {
        let operands: Vec<&str> = op
            .signature()
            .iter()
            .map(|kind| match kind {
                OperandKind::Register => "reg",
                OperandKind::Integer => "int",
                OperandKind::Label => "label",
            })
            .collect();
        println!(
            "  {} {:<12} {}",
            format!("{:<8}", op.mnemonic()).cyan(),
            operands.join(", "),
            format!("{:?}", op.category()).dimmed()
        );
    }
    println!();
    println!("Registers: TIME POWER R0 R1 R2 R3");
    println!("Sensors (read-only): TEMP WEIGHT MODE STATE");
}
