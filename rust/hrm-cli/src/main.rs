//! HRM CLI: run levels and inspect programs from the command line.

use clap::{Parser as ClapParser, Subcommand};
use hrm_cli::colors::{bold, gray, green, red, status_label, yellow};
use hrm_cli::config::{HrmConfig, CONFIG_FILE};
use hrm_cli::level::Level;
use hrm_cli::report::RunReport;
use hrm_compiler::diagnostics::check_program;
use hrm_core::Program;
use hrm_vm::{DebugEvent, VM};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "hrm", version, about = "Human Resource Machine interpreter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a level and report its scores
    Run {
        /// Level file, or a name inside the levels directory
        #[arg()]
        level: PathBuf,

        /// Also write the program's control-flow graph to this path
        #[arg(long)]
        dotfile: Option<PathBuf>,

        /// Abort after this many executed instructions
        #[arg(long)]
        max_steps: Option<u64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Enable debug logging, including every executed instruction
        #[arg(long)]
        debug: bool,
    },
    /// Compile a source file and report problems
    Check {
        /// Path to the program source
        #[arg()]
        file: PathBuf,
    },
    /// Print the numbered listing of a source file
    Listing {
        /// Path to the program source
        #[arg()]
        file: PathBuf,
    },
    /// Print the control-flow graph of a source file in DOT format
    Dot {
        /// Path to the program source
        #[arg()]
        file: PathBuf,

        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Create an hrm.toml config file in the current directory
    Init,
}

fn main() {
    let cli = Cli::parse();
    let config = HrmConfig::load().unwrap_or_else(|e| {
        eprintln!("{} {}", red("error:"), e);
        std::process::exit(1);
    });

    let debug = matches!(cli.command, Commands::Run { debug: true, .. });
    init_logging(&config, debug);

    match cli.command {
        Commands::Run {
            level,
            dotfile,
            max_steps,
            json,
            debug: _,
        } => cmd_run(&config, &level, dotfile, max_steps, json),
        Commands::Check { file } => cmd_check(&file),
        Commands::Listing { file } => cmd_listing(&file),
        Commands::Dot { file, output } => cmd_dot(&file, output),
        Commands::Init => cmd_init(),
    }
}

/// `RUST_LOG` wins, then `--debug`, then the config file, then `info`.
fn init_logging(config: &HrmConfig, debug: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = if debug {
            "debug"
        } else {
            config.log.filter.as_deref().unwrap_or("info")
        };
        EnvFilter::new(directive)
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_source(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("{} cannot read file '{}': {}", red("error:"), bold(&path.display().to_string()), e);
        std::process::exit(1);
    })
}

/// Compile source or print the diagnostic and exit.
fn compile_or_exit(source: &str, filename: &str) -> Program {
    hrm_compiler::compile(source).unwrap_or_else(|e| {
        eprintln!("{} compilation failed", red("error:"));
        eprint!("{}", hrm_compiler::format_error(&e, source, filename));
        std::process::exit(1);
    })
}

fn write_or_exit(path: &Path, contents: &str) {
    std::fs::write(path, contents).unwrap_or_else(|e| {
        eprintln!("{} writing to '{}': {}", red("error:"), path.display(), e);
        std::process::exit(1);
    });
}

fn cmd_run(config: &HrmConfig, level_arg: &Path, dotfile: Option<PathBuf>, max_steps: Option<u64>, json: bool) {
    let path = config.resolve_level(level_arg);
    info!(level = %path.display(), "loading level");
    let level = Level::load(&path).unwrap_or_else(|e| {
        eprintln!("{} {}", red("error:"), e);
        std::process::exit(1);
    });

    let filename = path.display().to_string();
    let program = compile_or_exit(&level.source, &filename);
    let mut vm = VM::new(program, &level.registers(), &level.input);
    if let Some(limit) = max_steps.or(config.run.max_steps) {
        vm.set_step_limit(limit);
    }
    vm.debug_callback = Some(Box::new(|event: &DebugEvent| match event {
        DebugEvent::Step { pc, instruction } => debug!(pc, %instruction, "step"),
        DebugEvent::Output { value } => debug!(%value, "output"),
        DebugEvent::Halt { reason } => debug!(%reason, "halt"),
    }));

    if let Err(e) = vm.run() {
        eprintln!("{} {}", red("runtime error:"), e);
        std::process::exit(1);
    }
    info!(executions = vm.executions(), instructions = vm.instruction_count(), "run finished");

    let report = RunReport::new(&level, &vm);
    if json {
        match report.to_json() {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("{} {}", red("error:"), e);
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", report.render());
    }

    if let Some(ref dot_path) = dotfile {
        write_or_exit(dot_path, &vm.render_graph());
        if !json {
            println!("{} {}", status_label("Wrote"), dot_path.display());
        }
    }
}

fn cmd_check(file: &Path) {
    let source = read_source(file);
    let filename = file.display().to_string();
    let compiled = hrm_compiler::compile_source(&source).unwrap_or_else(|e| {
        eprint!("{}", hrm_compiler::format_error(&e, &source, &filename));
        std::process::exit(1);
    });

    let warnings = check_program(&compiled, &source, &filename);
    for warning in &warnings {
        eprint!("{}", warning.render_ansi());
    }

    let count = compiled.program.executable_count();
    if warnings.is_empty() {
        println!("{} {} {}", green("✓"), bold(&filename), gray(&format!("{} instructions", count)));
    } else {
        println!(
            "{} {} {}",
            yellow("!"),
            bold(&filename),
            gray(&format!("{} instructions, {} warning(s)", count, warnings.len()))
        );
    }
}

fn cmd_listing(file: &Path) {
    let source = read_source(file);
    let program = compile_or_exit(&source, &file.display().to_string());
    println!("{}", program.render_text());
}

fn cmd_dot(file: &Path, output: Option<PathBuf>) {
    let source = read_source(file);
    let program = compile_or_exit(&source, &file.display().to_string());
    let dot = program.render_graph();

    match output {
        Some(ref out_path) => {
            write_or_exit(out_path, &dot);
            println!("{} {}", status_label("Wrote"), out_path.display());
        }
        None => println!("{}", dot),
    }
}

fn cmd_init() {
    let path = PathBuf::from(CONFIG_FILE);
    if path.exists() {
        eprintln!("{} {} already exists, not overwriting", red("error:"), CONFIG_FILE);
        std::process::exit(1);
    }
    write_or_exit(&path, HrmConfig::default_template());
    println!("{} {}", status_label("Created"), CONFIG_FILE);
}
