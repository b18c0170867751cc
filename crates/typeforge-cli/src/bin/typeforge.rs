//! The `typeforge` binary: `clap` argument parsing, `tracing` setup, then
//! delegates to `typeforge_cli::driver::run`. Grounded on the shape of
//! `tsz-cli`'s binaries (parse args, install a subscriber, run the
//! pipeline, translate the result into a process exit code) though this
//! core has a single binary rather than the teacher's `tsz`/`tsz-lsp`/
//! `tsz-server` split, since there is no language server or incremental
//! build here to serve.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use typeforge_cli::{reporter, run, CliArgs, Outcome};
use typeforge_common::limits;
use typeforge_common::EngineOptions;

fn init_logging(trace: bool) {
    if trace {
        let subscriber = tracing_subscriber::registry().with(tracing_tree::HierarchicalLayer::new(2));
        let _ = subscriber.try_init();
    } else {
        typeforge_common::logging::init();
    }
}

fn engine_options(args: &CliArgs) -> EngineOptions {
    let mut options = EngineOptions {
        fuel_limit: args.fuel_limit.unwrap_or(limits::DEFAULT_FUEL),
        max_recursion_depth: args.max_recursion_depth.unwrap_or(limits::DEFAULT_MAX_RECURSION_DEPTH),
        ..EngineOptions::default()
    };
    if args.strict {
        options = options.apply_strict_defaults();
    }
    options
}

fn main() -> Result<ExitCode> {
    let args = CliArgs::parse();
    init_logging(args.trace);

    let input = std::fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let program: typeforge_ir::core::Program =
        serde_json::from_str(&input).with_context(|| format!("parsing {} as a core IR program", args.input.display()))?;

    let options = engine_options(&args);
    match run(&program, options, args.sandbox_root.clone()) {
        Outcome::Diagnostics(diagnostics) => {
            let error_count = reporter::print_diagnostics(&diagnostics);
            if error_count > 0 {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
        Outcome::Program(runtime_program) => {
            match args.out {
                Some(path) => {
                    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
                    let mut writer = BufWriter::new(file);
                    serde_json::to_writer_pretty(&mut writer, &runtime_program)?;
                    writer.flush()?;
                }
                None => {
                    let stdout = std::io::stdout();
                    let mut handle = stdout.lock();
                    serde_json::to_writer_pretty(&mut handle, &runtime_program)?;
                    writeln!(handle)?;
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
