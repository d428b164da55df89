mod args;
mod console_driver;
mod input;
mod output;

use std::process::ExitCode;

use clap::Parser;
use codespan_reporting::files::SimpleFiles;
use log::LevelFilter;
use purr_frontend::{CheckOptions, Checker};

use args::{Arguments, CheckArgs, Command, InferArgs};
use console_driver::ConsoleDriver;
use input::add_file;
use output::format_primitive;

fn main() -> anyhow::Result<ExitCode> {
    let args = Arguments::parse();
    let options = args.options();

    init_logger(options.verbose);

    let failed = match &args.command {
        Command::Check(check_args) => check(check_args, options)?,
        Command::Infer(infer_args) => infer(infer_args, options)?,
        Command::Primitives(_) => primitives(options)?,
    };

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Warnings and worse by default, overridden by `RUST_LOG`. Verbose runs
/// also show the inference trace.
fn init_logger(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Warn);

    if verbose {
        builder.filter_module("purr_tyck", LevelFilter::Info);
    }

    builder.parse_default_env().init();
}

fn check(args: &CheckArgs, options: CheckOptions) -> anyhow::Result<bool> {
    let mut files = SimpleFiles::new();
    let (file, src) = add_file(&mut files, &args.path)?;

    let mut driver = ConsoleDriver::new(files);
    let mut checker = Checker::new(options)?;
    checker.check_program(&mut driver, &src, file)?;

    Ok(driver.failed())
}

fn infer(args: &InferArgs, options: CheckOptions) -> anyhow::Result<bool> {
    let mut driver = ConsoleDriver::new(SimpleFiles::new());
    let mut checker = Checker::new(options)?;

    if let Some(path) = &args.prelude {
        let (file, src) = add_file(driver.files_mut(), path)?;

        driver.show_definitions(false);
        checker.check_program(&mut driver, &src, file)?;
        driver.show_definitions(true);
    }

    let words = args.words.join(" ");
    let file = driver.files_mut().add("<input>".into(), words.clone());
    checker.infer_words(&mut driver, &words, file)?;

    Ok(driver.failed())
}

fn primitives(options: CheckOptions) -> anyhow::Result<bool> {
    let checker = Checker::new(options)?;

    for (prim, ty) in checker.primitives() {
        println!("{}", format_primitive(prim, checker.pretty(ty)));
    }

    Ok(false)
}
