use std::env::args;

use brutesat::{prelude::*, report::Report, solve_file, Solution};
use pretty_env_logger::formatted_builder;

fn usage_string() -> String {
    format!(
        "Usage: {} <command>

command:
    check <file_name> - decide satisfiability of the given DIMACS CNF file",
        args().next().unwrap_or_else(|| "brutesat".to_owned())
    )
}

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("Unknown command '{}'\n\n{}", name, usage_string()))]
    UnknownCommand { name: String },
    #[snafu(display("Failed to solve CNF"))]
    SolverError { source: brutesat::Error },
    #[snafu(display("Required argument does not exist\n\n{}", usage_string()))]
    MissingArgument,
}

fn dispatch_command(args: Vec<String>) -> Result<(), Error> {
    match args.get(0).map(|s| s.as_str()) {
        Some("check") => {
            let path = args.get(1).context(MissingArgument)?;
            match solve_file(path).context(SolverError)? {
                Solution::Sat(model) => println!("SAT {}", model),
                Solution::Unsat => println!("UNSAT"),
            }
        }
        Some(name) => UnknownCommand {
            name: name.to_owned(),
        }
        .fail()?,
        None => MissingArgument.fail()?,
    }

    Ok(())
}

fn init_logger() {
    let mut builder = formatted_builder();

    if let Ok(s) = ::std::env::var("RUST_LOG") {
        builder.parse_filters(&s);
    } else if cfg!(debug_assertions) {
        builder.parse_filters("brutesat=debug");
    } else {
        builder.parse_filters("brutesat=warn");
    }

    builder.try_init().expect("Failed to initialize the logger");
}

fn main() -> Result<(), Report> {
    init_logger();

    let mut args = args();

    // drop arg[0]
    args.next();

    let remaining: Vec<_> = args.collect();
    if remaining.is_empty() {
        println!("{}", usage_string());
        return Ok(());
    }

    dispatch_command(remaining)?;

    Ok(())
}
