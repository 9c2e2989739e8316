use std::{collections::VecDeque, process::ExitCode};

use colored::Colorize;
use smartcod_protocol::SignatureCache;

use crate::{commands::Command, err::Error, options::OptionTable};

mod commands;
mod err;
mod logging;
mod options;
mod port;

type Result<T> = core::result::Result<T, Error>;

/// Work through the command line.
///
/// `-name value` pairs update the option table, anything else is a command run
/// against the options set so far. `call` takes its job name and inputs from
/// the arguments that follow it; the rest carry on as usual.
fn run(args: impl IntoIterator<Item = String>) -> Result<()> {
    let mut queue: VecDeque<String> = args.into_iter().collect();
    if queue.is_empty() {
        return Err(Error::Usage);
    }

    let mut table = OptionTable::default();
    let mut cache = SignatureCache::default();

    while let Some(arg) = queue.pop_front() {
        if let Some(name) = arg.strip_prefix('-') {
            if name.is_empty() {
                continue;
            }
            let value = queue
                .pop_front()
                .ok_or_else(|| Error::MissingOptionValue(arg.clone()))?;
            table.set(name, value);
            continue;
        }

        let command: Command = arg
            .parse()
            .map_err(|_| Error::UnsupportedCommand(arg.clone()))?;
        let options = table.options()?;

        match command {
            Command::Build => commands::build(&options)?,
            Command::Load => commands::load(&options)?,
            Command::List => commands::list(&options)?,
            Command::Reset => commands::reset(&options)?,
            Command::Call => {
                let job = queue.pop_front().ok_or(Error::MissingJobName)?;
                commands::call(&options, &mut cache, &job, &mut queue)?;
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    match run(std::env::args().skip(1)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            ExitCode::FAILURE
        }
    }
}
