//! # CLI Layer
//!
//! One client of the barcodez library. This is the only place that reads
//! arguments and stdin, prints, or decides the process exit code.
//!
//! - `run()`: parse, set up logging, build the context, dispatch
//! - `handle_*()`: turn arguments into a [`Request`] and print the result
//!
//! Business logic stays in the library; handlers only translate.

use super::render::{print_config, print_messages, print_records};
use super::setup::{
    print_grouped_help, print_help_for_command, subcommand_name, Cli, Commands, CoreCommands,
    ExportCommands, GenerateArgs, MiscCommands,
};
use barcodez::api::{BarcodezApi, GenerateOptions, Request};
use barcodez::commands::config::ConfigAction;
use barcodez::commands::CmdResult;
use barcodez::error::{BarcodezError, Result};
use barcodez::export::{
    BulkFormat, DestinationChooser, ExtensionFilter, FixedDestination, FsWriter,
    PromptDestination, SingleFormat,
};
use barcodez::init::initialize;
use barcodez::model::Symbology;
use barcodez::render::BarcodersRenderer;
use barcodez::store::fs_backend::FsBackend;
use clap::Parser;
use env_logger::Env;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

struct AppContext {
    api: BarcodezApi<FsBackend, BarcodersRenderer, FsWriter>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    if cli.help {
        match &cli.command {
            Some(command) => print_help_for_command(subcommand_name(command)),
            None => print_grouped_help(),
        }
        return Ok(());
    }

    if let Some(Commands::Misc(MiscCommands::Help { command })) = &cli.command {
        match command {
            Some(name) => print_help_for_command(name),
            None => print_grouped_help(),
        }
        return Ok(());
    }

    let mut ctx = init_context()?;

    match cli.command {
        Some(Commands::Core(cmd)) => match cmd {
            CoreCommands::Generate { value, options } => handle_generate(&mut ctx, value, options),
            CoreCommands::Bulk {
                values,
                file,
                options,
            } => handle_bulk(&mut ctx, values, file, options),
            CoreCommands::List { search } => handle_list(&mut ctx, search),
            CoreCommands::Search { term } => handle_list(&mut ctx, Some(term.join(" "))),
        },
        Some(Commands::Export(cmd)) => match cmd {
            ExportCommands::Export {
                index,
                format,
                output,
            } => handle_export(&mut ctx, index, format, output),
            ExportCommands::ExportAll {
                format,
                search,
                output,
            } => handle_export_all(&mut ctx, format, search, output),
        },
        Some(Commands::Misc(cmd)) => match cmd {
            MiscCommands::Config { key, value } => handle_config(&mut ctx, key, value),
            MiscCommands::Help { .. } => Ok(()),
        },
        None => handle_list(&mut ctx, None),
    }
}

fn init_context() -> Result<AppContext> {
    let ctx = initialize()?;
    Ok(AppContext { api: ctx.api })
}

/// Chooser for requests that never export; cancels if asked.
struct NoDestination;

impl DestinationChooser for NoDestination {
    fn choose(&mut self, _default_name: &str, _filter: &ExtensionFilter) -> Result<Option<PathBuf>> {
        Ok(None)
    }
}

fn dispatch(ctx: &mut AppContext, request: Request) -> Result<CmdResult> {
    ctx.api.dispatch(request, &mut NoDestination)
}

fn generate_options(args: GenerateArgs) -> GenerateOptions {
    GenerateOptions {
        symbology: args.symbology.as_deref().map(Symbology::from_label),
        width: args.width,
        height: args.height,
    }
}

/// Error messages already describe what went wrong; exit non-zero so scripts notice.
fn finish(result: &CmdResult) -> Result<()> {
    if result.has_errors() {
        std::process::exit(1);
    }
    Ok(())
}

fn handle_generate(ctx: &mut AppContext, value: String, options: GenerateArgs) -> Result<()> {
    let result = dispatch(
        ctx,
        Request::Generate {
            value,
            options: generate_options(options),
        },
    )?;
    print_messages(&result.messages);
    finish(&result)
}

fn handle_bulk(
    ctx: &mut AppContext,
    values: Vec<String>,
    file: Option<PathBuf>,
    options: GenerateArgs,
) -> Result<()> {
    let input = if let Some(path) = file {
        std::fs::read_to_string(&path)
            .map_err(|e| BarcodezError::Api(format!("Cannot read {}: {}", path.display(), e)))?
    } else if !values.is_empty() {
        values.join("\n")
    } else if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        return Err(BarcodezError::Api(
            "No values given (pass them as arguments, with --file, or on stdin)".to_string(),
        ));
    };

    let result = dispatch(
        ctx,
        Request::GenerateBulk {
            input,
            options: generate_options(options),
        },
    )?;
    print_messages(&result.messages);
    finish(&result)
}

fn handle_list(ctx: &mut AppContext, search: Option<String>) -> Result<()> {
    let result = dispatch(ctx, Request::List { query: search })?;
    print_records(&result.listed_records);
    print_messages(&result.messages);
    Ok(())
}

fn chooser(output: Option<PathBuf>) -> Box<dyn DestinationChooser> {
    match output {
        Some(path) => Box::new(FixedDestination::new(path)),
        None => Box::new(PromptDestination::new(io::stdin().lock(), io::stderr())),
    }
}

fn handle_export(
    ctx: &mut AppContext,
    index: String,
    format: String,
    output: Option<PathBuf>,
) -> Result<()> {
    let format: SingleFormat = format.parse()?;
    let mut chooser = chooser(output);
    let result = ctx.api.dispatch(
        Request::ExportOne {
            selector: index,
            format,
        },
        chooser.as_mut(),
    )?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_export_all(
    ctx: &mut AppContext,
    format: String,
    search: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let format: BulkFormat = format.parse()?;
    let mut chooser = chooser(output);
    let result = ctx.api.dispatch(
        Request::ExportMany {
            query: search,
            format,
        },
        chooser.as_mut(),
    )?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &mut AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let result = dispatch(ctx, Request::Config(action))?;
    if result.messages.is_empty() {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    finish(&result)
}
