use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.0" for releases, "0.3.0@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "barcodez",
    bin_name = "barcodez",
    version = get_version(),
    disable_help_flag = true,
    disable_help_subcommand = true
)]
#[command(about = "Generate, store and export retail barcodes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Print help
    #[arg(short, long, global = true)]
    pub help: bool,
}

/// Command group definitions for help output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Core,
    Export,
    Misc,
}

impl CommandGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            CommandGroup::Core => "Core Commands:",
            CommandGroup::Export => "Export Commands:",
            CommandGroup::Misc => "Miscellaneous:",
        }
    }

    pub fn for_command(name: &str) -> Option<Self> {
        match name {
            "generate" | "bulk" | "list" | "search" => Some(CommandGroup::Core),
            "export" | "export-all" => Some(CommandGroup::Export),
            "config" | "help" => Some(CommandGroup::Misc),
            _ => None,
        }
    }

    pub fn all() -> &'static [CommandGroup] {
        &[CommandGroup::Core, CommandGroup::Export, CommandGroup::Misc]
    }
}

/// Returns the custom grouped help output as a string
pub fn get_grouped_help() -> String {
    let cmd = Cli::command();
    let version = cmd.get_version().unwrap_or("unknown");

    let mut output = String::new();
    output.push_str(&format!("barcodez {version}\n"));
    output.push_str("Generate, store and export retail barcodes\n");
    output.push('\n');
    output.push_str("Usage: barcodez [OPTIONS] [COMMAND]\n");

    let subcommands: Vec<_> = cmd.get_subcommands().collect();

    for group in CommandGroup::all() {
        let group_cmds: Vec<_> = subcommands
            .iter()
            .filter(|sc| {
                !sc.is_hide_set() && CommandGroup::for_command(sc.get_name()) == Some(*group)
            })
            .collect();

        if !group_cmds.is_empty() {
            output.push('\n');
            output.push_str(&format!("{}\n", group.heading()));
            for sc in group_cmds {
                let name = sc.get_name();
                let about = sc.get_about().map(|s| s.to_string()).unwrap_or_default();
                output.push_str(&format!("  {:<12} {}\n", name, about));
            }
        }
    }

    output.push('\n');
    output.push_str("Options:\n");
    output.push_str("  -v, --verbose    Verbose output (debug logging)\n");
    output.push_str("  -h, --help       Print help\n");
    output.push_str("  -V, --version    Print version\n");

    output
}

pub fn print_grouped_help() {
    print!("{}", get_grouped_help());
}

/// Prints help for a command by name, falling back to the grouped help.
pub fn print_help_for_command(name: &str) {
    let mut cmd = Cli::command();

    for subcmd in cmd.get_subcommands_mut() {
        if subcmd.get_name() == name || subcmd.get_all_aliases().any(|a| a == name) {
            print!("{}", subcmd.render_help());
            return;
        }
    }

    eprintln!("Unknown command: {}", name);
    eprintln!();
    print_grouped_help();
}

pub fn subcommand_name(command: &Commands) -> &'static str {
    match command {
        Commands::Core(c) => match c {
            CoreCommands::Generate { .. } => "generate",
            CoreCommands::Bulk { .. } => "bulk",
            CoreCommands::List { .. } => "list",
            CoreCommands::Search { .. } => "search",
        },
        Commands::Export(c) => match c {
            ExportCommands::Export { .. } => "export",
            ExportCommands::ExportAll { .. } => "export-all",
        },
        Commands::Misc(c) => match c {
            MiscCommands::Config { .. } => "config",
            MiscCommands::Help { .. } => "help",
        },
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Core(CoreCommands),

    #[command(flatten)]
    Export(ExportCommands),

    #[command(flatten)]
    Misc(MiscCommands),
}

/// Symbology and size overrides; unset values come from `barcodez config`.
#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Symbology: jan, itf or gs1
    #[arg(short = 't', long = "type", value_name = "SYMBOLOGY")]
    pub symbology: Option<String>,

    /// Module width in pixels (1-10)
    #[arg(long)]
    pub width: Option<u32>,

    /// Bar height in pixels (50-200)
    #[arg(long)]
    pub height: Option<u32>,
}

#[derive(Subcommand, Debug)]
pub enum CoreCommands {
    /// Generate and store one barcode
    #[command(alias = "g", display_order = 1)]
    Generate {
        /// Value to encode
        value: String,

        #[command(flatten)]
        options: GenerateArgs,
    },

    /// Generate one barcode per line (from arguments, --file or stdin)
    #[command(display_order = 2)]
    Bulk {
        /// Values to encode
        #[arg(num_args = 0..)]
        values: Vec<String>,

        /// Read values from a file, one per line
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,

        #[command(flatten)]
        options: GenerateArgs,
    },

    /// List stored barcodes
    #[command(alias = "ls", display_order = 3)]
    List {
        /// Only show barcodes whose value or type contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Search stored barcodes by value or type
    #[command(display_order = 4)]
    Search {
        #[arg(required = true, num_args = 1..)]
        term: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export one barcode as png or pdf
    #[command(display_order = 10)]
    Export {
        /// Index of the barcode (see `barcodez list`)
        index: String,

        /// png or pdf
        #[arg(short, long, default_value = "png")]
        format: String,

        /// Write here instead of asking
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Export all (or matching) barcodes as pdf or xlsx
    #[command(display_order = 11)]
    ExportAll {
        /// pdf or xlsx
        #[arg(short, long, default_value = "pdf")]
        format: String,

        /// Only export barcodes whose value or type contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Write here instead of asking
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum MiscCommands {
    /// Get or set configuration
    #[command(display_order = 20)]
    Config {
        /// Configuration key (symbology, width, height)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Print help for barcodez or a subcommand
    #[command(display_order = 21)]
    Help {
        /// Subcommand to get help for
        command: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn generate_alias_and_overrides() {
        let cli = parse(&["barcodez", "g", "4901234567894", "-t", "itf", "--height", "80"]);
        match cli.command {
            Some(Commands::Core(CoreCommands::Generate { value, options })) => {
                assert_eq!(value, "4901234567894");
                assert_eq!(options.symbology.as_deref(), Some("itf"));
                assert_eq!(options.height, Some(80));
                assert_eq!(options.width, None);
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn export_defaults_to_png() {
        let cli = parse(&["barcodez", "export", "2"]);
        match cli.command {
            Some(Commands::Export(ExportCommands::Export { index, format, output })) => {
                assert_eq!(index, "2");
                assert_eq!(format, "png");
                assert!(output.is_none());
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn verbose_is_global() {
        assert!(parse(&["barcodez", "list", "-v"]).verbose);
    }

    #[test]
    fn grouped_help_lists_every_command() {
        let help = get_grouped_help();
        for name in ["generate", "bulk", "list", "search", "export", "export-all", "config"] {
            assert!(help.contains(name), "missing {}", name);
        }
        assert!(help.contains("Export Commands:"));
    }
}
