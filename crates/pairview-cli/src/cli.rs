use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const ABOUT: &str = "pairview - an annotator for hydrogen-bonded base pairs, base stacks and higher-order multiplets in RNA/DNA tertiary structures, classified in the Leontis-Westhof scheme with Saenger correspondence.";
const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = ABOUT,
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for batch processing.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Annotate base pairs, stacks and multiplets in one or more structures.
    Annotate(AnnotateArgs),
}

/// Output surfaces to write per input.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmitFormat {
    Text,
    Json,
    #[default]
    Both,
}

/// mmCIF identifier scheme selection.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CifIdsArg {
    Auth,
    Label,
}

/// Arguments for the `annotate` subcommand.
#[derive(Args, Debug)]
pub struct AnnotateArgs {
    /// Input structure files (PDB or mmCIF; format sniffed from extension).
    #[arg(required = true, value_name = "PATH", num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Directory for the output record files.
    ///
    /// Each input produces `<name>.out` (text record) and/or
    /// `<name>.pairs.json` next to the input unless this directory is given.
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Which record surfaces to write.
    #[arg(long, value_enum, default_value_t = EmitFormat::Both)]
    pub emit: EmitFormat,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Include the criteria preamble in the text record.
    #[arg(long)]
    pub preamble: bool,

    // --- Analysis option overrides ---
    /// Restrict the analysis to the given chain identifier.
    /// Can be used multiple times.
    #[arg(long = "chain", value_name = "ID")]
    pub chains: Vec<String>,

    /// Identifier scheme for mmCIF inputs.
    #[arg(long, value_enum, value_name = "SCHEME")]
    pub cif_ids: Option<CifIdsArg>,

    /// Analyse the given model of a multi-model (NMR) input.
    #[arg(long, value_name = "N")]
    pub nmr_model: Option<usize>,

    /// Legacy compatibility: truncate chain identifiers to one character.
    #[arg(long)]
    pub chain_id_truncate: bool,

    /// Record the upstream resolution cutoff in the JSON options block.
    #[arg(long, value_name = "ANGSTROM")]
    pub resolution_max: Option<f64>,

    /// Log the engine's instrumentation counters after each analysis.
    #[arg(long)]
    pub profile: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_parsing() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_annotate_args_parsing() {
        let args = [
            "pairview",
            "annotate",
            "tr0001.pdb",
            "pdb1nvy.pdb",
            "-o",
            "out",
            "--emit",
            "json",
            "--chain",
            "A",
            "--chain",
            "B",
            "--cif-ids",
            "label",
            "--nmr-model",
            "2",
            "--chain-id-truncate",
        ];
        let cli = Cli::parse_from(args);
        match cli.command {
            Commands::Annotate(annotate_args) => {
                assert_eq!(annotate_args.inputs.len(), 2);
                assert_eq!(annotate_args.output, Some(PathBuf::from("out")));
                assert_eq!(annotate_args.emit, EmitFormat::Json);
                assert_eq!(annotate_args.chains, vec!["A", "B"]);
                assert_eq!(annotate_args.cif_ids, Some(CifIdsArg::Label));
                assert_eq!(annotate_args.nmr_model, Some(2));
                assert!(annotate_args.chain_id_truncate);
                assert!(!annotate_args.profile);
            }
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let args = ["pairview", "annotate", "x.pdb", "-q", "-v"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_inputs_are_required() {
        let args = ["pairview", "annotate"];
        assert!(Cli::try_parse_from(args).is_err());
    }
}
