use crate::cli::{AnnotateArgs, EmitFormat};
use crate::config::PartialOptions;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use pairview::core::io::mmcif::{MmcifFile, MmcifReadOptions};
use pairview::core::io::pdb::{PdbFile, PdbReadOptions};
use pairview::core::io::traits::StructureFile;
use pairview::core::io::InputFormat;
use pairview::core::models::structure::Structure;
use pairview::engine::options::AnalysisOptions;
use pairview::engine::profile::AnalysisProfile;
use pairview::engine::progress::ProgressReporter;
use pairview::engine::records::AnalysisRecord;
use pairview::report::json::{self, Source};
use pairview::report::text::{self, TextReportOptions};
use pairview::workflows;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub fn run(args: AnnotateArgs) -> Result<()> {
    let partial = match &args.config {
        Some(path) => PartialOptions::from_file(path)?,
        None => PartialOptions::default(),
    };
    let options = partial.merge_with_cli(&args)?;

    if let Some(output) = &args.output {
        std::fs::create_dir_all(output)?;
    }

    if args.inputs.len() == 1 {
        annotate_one(&args.inputs[0], &args, &options, true)?;
        return Ok(());
    }

    // Batch mode: the engine is deterministic per structure, so inputs fan
    // out across workers with no shared state.
    info!(inputs = args.inputs.len(), "starting batch annotation");
    let failures: Vec<(PathBuf, CliError)> = args
        .inputs
        .par_iter()
        .filter_map(|input| {
            annotate_one(input, &args, &options, false)
                .err()
                .map(|error| (input.clone(), error))
        })
        .collect();

    for (input, error) in &failures {
        warn!(input = %input.display(), %error, "input failed");
    }
    if failures.is_empty() {
        println!("Batch complete: {} input(s) annotated.", args.inputs.len());
        Ok(())
    } else {
        Err(CliError::Argument(format!(
            "{} of {} inputs failed; see the log for details",
            failures.len(),
            args.inputs.len()
        )))
    }
}

fn annotate_one(
    input: &Path,
    args: &AnnotateArgs,
    options: &AnalysisOptions,
    interactive: bool,
) -> Result<()> {
    let format = InputFormat::from_path(input).ok_or_else(|| {
        CliError::Argument(format!(
            "cannot infer the input format of '{}'; expected a .pdb/.ent or .cif extension",
            input.display()
        ))
    })?;

    let structure = read_structure(input, format, options)?;
    info!(
        input = %input.display(),
        atoms = structure.atoms().len(),
        residues = structure.residues().len(),
        "structure loaded"
    );

    let handler = interactive.then(CliProgressHandler::new);
    let reporter = match &handler {
        Some(handler) => ProgressReporter::with_callback(handler.get_callback()),
        None => ProgressReporter::new(),
    };

    let record = if args.profile {
        let profile = AnalysisProfile::new();
        let record = workflows::annotate::run_profiled(&structure, options, &reporter, &profile)?;
        let snapshot = profile.snapshot();
        info!(
            candidate_pairs = snapshot.candidate_pairs,
            pair_checks = snapshot.pair_checks,
            stack_checks = snapshot.stack_checks,
            hbond_enumerations = snapshot.hbond_enumerations,
            lw_classifications = snapshot.lw_classifications,
            best_pair_checks = snapshot.best_pair_checks,
            skipped_residues = snapshot.skipped_residues,
            "engine counters"
        );
        record
    } else {
        workflows::annotate::run(&structure, options, &reporter)?
    };

    write_outputs(input, format, &structure, &record, args, options)?;

    if interactive {
        println!(
            "{}: {} base pairs from {} bases, {} multiplet(s).",
            input.display(),
            record.stats.total_pairs,
            record.stats.total_bases,
            record.multiplets.len()
        );
    }
    Ok(())
}

fn read_structure(
    input: &Path,
    format: InputFormat,
    options: &AnalysisOptions,
) -> Result<Structure> {
    let wrap = |source: anyhow::Error| CliError::FileParsing {
        path: input.to_path_buf(),
        source,
    };
    match format {
        InputFormat::Pdb => {
            let read_options = PdbReadOptions {
                model: options.nmr_model,
            };
            PdbFile::read_from_path(input, &read_options).map_err(|e| wrap(e.into()))
        }
        InputFormat::Mmcif => {
            let read_options = MmcifReadOptions {
                id_scheme: options.cif_ids,
                model: options.nmr_model,
            };
            MmcifFile::read_from_path(input, &read_options).map_err(|e| wrap(e.into()))
        }
    }
}

fn output_path(input: &Path, output_dir: Option<&Path>, suffix: &str) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "structure".to_string());
    let target = format!("{file_name}{suffix}");
    match output_dir {
        Some(dir) => dir.join(target),
        None => input.with_file_name(target),
    }
}

fn write_outputs(
    input: &Path,
    format: InputFormat,
    structure: &Structure,
    record: &AnalysisRecord,
    args: &AnnotateArgs,
    options: &AnalysisOptions,
) -> Result<()> {
    let output_dir = args.output.as_deref();

    if matches!(args.emit, EmitFormat::Text | EmitFormat::Both) {
        let text_options = TextReportOptions {
            include_preamble: args.preamble,
            source_name: input
                .file_name()
                .map(|name| name.to_string_lossy().to_string()),
        };
        let path = output_path(input, output_dir, ".out");
        std::fs::write(&path, text::write_text(record, &text_options))?;
        info!(path = %path.display(), "text record written");
    }

    if matches!(args.emit, EmitFormat::Json | EmitFormat::Both) {
        let source = Source {
            path: input.to_string_lossy().to_string(),
            format: format.as_str().to_string(),
            id_scheme: matches!(format, InputFormat::Mmcif)
                .then(|| options.cif_ids.as_str().to_string()),
            model: Some(structure.model as u32),
        };
        let document = json::document(record, Some(source), options);
        let path = output_path(input, output_dir, ".pairs.json");
        std::fs::write(
            &path,
            json::write_json(&document).map_err(|e| CliError::Other(e.into()))?,
        )?;
        info!(path = %path.display(), "json record written");
    }
    Ok(())
}
