use crate::core::models::structure::Structure;
use crate::engine::candidates::Candidate;
use crate::engine::context::AnalysisContext;
use crate::engine::error::EngineError;
use crate::engine::options::AnalysisOptions;
use crate::engine::profile::{AnalysisProfile, bump};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::records::AnalysisRecord;
use crate::engine::reduce::{RawVerdict, Verdict};
use crate::engine::{bases, candidates, classify, frames, hbonds, multiplets, reduce, stacking, stats};
use tracing::{info, instrument, warn};

/// Run the full annotation of one structure.
///
/// The engine owns nothing and suspends nowhere: one invocation runs to
/// completion and every byte of the result is a deterministic function of
/// the structure and the options.
#[instrument(skip_all, name = "annotate_workflow")]
pub fn run(
    structure: &Structure,
    options: &AnalysisOptions,
    reporter: &ProgressReporter,
) -> Result<AnalysisRecord, EngineError> {
    let ctx = AnalysisContext::new(structure, options, reporter);
    run_with_context(ctx)
}

/// Like [`run`], with an instrumentation sink attached.
pub fn run_profiled(
    structure: &Structure,
    options: &AnalysisOptions,
    reporter: &ProgressReporter,
    profile: &AnalysisProfile,
) -> Result<AnalysisRecord, EngineError> {
    let ctx = AnalysisContext::new(structure, options, reporter).with_profile(profile);
    run_with_context(ctx)
}

fn run_with_context(ctx: AnalysisContext<'_>) -> Result<AnalysisRecord, EngineError> {
    // --- Phase 1: base recognition ---
    ctx.reporter.report(Progress::PhaseStart {
        name: "Base recognition",
    });
    let mut base_table = bases::run(&ctx);
    ctx.reporter.report(Progress::PhaseFinish);

    if base_table.is_empty() {
        // A structure with nothing to analyse is a well-defined empty
        // result, not an error.
        warn!("no recognised bases; returning the empty record set");
        return Ok(AnalysisRecord {
            stats: stats::collect(&[], 0),
            ..AnalysisRecord::default()
        });
    }

    // --- Phase 2: reference frames ---
    ctx.reporter.report(Progress::PhaseStart { name: "Frames" });
    let frame_table = frames::run(&ctx, &mut base_table);
    ctx.reporter.report(Progress::PhaseFinish);

    // --- Phase 3: candidate filter ---
    ctx.reporter.report(Progress::PhaseStart {
        name: "Candidate filter",
    });
    let candidate_pairs = candidates::run(&ctx, &base_table, &frame_table);
    ctx.reporter.report(Progress::PhaseFinish);

    // --- Phase 4: pair detection ---
    ctx.reporter.report(Progress::PhaseStart {
        name: "Pair detection",
    });
    ctx.reporter.report(Progress::TaskStart {
        total_steps: candidate_pairs.len() as u64,
    });
    let mut verdicts: Vec<RawVerdict> = Vec::new();
    for candidate in &candidate_pairs {
        if let Some(verdict) = judge(&ctx, candidate, &base_table, &frame_table) {
            verdicts.push(verdict);
        }
        ctx.reporter.report(Progress::TaskIncrement);
    }
    ctx.reporter.report(Progress::TaskFinish);
    ctx.reporter.report(Progress::PhaseFinish);

    // --- Phase 5: reduction and derived record sets ---
    ctx.reporter.report(Progress::PhaseStart {
        name: "Finalization",
    });
    let base_pairs = reduce::finalize(&ctx, &base_table, verdicts)?;
    let multiplets = multiplets::derive(&base_pairs);
    let stats = stats::collect(&base_pairs, base_table.len());
    ctx.reporter.report(Progress::PhaseFinish);

    info!(
        total_bases = stats.total_bases,
        total_pairs = stats.total_pairs,
        multiplets = multiplets.len(),
        "annotation complete"
    );

    Ok(AnalysisRecord {
        bases: base_table.bases.iter().map(|b| b.summary()).collect(),
        base_pairs,
        multiplets,
        stats,
    })
}

/// The decision hierarchy for one candidate: hydrogen-bonded pairing first,
/// stacking only when pairing yields nothing.
fn judge(
    ctx: &AnalysisContext<'_>,
    candidate: &Candidate,
    base_table: &bases::BaseTable,
    frame_table: &frames::FrameTable,
) -> Option<RawVerdict> {
    let base_i = &base_table.bases[candidate.i];
    let base_j = &base_table.bases[candidate.j];

    if candidate.pairing {
        bump(ctx.profile, |p| &p.pair_checks);
        let bonds = hbonds::enumerate(ctx, base_i, base_j);
        if !bonds.is_empty() {
            let frame_i = frame_table.get(candidate.i)?;
            let frame_j = frame_table.get(candidate.j)?;
            return Some(match classify::classify(ctx, base_i, base_j, frame_i, frame_j, &bonds) {
                Some(class) => RawVerdict {
                    i: candidate.i,
                    j: candidate.j,
                    verdict: Verdict::Pair { class, bonds },
                },
                None => RawVerdict {
                    i: candidate.i,
                    j: candidate.j,
                    verdict: Verdict::Unknown {
                        descriptor: format!(
                            "{} bond(s), no classifiable edge",
                            bonds.total()
                        ),
                    },
                },
            });
        }
    }

    if candidate.stacking && stacking::is_stacked(ctx, candidate, frame_table) {
        return Some(RawVerdict {
            i: candidate.i,
            j: candidate.j,
            verdict: Verdict::Stacked,
        });
    }
    None
}
