//! The legacy text record: core `.out` sections with fixed field widths.

use crate::core::models::pairing::{PairKind, Saenger};
use crate::core::models::residue::ResidueId;
use crate::core::tables::thresholds::CRITERIA;
use crate::engine::records::{AnalysisRecord, PairRecord};
use std::fmt::Write;

/// Options for the text surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextReportOptions {
    /// Emit the input-name line, `uncommon` lines and the CRITERIA block
    /// ahead of the record sections.
    pub include_preamble: bool,
    /// Input name echoed in the preamble's first line.
    pub source_name: Option<String>,
}

/// The 13 statistics bins of the legacy table, in table order.
pub const STAT_KEYS_ROW1: [&str; 7] = [
    "Standard", "WW--cis", "WW-tran", "HH--cis", "HH-tran", "SS--cis", "SS-tran",
];
pub const STAT_KEYS_ROW2: [&str; 6] = [
    "WH--cis", "WH-tran", "WS--cis", "WS-tran", "HS--cis", "HS-tran",
];

const SECTION_SEPARATOR: &str = "-----------------------------------------------------------";
const STATS_SEPARATOR: &str = "------------------------------------------------";

/// Residue-number field: the underscore form only when an insertion code is
/// present.
fn resseq_field(id: &ResidueId) -> String {
    match id.icode {
        Some(icode) => format!("{}_{}", id.resseq, icode),
        None => id.resseq.to_string(),
    }
}

fn syn_field(syn: bool) -> &'static str {
    if syn { "syn " } else { "  " }
}

/// One record line in the legacy fixed-width grammar.
pub fn format_record_line(record: &PairRecord) -> String {
    let work_num = format!("{}_{}", record.i, record.j);
    let head = format!(
        "{work_num:>9}, {chain_i}: {resseq_i:>5} {base_i}-{base_j} {resseq_j:>5} {chain_j}:",
        chain_i = record.id_i.chain_char(),
        resseq_i = resseq_field(&record.id_i),
        base_i = record.base_i,
        base_j = record.base_j,
        resseq_j = resseq_field(&record.id_j),
        chain_j = record.id_j.chain_char(),
    );

    match record.kind {
        PairKind::Stacked => format!(
            "{head} {syn_i}{syn_j} stacked",
            syn_i = syn_field(record.syn_i),
            syn_j = syn_field(record.syn_j),
        ),
        PairKind::Pair => {
            let type_field = format!(
                "{}{}",
                record
                    .lw
                    .map(|lw| lw.to_string())
                    .unwrap_or_else(|| "?/?".to_string()),
                record
                    .orientation
                    .map(|o| format!(" {}", o.legacy()))
                    .unwrap_or_default(),
            );
            let tail = record
                .note
                .clone()
                .or_else(|| record.saenger.map(|s| s.to_string()))
                .unwrap_or_else(|| Saenger::NotApplicable.to_string());
            // The type column is eight wide; "+/+ cis" carries a trailing
            // pad, "W/W tran" fills it exactly.
            format!(
                "{head} {type_field:<8}   {syn_i}{syn_j} {tail}",
                syn_i = syn_field(record.syn_i),
                syn_j = syn_field(record.syn_j),
            )
        }
        PairKind::Unknown => {
            let tail = record.note.clone().unwrap_or_default();
            format!(
                "{head} {type_field:<8}   {syn_i}{syn_j} {tail}",
                type_field = "?/?",
                syn_i = syn_field(record.syn_i),
                syn_j = syn_field(record.syn_j),
            )
        }
    }
}

fn write_preamble(out: &mut String, record: &AnalysisRecord, options: &TextReportOptions) {
    let name = options.source_name.as_deref().unwrap_or("");
    let _ = writeln!(out, "PDB data file name: {name}");

    for base in &record.bases {
        if base.code.is_modified() {
            let _ = writeln!(
                out,
                "uncommon {resname:>3} {resseq:>4} on chain {chain} [#{index}] assigned to: {letter}",
                resname = base.resname,
                resseq = base.id.resseq,
                chain = base.id.chain_char(),
                index = base.index,
                letter = base.code,
            );
        }
    }

    let _ = writeln!(out, "{SECTION_SEPARATOR}");
    let _ = writeln!(out, "CRITERIA USED TO GENERATE BASE-PAIR: ");
    let _ = writeln!(
        out,
        "{:6.2} --> upper H-bond length limits (ON..ON).",
        CRITERIA.hb_dist_max
    );
    let _ = writeln!(
        out,
        "{:6.2} --> max. distance between paired base origins.",
        CRITERIA.origin_dist_max
    );
    let _ = writeln!(
        out,
        "{:6.2} --> max. vertical distance between paired base origins.",
        CRITERIA.vertical_dist_max
    );
    let _ = writeln!(
        out,
        "{:6.2} --> max. angle between paired bases [0-90].",
        CRITERIA.plane_angle_max_deg
    );
    let _ = writeln!(
        out,
        "{:6.2} --> min. distance between RN9/YN1 atoms.",
        CRITERIA.glyco_n_dist_min
    );
    let _ = writeln!(
        out,
        "{:6.2} --> max. distance criterion for helix break[0-12]",
        CRITERIA.helix_break_max
    );
    let _ = writeln!(out, "{SECTION_SEPARATOR}");
}

/// Render the full text record.
pub fn write_text(record: &AnalysisRecord, options: &TextReportOptions) -> String {
    let mut out = String::new();

    if options.include_preamble {
        write_preamble(&mut out, record, options);
    }

    out.push_str("BEGIN_base-pair\n");
    for pair in &record.base_pairs {
        out.push_str(&format_record_line(pair));
        out.push('\n');
    }
    out.push_str("END_base-pair\n");
    out.push('\n');

    out.push_str("Summary of triplets and higher multiplets\n");
    out.push_str("BEGIN_multiplets\n");
    for multiplet in &record.multiplets {
        let indices = multiplet
            .indices
            .iter()
            .map(|index| index.to_string())
            .collect::<Vec<_>>()
            .join("_");
        let _ = writeln!(out, "{indices}_| {}", multiplet.text);
    }
    out.push_str("END_multiplets\n");
    out.push('\n');

    let _ = writeln!(
        out,
        "  The total base pairs ={total_pairs:4} (from {total_bases:4} bases)",
        total_pairs = record.stats.total_pairs,
        total_bases = record.stats.total_bases,
    );
    out.push_str(STATS_SEPARATOR);
    out.push('\n');

    let count = |key: &str| -> u64 {
        record
            .stats
            .pair_type_counts
            .get(key)
            .copied()
            .unwrap_or(0)
    };
    let _ = writeln!(out, " Standard  WW--cis  WW-tran  HH--cis  HH-tran  SS--cis  SS-tran");
    for key in STAT_KEYS_ROW1 {
        let _ = write!(out, "{:9}", count(key));
    }
    out.push('\n');
    let _ = writeln!(out, "  WH--cis  WH-tran  WS--cis  WS-tran  HS--cis  HS-tran");
    for key in STAT_KEYS_ROW2 {
        let _ = write!(out, "{:9}", count(key));
    }
    out.push('\n');
    out.push_str(STATS_SEPARATOR);
    out.push('\n');

    out
}
