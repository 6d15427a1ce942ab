//! Optional TOML configuration, merged with CLI overrides.
//!
//! The file carries the recognised analysis options plus arbitrary extra
//! keys; extras survive verbatim into the JSON record's `options` block.

use crate::cli::{AnnotateArgs, CifIdsArg};
use crate::error::{CliError, Result};
use pairview::core::io::mmcif::IdScheme;
use pairview::engine::options::AnalysisOptions;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct PartialOptions {
    pub chain_filter: Option<Vec<String>>,
    pub cif_ids: Option<String>,
    pub nmr_model: Option<usize>,
    pub chain_id_truncate: Option<bool>,
    pub resolution_max: Option<f64>,
    /// Unrecognised keys, preserved for the JSON record.
    #[serde(flatten)]
    pub extra: BTreeMap<String, toml::Value>,
}

impl PartialOptions {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(CliError::Io)?;
        let parsed: PartialOptions = toml::from_str(&content)
            .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), "configuration file loaded");
        Ok(parsed)
    }

    /// CLI arguments win over file values.
    pub fn merge_with_cli(self, args: &AnnotateArgs) -> Result<AnalysisOptions> {
        let chain_filter = if !args.chains.is_empty() {
            Some(args.chains.iter().cloned().collect())
        } else {
            self.chain_filter
                .map(|chains| chains.into_iter().collect())
        };

        let cif_ids = match args.cif_ids {
            Some(CifIdsArg::Auth) => IdScheme::Auth,
            Some(CifIdsArg::Label) => IdScheme::Label,
            None => match self.cif_ids.as_deref() {
                Some("auth") | None => IdScheme::Auth,
                Some("label") => IdScheme::Label,
                Some(other) => {
                    return Err(CliError::Config(format!(
                        "cif-ids must be 'auth' or 'label', got '{other}'"
                    )));
                }
            },
        };

        let extra = self
            .extra
            .into_iter()
            .filter_map(|(key, value)| {
                serde_json::to_value(value).ok().map(|json| (key, json))
            })
            .collect();

        Ok(AnalysisOptions {
            chain_filter,
            cif_ids,
            nmr_model: args.nmr_model.or(self.nmr_model),
            chain_id_truncate: args.chain_id_truncate || self.chain_id_truncate.unwrap_or(false),
            resolution_max: args.resolution_max.or(self.resolution_max),
            extra,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: AnnotateArgs,
    }

    fn args_from(argv: &[&str]) -> AnnotateArgs {
        Harness::parse_from(argv).args
    }

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn file_values_apply_when_cli_is_silent() {
        let file = config_file(
            r#"
chain-filter = ["A", "B"]
cif-ids = "label"
nmr-model = 3
chain-id-truncate = true
"#,
        );
        let partial = PartialOptions::from_file(file.path()).unwrap();
        let options = partial
            .merge_with_cli(&args_from(&["test", "in.pdb"]))
            .unwrap();

        assert_eq!(options.chain_filter.as_ref().unwrap().len(), 2);
        assert_eq!(options.cif_ids, IdScheme::Label);
        assert_eq!(options.nmr_model, Some(3));
        assert!(options.chain_id_truncate);
    }

    #[test]
    fn cli_overrides_file_values() {
        let file = config_file("nmr-model = 3\ncif-ids = \"label\"\n");
        let partial = PartialOptions::from_file(file.path()).unwrap();
        let options = partial
            .merge_with_cli(&args_from(&[
                "test", "in.pdb", "--nmr-model", "5", "--cif-ids", "auth", "--chain", "C",
            ]))
            .unwrap();

        assert_eq!(options.nmr_model, Some(5));
        assert_eq!(options.cif_ids, IdScheme::Auth);
        assert!(options.chain_filter.unwrap().contains("C"));
    }

    #[test]
    fn unknown_keys_pass_through_to_extra() {
        let file = config_file("render-mode = \"ps\"\n");
        let partial = PartialOptions::from_file(file.path()).unwrap();
        assert!(partial.extra.contains_key("render-mode"));
        let options = partial
            .merge_with_cli(&args_from(&["test", "in.pdb"]))
            .unwrap();
        assert_eq!(
            options.extra.get("render-mode").and_then(|v| v.as_str()),
            Some("ps")
        );
    }

    #[test]
    fn invalid_cif_ids_is_a_config_error() {
        let file = config_file("cif-ids = \"banana\"\n");
        let partial = PartialOptions::from_file(file.path()).unwrap();
        let result = partial.merge_with_cli(&args_from(&["test", "in.pdb"]));
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
