use super::options::AnalysisOptions;
use super::profile::AnalysisProfile;
use super::progress::ProgressReporter;
use crate::core::models::structure::Structure;

/// Shared read-only state threaded through every engine stage.
#[derive(Clone, Copy)]
pub struct AnalysisContext<'a> {
    pub structure: &'a Structure,
    pub options: &'a AnalysisOptions,
    pub reporter: &'a ProgressReporter<'a>,
    /// Optional instrumentation sink owned by the caller.
    pub profile: Option<&'a AnalysisProfile>,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(
        structure: &'a Structure,
        options: &'a AnalysisOptions,
        reporter: &'a ProgressReporter<'a>,
    ) -> Self {
        Self {
            structure,
            options,
            reporter,
            profile: None,
        }
    }

    pub fn with_profile(mut self, profile: &'a AnalysisProfile) -> Self {
        self.profile = Some(profile);
        self
    }
}
