use sam_core::enums::Severity;
use sam_core::issues::IssueReport;

use crate::cli::GlobalFlags;

/// How a command that ran to completion should exit.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Verdict {
    #[default]
    Pass,
    /// A report reached the `--fail-on` threshold.
    Threshold(Severity),
}

impl Verdict {
    /// Compare `report` against `--fail-on`.
    #[must_use]
    pub fn of(report: &IssueReport, flags: &GlobalFlags) -> Self {
        match (flags.fail_on, report.max_severity()) {
            (Some(threshold), Some(max)) if max >= threshold => Self::Threshold(max),
            _ => Self::Pass,
        }
    }

    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Pass => 0,
            Self::Threshold(_) => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use sam_core::enums::Severity;
    use sam_core::issues::{Issue, IssueReport};

    use super::Verdict;
    use crate::cli::{ColorMode, GlobalFlags, OutputFormat};

    fn flags(fail_on: Option<Severity>) -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Json,
            limit: None,
            quiet: false,
            color: ColorMode::Never,
            fail_on,
        }
    }

    fn report(severity: Option<Severity>) -> IssueReport {
        let mut report = IssueReport::new("test");
        if let Some(severity) = severity {
            report.push(Issue::new(severity, "code", "subject", "description"));
        }
        report
    }

    #[rstest]
    #[case::no_threshold(None, Some(Severity::Critical), Verdict::Pass)]
    #[case::clean_report(Some(Severity::Info), None, Verdict::Pass)]
    #[case::below(Some(Severity::High), Some(Severity::Medium), Verdict::Pass)]
    #[case::equal(Some(Severity::High), Some(Severity::High), Verdict::Threshold(Severity::High))]
    #[case::above(Some(Severity::Low), Some(Severity::Critical), Verdict::Threshold(Severity::Critical))]
    fn thresholds(#[case] fail_on: Option<Severity>, #[case] found: Option<Severity>, #[case] expected: Verdict) {
        assert_eq!(Verdict::of(&report(found), &flags(fail_on)), expected);
    }

    #[test]
    fn exit_codes() {
        assert_eq!(Verdict::Pass.exit_code(), 0);
        assert_eq!(Verdict::Threshold(Severity::Low).exit_code(), 2);
    }
}
