use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{ColorMode, FailOn, GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `samops` binary.
#[derive(Debug, Parser)]
#[command(
    name = "samops",
    version,
    about = "SAM operations - consistency checks, repairs and campaign launches"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Table colors: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorMode,

    /// Exit with status 2 when a report has an issue at or above this severity
    #[arg(long, global = true)]
    pub fail_on: Option<FailOn>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            color: self.color,
            fail_on: self.fail_on.map(Into::into),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use sam_core::enums::Severity;

    use super::subcommands::{CampaignCommands, CheckCommands, N8nCommands, UnipileCommands};
    use super::{Cli, ColorMode, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_to_table_output() {
        let cli = Cli::try_parse_from(["samops", "classify", "weekly limit"]).expect("cli should parse");
        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.color, ColorMode::Auto);
        assert!(cli.fail_on.is_none());
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "samops",
            "--format",
            "json",
            "--limit",
            "10",
            "--verbose",
            "--fail-on",
            "high",
            "check",
            "drafts",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.limit, Some(10));
        assert!(cli.verbose);
        assert_eq!(cli.global_flags().fail_on, Some(Severity::High));
        assert!(matches!(
            cli.command,
            Commands::Check {
                action: CheckCommands::Drafts { .. }
            }
        ));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["samops", "unipile", "accounts", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
        assert!(matches!(
            cli.command,
            Commands::Unipile {
                action: UnipileCommands::Accounts
            }
        ));
    }

    #[rstest]
    #[case::format(&["samops", "--format", "xml", "classify", "x"])]
    #[case::fail_on(&["samops", "--fail-on", "severe", "classify", "x"])]
    #[case::queue_needs_campaign(&["samops", "check", "queue"])]
    #[case::accounts_need_workspace(&["samops", "check", "accounts"])]
    #[case::set_param_needs_value(&["samops", "n8n", "set-param", "wf-1", "--node", "Wait", "--param", "amount"])]
    #[case::slug_needs_input(&["samops", "linkedin", "slug"])]
    fn rejects_invalid_invocations(#[case] argv: &[&str]) {
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn confirm_defaults_to_false() {
        let cli = Cli::try_parse_from(["samops", "check", "queue", "--campaign", "cmp-1"])
            .expect("cli should parse");
        let Commands::Check {
            action: CheckCommands::Queue { campaign, confirm },
        } = cli.command
        else {
            panic!("expected check queue");
        };
        assert_eq!(campaign, "cmp-1");
        assert!(!confirm);
    }

    #[test]
    fn launch_overrides_parse() {
        let cli = Cli::try_parse_from([
            "samops",
            "campaign",
            "launch",
            "cmp-1",
            "--batch-size",
            "3",
            "--batch-delay-secs",
            "0",
            "--limit",
            "9",
            "--confirm",
        ])
        .expect("cli should parse");
        let Commands::Campaign {
            action: CampaignCommands::Launch(args),
        } = cli.command
        else {
            panic!("expected campaign launch");
        };
        assert_eq!(args.campaign_id, "cmp-1");
        assert_eq!(args.batch_size, Some(3));
        assert_eq!(args.batch_delay_secs, Some(0));
        assert_eq!(args.limit, Some(9));
        assert!(args.confirm);
    }

    #[test]
    fn diagnose_collects_repeated_profiles() {
        let cli = Cli::try_parse_from([
            "samops",
            "unipile",
            "diagnose",
            "acc-1",
            "--profile",
            "https://www.linkedin.com/in/ada/",
            "--profile",
            "grace",
        ])
        .expect("cli should parse");
        let Commands::Unipile {
            action: UnipileCommands::Diagnose { account_id, profiles },
        } = cli.command
        else {
            panic!("expected unipile diagnose");
        };
        assert_eq!(account_id, "acc-1");
        assert_eq!(profiles, vec!["https://www.linkedin.com/in/ada/", "grace"]);
    }

    #[test]
    fn set_param_takes_json_value_text() {
        let cli = Cli::try_parse_from([
            "samops", "n8n", "set-param", "wf-1", "--node", "Wait", "--param", "options.amount", "--value",
            "{\"days\": 2}",
        ])
        .expect("cli should parse");
        let Commands::N8n {
            action: N8nCommands::SetParam(args),
        } = cli.command
        else {
            panic!("expected n8n set-param");
        };
        assert_eq!(args.param, "options.amount");
        assert_eq!(args.value, "{\"days\": 2}");
        assert!(!args.confirm);
    }
}
