use clap::{Args, Subcommand};

/// N8N commands.
#[derive(Clone, Debug, Subcommand)]
pub enum N8nCommands {
    /// Recent executions with a failure summary.
    Executions {
        #[arg(long)]
        workflow: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Set one node parameter of a workflow.
    SetParam(SetParamArgs),
}

/// Arguments for `samops n8n set-param`.
#[derive(Clone, Debug, Args)]
pub struct SetParamArgs {
    pub workflow_id: String,
    #[arg(long)]
    pub node: String,
    /// Dotted path under the node's parameters, e.g. `options.amount`.
    #[arg(long)]
    pub param: String,
    /// New value as JSON. Text that is not JSON is used as a string.
    #[arg(long)]
    pub value: String,
    #[arg(long)]
    pub confirm: bool,
}
