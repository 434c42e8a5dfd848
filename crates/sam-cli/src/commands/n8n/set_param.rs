use anyhow::Context;
use sam_ops::executions::NodeEdit;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SetParamArgs;
use crate::commands::shared::value::parse_json_or_string;
use crate::commands::shared::verdict::Verdict;
use crate::context::AppContext;
use crate::output::{cell, output_with};

pub async fn run(args: &SetParamArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<Verdict> {
    let value = parse_json_or_string(&args.value);
    let edit = ctx
        .service
        .set_node_param(&args.workflow_id, &args.node, &args.param, value, args.confirm)
        .await
        .with_context(|| format!("failed to edit workflow {}", args.workflow_id))?;

    output_with(&edit, flags.format, |edit, _| Ok(describe(edit)))?;
    Ok(Verdict::Pass)
}

fn describe(edit: &NodeEdit) -> String {
    let previous = edit
        .previous
        .as_ref()
        .map_or_else(|| String::from("(unset)"), cell);
    let change = format!(
        "{} ({}) node '{}': {} {previous} -> {}",
        edit.workflow_name,
        edit.workflow_id,
        edit.node,
        edit.path,
        cell(&edit.value)
    );
    if edit.applied {
        format!("{change}\nworkflow updated")
    } else {
        format!("{change}\ndry run: workflow not updated, rerun with --confirm to save")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sam_ops::executions::NodeEdit;
    use serde_json::json;

    use super::describe;

    #[test]
    fn preview_shows_old_and_new_value() {
        let edit = NodeEdit {
            workflow_id: "wf-1".into(),
            workflow_name: "Connector".into(),
            node: "Wait".into(),
            path: "amount".into(),
            previous: Some(json!(2)),
            value: json!(5),
            applied: false,
        };
        assert_eq!(
            describe(&edit),
            "Connector (wf-1) node 'Wait': amount 2 -> 5\ndry run: workflow not updated, rerun with --confirm to save"
        );
    }

    #[test]
    fn applied_edit_of_new_key() {
        let edit = NodeEdit {
            workflow_id: "wf-1".into(),
            workflow_name: "Connector".into(),
            node: "Wait".into(),
            path: "options.resume".into(),
            previous: None,
            value: json!("webhook"),
            applied: true,
        };
        assert!(describe(&edit).ends_with("options.resume (unset) -> webhook\nworkflow updated"));
    }
}
