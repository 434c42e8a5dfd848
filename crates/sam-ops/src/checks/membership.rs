//! Workspace membership audit.
//!
//! Access control keys on `workspace_members`; a missing, inactive or
//! under-privileged row is the usual cause of "access denied to workspace".
//! Findings carry hand-runnable fix SQL rather than a repair plan because
//! membership rows are inserted, not patched.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use sam_core::entities::{AuthUser, WorkspaceMember};
use sam_core::enums::{MemberStatus, Severity};
use sam_core::issues::{Issue, IssueReport};

/// Optional focus of the audit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MembershipTarget {
    pub user_email: Option<String>,
    pub workspace_id: Option<String>,
}

/// Everything the audit looks at.
#[derive(Debug, Clone, Copy)]
pub struct MembershipInput<'a> {
    pub users: &'a [AuthUser],
    pub members: &'a [WorkspaceMember],
    /// Whether the deprecated `workspace_users` table is still exposed.
    pub legacy_table_present: bool,
}

/// Single-quote a value for the generated SQL.
fn sql_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Run the audit. When the target user does not exist the report holds
/// only that finding.
#[must_use]
pub fn audit_membership(input: MembershipInput<'_>, target: &MembershipTarget) -> IssueReport {
    let mut report = IssueReport::new("Workspace membership audit");

    if let Some(email) = target.user_email.as_deref() {
        let Some(user) = input.users.iter().find(|u| u.has_email(email)) else {
            report.push(
                Issue::new(
                    Severity::Critical,
                    "target_user_missing",
                    email,
                    format!("User {email} is not in auth.users"),
                )
                .with_impact("The user cannot sign in at all"),
            );
            return report;
        };
        audit_target(&mut report, input.members, user, email, target.workspace_id.as_deref());
    }

    audit_integrity(&mut report, input);
    report.sort();
    report
}

fn audit_target(
    report: &mut IssueReport,
    members: &[WorkspaceMember],
    user: &AuthUser,
    email: &str,
    workspace_id: Option<&str>,
) {
    let own: Vec<&WorkspaceMember> = members
        .iter()
        .filter(|m| m.user_id.as_deref() == Some(user.id.as_str()))
        .collect();

    let Some(workspace_id) = workspace_id else {
        if own.is_empty() {
            report.push(Issue::new(
                Severity::High,
                "target_user_without_membership",
                email,
                format!("User {email} has no workspace memberships"),
            ));
        }
        return;
    };

    let user_sql = sql_literal(&user.id);
    let workspace_sql = sql_literal(workspace_id);
    let Some(member) = own
        .iter()
        .find(|m| m.workspace_id.as_deref() == Some(workspace_id))
    else {
        report.push(
            Issue::new(
                Severity::Critical,
                "membership_missing",
                email,
                format!("User {email} has no workspace_members row for workspace {workspace_id}"),
            )
            .with_impact("User is denied access to the workspace")
            .with_fix_sql(format!(
                "INSERT INTO workspace_members (workspace_id, user_id, role, status) VALUES ({workspace_sql}, {user_sql}, 'owner', 'active');"
            )),
        );
        return;
    };

    if member.status != MemberStatus::Active {
        report.push(
            Issue::new(
                Severity::High,
                "membership_inactive",
                email,
                format!("Membership status is '{}' instead of 'active'", member.status),
            )
            .with_impact("User may be denied access by the status check")
            .with_fix_sql(format!(
                "UPDATE workspace_members SET status = 'active' WHERE workspace_id = {workspace_sql} AND user_id = {user_sql};"
            )),
        );
    }
    if !member.role.has_full_access() {
        report.push(
            Issue::new(
                Severity::Medium,
                "membership_role_insufficient",
                email,
                format!("Membership role is '{}', not owner or admin", member.role),
            )
            .with_impact("User may not be able to create campaigns")
            .with_fix_sql(format!(
                "UPDATE workspace_members SET role = 'owner' WHERE workspace_id = {workspace_sql} AND user_id = {user_sql};"
            )),
        );
    }
}

fn audit_integrity(report: &mut IssueReport, input: MembershipInput<'_>) {
    let user_ids: HashSet<&str> = input.users.iter().map(|u| u.id.as_str()).collect();
    let mut member_user_ids = HashSet::new();
    let mut pairs: BTreeMap<(&str, &str), usize> = BTreeMap::new();

    for member in input.members {
        match (member.user_id.as_deref(), member.workspace_id.as_deref()) {
            (Some(user_id), Some(workspace_id)) => {
                member_user_ids.insert(user_id);
                *pairs.entry((user_id, workspace_id)).or_insert(0) += 1;
                if !user_ids.contains(user_id) {
                    report.push(Issue::new(
                        Severity::High,
                        "orphaned_membership",
                        &member.id,
                        format!(
                            "Membership for user {user_id} in workspace {workspace_id}, but the user is not in auth.users"
                        ),
                    ));
                }
            }
            (user_id, workspace_id) => {
                if let Some(user_id) = user_id {
                    member_user_ids.insert(user_id);
                }
                report.push(Issue::new(
                    Severity::High,
                    "membership_null_key",
                    &member.id,
                    format!(
                        "Membership has user_id={} workspace_id={}",
                        user_id.unwrap_or("NULL"),
                        workspace_id.unwrap_or("NULL")
                    ),
                ));
            }
        }
    }

    for ((user_id, workspace_id), count) in pairs {
        if count > 1 {
            report.push(Issue::new(
                Severity::Medium,
                "duplicate_membership",
                user_id,
                format!("{count} membership rows for workspace {workspace_id}"),
            ));
        }
    }

    for user in input.users {
        if !member_user_ids.contains(user.id.as_str()) {
            report.push(Issue::new(
                Severity::Low,
                "user_without_membership",
                user.email.as_deref().unwrap_or(&user.id),
                format!("User {} belongs to no workspace", user.id),
            ));
        }
    }

    if input.legacy_table_present {
        report.push(
            Issue::new(
                Severity::Low,
                "deprecated_table_present",
                "workspace_users",
                "Deprecated workspace_users table is still exposed",
            )
            .with_impact("Code reading it instead of workspace_members sees stale access"),
        );
    }
}
