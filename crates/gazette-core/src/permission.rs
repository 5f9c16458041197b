//! The permission model: which role may perform which operation.
//!
//! Every rule lives in this module. Functions here are pure and perform no
//! I/O; identity checks against an article's author happen in
//! [`crate::workflow`], which has the article at hand.

use crate::{actor::Role, article::Status, workflow::{self, Transition}};

/// Roles authorised for `transition`, besides [`Role::SuperAdmin`] which is
/// authorised for all of them.
pub fn authorized_roles(transition: Transition) -> &'static [Role] {
  match transition {
    Transition::Submit
    | Transition::ReviseSave
    | Transition::Resubmit
    | Transition::Edit
    | Transition::Delete => &[Role::Editor],
    Transition::Approve | Transition::Reject => &[Role::Publisher],
    Transition::Archive | Transition::Unarchive => &[Role::Editor, Role::Publisher],
  }
}

fn role_may(role: Role, transition: Transition) -> bool {
  role == Role::SuperAdmin || authorized_roles(transition).contains(&role)
}

/// May `role` attempt `transition` on an article currently in `from`?
///
/// `true` when the role is authorised and `from` is either the transition's
/// source or one edge downstream of it. The downstream case is a lost race or
/// a replay and fails later as a conflict; any other state means the edge
/// does not exist for this article and is refused outright.
pub fn can_transition(role: Role, from: Status, transition: Transition) -> bool {
  let source = transition.source();
  role_may(role, transition)
    && (from == source || workflow::successors(source).any(|s| s == from))
}

/// May `role` create articles it will own?
pub fn can_author(role: Role) -> bool { matches!(role, Role::Editor | Role::SuperAdmin) }

/// May `role` create, edit, publish or delete editions?
pub fn can_manage_editions(role: Role) -> bool {
  matches!(role, Role::Editor | Role::Publisher | Role::Admin | Role::SuperAdmin)
}

/// May `role` read articles and review notes outside the published view?
pub fn can_view_workflow(role: Role) -> bool { role != Role::Customer }
