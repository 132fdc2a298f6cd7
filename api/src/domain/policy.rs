//! Access policy
//!
//! Decides whether an actor may perform an action on a resource. Each
//! evaluation is a pure function of `(actor, action, gate, resource)`.
//! Every path that is not an explicit allow is a deny.

use serde::Serialize;

use super::entities::{Actor, Role, UserId};

/// What a request wants to do to a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

impl Action {
    /// Safe actions never change state and never need elevated privilege
    pub fn is_safe(self) -> bool {
        matches!(self, Action::Read)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Create => write!(f, "create"),
            Action::Read => write!(f, "read"),
            Action::Update => write!(f, "update"),
            Action::Delete => write!(f, "delete"),
        }
    }
}

/// The rule set guarding a family of resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gate {
    /// Only admins, for every action (user management)
    AdminOnly,
    /// Anyone may read; only admins may write (titles, categories, genres)
    AdminOrReadOnly,
    /// Authors, moderators and admins may change an object (reviews, comments)
    AuthorOrStaff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        self == Decision::Allow
    }
}

/// Objects owned by a single user
pub trait Authored {
    fn author_id(&self) -> UserId;
}

/// Evaluate `gate` for `actor` doing `action`.
///
/// `resource` is the object being acted on, when there is one. The
/// ownership gate denies updates and deletes without it.
pub fn authorize(
    actor: &Actor,
    action: Action,
    gate: Gate,
    resource: Option<&dyn Authored>,
) -> Decision {
    match gate {
        Gate::AdminOnly => admin_only(actor),
        Gate::AdminOrReadOnly if action.is_safe() => Decision::Allow,
        Gate::AdminOrReadOnly => admin_only(actor),
        Gate::AuthorOrStaff => author_or_staff(actor, action, resource),
    }
}

fn admin_only(actor: &Actor) -> Decision {
    match actor.role() {
        Some(Role::Admin) => Decision::Allow,
        Some(Role::Moderator) | Some(Role::User) | None => Decision::Deny,
    }
}

fn author_or_staff(actor: &Actor, action: Action, resource: Option<&dyn Authored>) -> Decision {
    match (action, actor, resource) {
        (Action::Read, _, _) => Decision::Allow,
        (Action::Create, Actor::Authenticated { .. }, _) => Decision::Allow,
        (Action::Create, Actor::Anonymous, _) => Decision::Deny,
        (
            Action::Update | Action::Delete,
            Actor::Authenticated {
                role: Role::Admin | Role::Moderator,
                ..
            },
            Some(_),
        ) => Decision::Allow,
        (
            Action::Update | Action::Delete,
            Actor::Authenticated {
                user_id,
                role: Role::User,
            },
            Some(object),
        ) if object.author_id() == *user_id => Decision::Allow,
        (Action::Update | Action::Delete, _, _) => Decision::Deny,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Owned(UserId);

    impl Authored for Owned {
        fn author_id(&self) -> UserId {
            self.0
        }
    }

    const ACTIONS: [Action; 4] = [Action::Create, Action::Read, Action::Update, Action::Delete];
    const GATES: [Gate; 3] = [Gate::AdminOnly, Gate::AdminOrReadOnly, Gate::AuthorOrStaff];

    fn actor(role: Role) -> Actor {
        Actor::Authenticated {
            user_id: UserId::new(),
            role,
        }
    }

    fn allowed(actor: &Actor, action: Action, gate: Gate, resource: Option<&dyn Authored>) -> bool {
        authorize(actor, action, gate, resource).is_allowed()
    }

    #[test]
    fn anonymous_can_read_title_list() {
        assert!(allowed(
            &Actor::Anonymous,
            Action::Read,
            Gate::AdminOrReadOnly,
            None
        ));
    }

    #[test]
    fn anonymous_cannot_create_category() {
        assert!(!allowed(
            &Actor::Anonymous,
            Action::Create,
            Gate::AdminOrReadOnly,
            None
        ));
    }

    #[test]
    fn admin_only_gate() {
        for action in ACTIONS {
            assert!(!allowed(&Actor::Anonymous, action, Gate::AdminOnly, None));
            assert!(!allowed(&actor(Role::User), action, Gate::AdminOnly, None));
            assert!(!allowed(&actor(Role::Moderator), action, Gate::AdminOnly, None));
            assert!(allowed(&actor(Role::Admin), action, Gate::AdminOnly, None));
        }
    }

    #[test]
    fn read_only_gate_writes_need_admin() {
        for action in [Action::Create, Action::Update, Action::Delete] {
            assert!(!allowed(&actor(Role::User), action, Gate::AdminOrReadOnly, None));
            assert!(!allowed(
                &actor(Role::Moderator),
                action,
                Gate::AdminOrReadOnly,
                None
            ));
            assert!(allowed(&actor(Role::Admin), action, Gate::AdminOrReadOnly, None));
        }
    }

    #[test]
    fn user_cannot_update_someone_elses_review() {
        let user = actor(Role::User);
        let review = Owned(UserId::new());
        assert!(!allowed(&user, Action::Update, Gate::AuthorOrStaff, Some(&review)));
    }

    #[test]
    fn user_can_update_own_review() {
        let user_id = UserId::new();
        let user = Actor::Authenticated {
            user_id,
            role: Role::User,
        };
        let review = Owned(user_id);
        assert!(allowed(&user, Action::Update, Gate::AuthorOrStaff, Some(&review)));
        assert!(allowed(&user, Action::Delete, Gate::AuthorOrStaff, Some(&review)));
    }

    #[test]
    fn moderator_can_delete_any_comment() {
        let comment = Owned(UserId::new());
        assert!(allowed(
            &actor(Role::Moderator),
            Action::Delete,
            Gate::AuthorOrStaff,
            Some(&comment)
        ));
    }

    #[test]
    fn admin_can_update_any_review() {
        let review = Owned(UserId::new());
        assert!(allowed(
            &actor(Role::Admin),
            Action::Update,
            Gate::AuthorOrStaff,
            Some(&review)
        ));
    }

    #[test]
    fn ownership_gate_create_needs_authentication() {
        assert!(!allowed(&Actor::Anonymous, Action::Create, Gate::AuthorOrStaff, None));
        assert!(allowed(&actor(Role::User), Action::Create, Gate::AuthorOrStaff, None));
    }

    #[test]
    fn ownership_gate_read_is_open() {
        let review = Owned(UserId::new());
        assert!(allowed(&Actor::Anonymous, Action::Read, Gate::AuthorOrStaff, Some(&review)));
        assert!(allowed(&Actor::Anonymous, Action::Read, Gate::AuthorOrStaff, None));
    }

    #[test]
    fn anonymous_cannot_change_anything_it_does_not_own() {
        let review = Owned(UserId::new());
        for action in [Action::Update, Action::Delete] {
            assert!(!allowed(&Actor::Anonymous, action, Gate::AuthorOrStaff, Some(&review)));
        }
    }

    #[test]
    fn missing_resource_denies_update_and_delete() {
        for role in [Role::User, Role::Moderator, Role::Admin] {
            for action in [Action::Update, Action::Delete] {
                assert!(!allowed(&actor(role), action, Gate::AuthorOrStaff, None));
            }
        }
    }

    /// Enumerates every actor kind, action and gate, and checks that
    /// nothing outside the explicit allow list is granted.
    #[test]
    fn fail_closed_everywhere_else() {
        let author_id = UserId::new();
        let resource = Owned(author_id);
        let actors = [
            ("anonymous", Actor::Anonymous),
            ("user", actor(Role::User)),
            (
                "author",
                Actor::Authenticated {
                    user_id: author_id,
                    role: Role::User,
                },
            ),
            ("moderator", actor(Role::Moderator)),
            ("admin", actor(Role::Admin)),
        ];

        for (name, a) in &actors {
            for action in ACTIONS {
                for gate in GATES {
                    let expected = match (gate, *name, action) {
                        (Gate::AdminOnly, "admin", _) => true,
                        (Gate::AdminOnly, _, _) => false,
                        (Gate::AdminOrReadOnly, _, Action::Read) => true,
                        (Gate::AdminOrReadOnly, "admin", _) => true,
                        (Gate::AdminOrReadOnly, _, _) => false,
                        (Gate::AuthorOrStaff, _, Action::Read) => true,
                        (Gate::AuthorOrStaff, "anonymous", _) => false,
                        (Gate::AuthorOrStaff, "user", Action::Create) => true,
                        (Gate::AuthorOrStaff, "user", _) => false,
                        (Gate::AuthorOrStaff, _, _) => true,
                    };
                    assert_eq!(
                        allowed(a, action, gate, Some(&resource)),
                        expected,
                        "{} {} under {:?}",
                        name,
                        action,
                        gate
                    );
                }
            }
        }
    }

    #[test]
    fn evaluation_is_deterministic() {
        let user = actor(Role::User);
        let review = Owned(UserId::new());
        let first = authorize(&user, Action::Delete, Gate::AuthorOrStaff, Some(&review));
        for _ in 0..10 {
            assert_eq!(
                authorize(&user, Action::Delete, Gate::AuthorOrStaff, Some(&review)),
                first
            );
        }
    }
}
