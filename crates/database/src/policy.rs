//! Authorization policy: every role/ownership decision in one place.
//!
//! Each function is a pure predicate over the caller and (optionally) a
//! target record's owning identifiers. Handlers and services consume these
//! uniformly instead of re-implementing role branches per endpoint.
//! Denial is all-or-nothing per record set; no field-level redaction.

use crate::error::ServiceError;
use models::role::Role;
use uuid::Uuid;

/// The authenticated caller: user id plus role, resolved from the bearer
/// token's subject before any service runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    /// super_admin or admin: unfiltered visibility everywhere.
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::SuperAdmin | Role::Admin)
    }

    /// Any non-student role.
    pub fn is_staff(&self) -> bool {
        !matches!(self.role, Role::Student)
    }
}

/// Route-level gate: the caller's role must be in `allowed`.
pub fn require_role(actor: &Actor, allowed: &[Role]) -> Result<(), ServiceError> {
    if allowed.contains(&actor.role) {
        Ok(())
    } else {
        Err(ServiceError::forbidden(
            "Not authorized to access this resource",
        ))
    }
}

/// Attendance records are mutable by admins and by the trainer who
/// authored them (ownership by trainer id equality).
pub fn can_mutate_attendance(actor: &Actor, record_trainer_id: Uuid) -> bool {
    actor.is_admin() || (actor.role == Role::Trainer && actor.id == record_trainer_id)
}

/// A specific student's records are visible to all staff roles and to the
/// student themself, matched through the student's linked user account.
pub fn can_view_student_records(actor: &Actor, student_user_id: Uuid) -> bool {
    actor.is_staff() || actor.id == student_user_id
}

/// A trainer's authored records are visible to admins and to that trainer.
pub fn can_view_trainer_records(actor: &Actor, trainer_id: Uuid) -> bool {
    actor.is_admin() || actor.id == trainer_id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role) -> Actor {
        Actor::new(Uuid::new_v4(), role)
    }

    #[test]
    fn admins_mutate_any_attendance() {
        let other_trainer = Uuid::new_v4();
        assert!(can_mutate_attendance(&actor(Role::SuperAdmin), other_trainer));
        assert!(can_mutate_attendance(&actor(Role::Admin), other_trainer));
    }

    #[test]
    fn trainer_mutates_only_own_attendance() {
        let trainer = actor(Role::Trainer);
        assert!(can_mutate_attendance(&trainer, trainer.id));
        assert!(!can_mutate_attendance(&trainer, Uuid::new_v4()));
    }

    #[test]
    fn sales_person_cannot_mutate_attendance() {
        let sales = actor(Role::SalesPerson);
        assert!(!can_mutate_attendance(&sales, sales.id));
    }

    #[test]
    fn student_sees_only_own_records() {
        let user_id = Uuid::new_v4();
        let me = Actor::new(user_id, Role::Student);
        assert!(can_view_student_records(&me, user_id));
        assert!(!can_view_student_records(&me, Uuid::new_v4()));
        assert!(can_view_student_records(&actor(Role::SalesPerson), user_id));
        assert!(can_view_student_records(&actor(Role::Trainer), user_id));
    }

    #[test]
    fn trainer_records_are_admin_or_self() {
        let trainer = actor(Role::Trainer);
        assert!(can_view_trainer_records(&trainer, trainer.id));
        assert!(!can_view_trainer_records(&trainer, Uuid::new_v4()));
        assert!(can_view_trainer_records(&actor(Role::Admin), Uuid::new_v4()));
    }

    #[test]
    fn require_role_rejects_outsiders() {
        let allowed = [Role::SuperAdmin, Role::Admin];
        assert!(require_role(&actor(Role::Admin), &allowed).is_ok());
        assert!(matches!(
            require_role(&actor(Role::Trainer), &allowed),
            Err(ServiceError::Forbidden(_))
        ));
    }
}
