//! # Authorization Policy
//!
//! One table decides who may do what to volunteer records:
//!
//! | Operation | Anonymous | User | Admin |
//! |-----------|-----------|------|-------|
//! | register  | allow     | allow | allow |
//! | view      | deny      | allow iff the record's email is the user's | allow |
//! | list      | deny      | deny | allow |
//! | update    | deny      | deny | allow |
//! | delete    | deny      | deny | allow |
//!
//! The policy holds no state and performs no I/O. Callers evaluate list,
//! update and delete before touching storage, and view after the record has
//! been read so its owner can be compared.

use crate::models::principal::Principal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Register,
    View,
    List,
    Update,
    Delete,
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

/// Evaluates the policy table.
///
/// `owner_email` is the email of the target record, or `None` when there is
/// no record (or the operation has no single target). A missing record never
/// matches a non-admin, so absence and foreign ownership look the same.
pub fn authorize(principal: &Principal, operation: Operation, owner_email: Option<&str>) -> Decision {
    if operation == Operation::Register || principal.is_admin() {
        return Decision::Allow;
    }

    match (operation, principal.email(), owner_email) {
        (Operation::View, Some(own), Some(owner)) if own == owner => Decision::Allow,
        _ => Decision::Deny,
    }
}
