//! Caller roles: admin and manager capability predicates.
//!
//! The ledger's core types know nothing about identity; the facade consults
//! this role book explicitly on each privileged operation.

use crate::domain::Account;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct RoleBook {
    admin: Account,
    managers: HashSet<Account>,
}

impl RoleBook {
    pub fn new(admin: Account, managers: impl IntoIterator<Item = Account>) -> Self {
        RoleBook {
            admin,
            managers: managers.into_iter().collect(),
        }
    }

    pub fn is_admin(&self, caller: &Account) -> bool {
        caller == &self.admin
    }

    /// The admin implicitly carries the manager capability.
    pub fn is_manager(&self, caller: &Account) -> bool {
        self.is_admin(caller) || self.managers.contains(caller)
    }

    pub fn admin(&self) -> &Account {
        &self.admin
    }

    pub fn set_manager(&mut self, account: Account) {
        self.managers.insert(account);
    }

    pub fn revoke_manager(&mut self, account: &Account) {
        self.managers.remove(account);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_is_also_manager() {
        let roles = RoleBook::new(Account::new("admin"), []);
        assert!(roles.is_admin(&Account::new("admin")));
        assert!(roles.is_manager(&Account::new("admin")));
        assert!(!roles.is_admin(&Account::new("mallory")));
    }

    #[test]
    fn manager_grant_and_revoke() {
        let mut roles = RoleBook::new(Account::new("admin"), [Account::new("m1")]);
        assert!(roles.is_manager(&Account::new("m1")));
        assert!(!roles.is_admin(&Account::new("m1")));

        roles.set_manager(Account::new("m2"));
        assert!(roles.is_manager(&Account::new("m2")));

        roles.revoke_manager(&Account::new("m1"));
        assert!(!roles.is_manager(&Account::new("m1")));
    }
}
