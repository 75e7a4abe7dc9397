//! Role and permission repository module.

mod r#trait;
pub use r#trait::RoleRepository;

#[cfg(test)]
mod mock;
#[cfg(test)]
pub use mock::MockRoleRepository;
