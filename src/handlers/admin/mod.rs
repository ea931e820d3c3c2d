// handlers/admin/mod.rs - Admin tier (platform admins, admins and managers)

pub mod dashboard;
pub mod organizations;
pub mod users;
