// handlers/customer/mod.rs - Customer tier (everyone except platform admins)

pub mod agenda;
pub mod audit_packs;
pub mod dashboard;
pub mod evidence;
pub mod reminders;
pub mod tasks;
