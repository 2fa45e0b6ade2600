//! User Records
//!
//! Typed rows handed to the repository after a registration is accepted.
//! The password is already hashed at this point.

use platform::password::HashedPassword;

use crate::domain::value_object::{
    email::Email, national_id::NationalId, phone::Phone, user_role::UserRole,
};

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub national_id: NationalId,
    pub phone: Phone,
    pub email: Email,
    pub name: String,
    pub surname: String,
    pub password_hash: HashedPassword,
}

#[derive(Debug, Clone)]
pub struct EmployeeRecord {
    pub user: UserRecord,
    pub position: String,
}

#[derive(Debug, Clone)]
pub struct PatientRecord {
    pub user: UserRecord,
}

/// Record for either role
#[derive(Debug, Clone)]
pub enum NewUser {
    Employee(EmployeeRecord),
    Patient(PatientRecord),
}

impl NewUser {
    pub fn role(&self) -> UserRole {
        match self {
            NewUser::Employee(_) => UserRole::Employee,
            NewUser::Patient(_) => UserRole::Patient,
        }
    }

    pub fn user(&self) -> &UserRecord {
        match self {
            NewUser::Employee(e) => &e.user,
            NewUser::Patient(p) => &p.user,
        }
    }
}
