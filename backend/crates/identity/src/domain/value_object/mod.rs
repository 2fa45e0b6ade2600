//! Value Object Module

pub mod email;
pub mod login_selector;
pub mod national_id;
pub mod password_strength;
pub mod phone;
pub mod user_field;
pub mod user_role;
