//! Wind energy models.

pub mod adm;
