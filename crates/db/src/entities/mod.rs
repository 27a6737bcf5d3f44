//! `SeaORM` entity definitions.

pub mod calculations;
