pub mod crud;
pub mod wizard;
