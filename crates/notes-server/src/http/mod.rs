pub(crate) mod crud;
pub(crate) mod handlers;
