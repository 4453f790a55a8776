pub(crate) mod auth;
pub(crate) mod fallback;
pub(crate) mod fixtures;
pub(crate) mod router;
