pub(crate) mod password;
pub(crate) mod session;
pub(crate) mod store;
pub(crate) mod token;
