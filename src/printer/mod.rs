pub mod cert_list;
pub mod form;
pub mod paths;
pub mod session;
pub mod transport;
