pub mod binning;
pub mod dispatch;
pub mod layout;
