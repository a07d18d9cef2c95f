pub mod position_sizer;
pub mod sessions;
