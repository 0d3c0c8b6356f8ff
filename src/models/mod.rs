pub mod bar;
pub mod gain;
