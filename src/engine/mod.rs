pub mod carousel;
pub mod sections;
pub mod tooltip;
pub mod tutorial;
