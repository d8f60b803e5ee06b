pub mod composite;
pub mod cpu;
pub mod encode;
