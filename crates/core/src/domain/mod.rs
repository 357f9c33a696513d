pub mod department;
pub mod employee;
pub mod enterprise;
pub mod position;
pub mod process;
pub mod scope;
