pub mod enums;
pub mod evaluacion;
pub mod paciente;
pub mod usuario;

pub use enums::*;
pub use evaluacion::*;
pub use paciente::*;
pub use usuario::*;
