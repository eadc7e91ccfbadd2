//! Output Parser: tabla de formas conocidas, decodificadores y extractores.
mod decode;
mod extract;
pub mod parser;
pub mod shapes;

pub use parser::OutputParser;
pub use shapes::{Shape, ShapeRule, ShapeTable};
