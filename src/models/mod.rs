pub mod document;
pub mod title_values;
pub mod conf;

pub use document::{Document, Scene, SceneElement, SceneSection, Paragraph, ElementType};
pub use title_values::TitleValues;
pub use conf::Conf;
