pub mod fountain_parser;
pub mod title_page;
pub mod text_processor;

pub use fountain_parser::FountainParser;
pub use title_page::extract_title_page;
pub use text_processor::{parse_emphasis, plain_text, Span, Style};
